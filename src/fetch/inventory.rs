//! Offline fetcher backed by an inventory snapshot.
//!
//! The snapshot is a JSON document listing resource records:
//!
//! ```json
//! { "resources": [ { "kind": "project", "project_id": "p1", "name": "p1" } ] }
//! ```
//!
//! Listings still go through [`FetchSupport`], so they are cached and timed
//! like remote ones.

use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{FetchSupport, FetcherRegistry, ResourceFetcher};
use crate::models::{Resource, ResourceKind, Scope};

// == Inventory ==
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Inventory {
    #[serde(default)]
    pub resources: Vec<Resource>,
}

impl Inventory {
    pub fn new(resources: Vec<Resource>) -> Self {
        Self { resources }
    }

    /// Reads a snapshot from disk.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading inventory {}", path.display()))?;
        let inventory: Inventory = serde_json::from_str(&raw)
            .with_context(|| format!("parsing inventory {}", path.display()))?;
        info!(
            "Loaded inventory with {} resources from {}",
            inventory.resources.len(),
            path.display()
        );
        Ok(inventory)
    }

    /// Records of `kind` that live under `scope`.
    pub fn select(&self, kind: ResourceKind, scope: &Scope) -> Vec<Resource> {
        self.resources
            .iter()
            .filter(|resource| resource.kind == kind)
            .filter(|resource| match scope {
                Scope::Global => true,
                Scope::Project(project_id) => &resource.project_id == project_id,
                Scope::Child {
                    project_id, parent, ..
                } => {
                    &resource.project_id == project_id
                        && resource.parent.as_deref() == Some(parent.as_str())
                }
            })
            .cloned()
            .collect()
    }
}

// == Inventory Fetcher ==
/// Serves one resource kind out of a shared [`Inventory`].
#[derive(Debug, Clone)]
pub struct InventoryFetcher {
    kind: ResourceKind,
    inventory: Arc<Inventory>,
    support: FetchSupport,
}

impl InventoryFetcher {
    pub fn new(kind: ResourceKind, inventory: Arc<Inventory>, support: FetchSupport) -> Self {
        Self {
            kind,
            inventory,
            support,
        }
    }

    /// Registers an inventory fetcher for every resource kind.
    pub fn register_all(
        registry: &mut FetcherRegistry,
        inventory: Arc<Inventory>,
        support: &FetchSupport,
    ) {
        for kind in ResourceKind::ALL {
            registry.register(
                kind,
                Arc::new(Self::new(kind, inventory.clone(), support.clone())),
            );
        }
    }
}

#[async_trait]
impl ResourceFetcher for InventoryFetcher {
    async fn list(&self, scope: &Scope, use_cache: bool) -> anyhow::Result<Vec<Resource>> {
        let items = self
            .support
            .cached_list(self.kind, scope, use_cache, || {
                let inventory = self.inventory.clone();
                let kind = self.kind;
                let scope = scope.clone();
                async move { Ok(inventory.select(kind, &scope)) }
            })
            .await;
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Cache;
    use crate::config::Config;
    use crate::executor::{RetryExecutor, RetryPolicy};

    fn inventory() -> Inventory {
        Inventory::new(vec![
            Resource::project("p1", "Project One"),
            Resource::project("p2", "Project Two"),
            Resource::new(ResourceKind::GkeCluster, "p1", "main"),
            Resource::new(ResourceKind::GkeNode, "p1", "node-a").with_parent("main"),
            Resource::new(ResourceKind::GkeNode, "p1", "node-b").with_parent("other"),
            Resource::new(ResourceKind::GkeCluster, "p2", "edge"),
        ])
    }

    #[test]
    fn test_select_by_scope() {
        let inventory = inventory();

        assert_eq!(inventory.select(ResourceKind::Project, &Scope::Global).len(), 2);

        let clusters = inventory.select(ResourceKind::GkeCluster, &Scope::project("p1"));
        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].name, "main");

        let nodes = inventory.select(ResourceKind::GkeNode, &Scope::child_in("p1", "main", "us-east1"));
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].name, "node-a");
    }

    #[test]
    fn test_parse_snapshot() {
        let raw = r#"{"resources":[{"kind":"bucket","project_id":"p1","name":"logs","labels":{"env":"prod"}}]}"#;
        let inventory: Inventory = serde_json::from_str(raw).unwrap();
        assert_eq!(inventory.resources.len(), 1);
        assert_eq!(inventory.resources[0].labels["env"], "prod");

        let empty: Inventory = serde_json::from_str("{}").unwrap();
        assert!(empty.resources.is_empty());
    }

    #[tokio::test]
    async fn test_fetcher_caches_listing() {
        let config = Config::default();
        let support = FetchSupport::new(
            Arc::new(Cache::new(1 << 20)),
            Arc::new(RetryExecutor::new(RetryPolicy::from_config(&config))),
            &config,
        );
        let fetcher = InventoryFetcher::new(
            ResourceKind::GkeCluster,
            Arc::new(inventory()),
            support.clone(),
        );

        let clusters = fetcher.list(&Scope::project("p2"), true).await.unwrap();
        assert_eq!(clusters.len(), 1);
        assert!(
            support
                .cache
                .contains(&FetchSupport::cache_key(ResourceKind::GkeCluster, &Scope::project("p2")))
                .await
        );
    }
}
