//! Per-scope load / read / invalidate.

use std::collections::HashMap;

use tokio::sync::RwLock;
use tracing::info;

use crate::error::{Result, StateError};
use crate::fetch::FetcherRegistry;
use crate::models::{Resource, ResourceKind, Scope};

/// Collections of one kind, by scope. A scope is loaded iff it has an entry,
/// even an empty one.
type KindCollections = HashMap<Scope, Vec<Resource>>;

// == Resource State ==
/// Tracks what has been fetched for every (kind, scope).
///
/// A scope moves from not-loaded to loaded on its first `load`, and back only
/// through a forced reload or an invalidation. Concurrent forced reloads of
/// the same scope are not serialized; the last one to finish wins.
#[derive(Debug)]
pub struct ResourceState {
    fetchers: FetcherRegistry,
    collections: RwLock<HashMap<ResourceKind, KindCollections>>,
}

impl ResourceState {
    pub fn new(fetchers: FetcherRegistry) -> Self {
        Self {
            fetchers,
            collections: RwLock::new(HashMap::new()),
        }
    }

    pub fn fetchers(&self) -> &FetcherRegistry {
        &self.fetchers
    }

    // == Load ==
    /// Returns the collection for `kind` under `scope`, fetching it if needed.
    ///
    /// Without `force_refresh` an already loaded scope is answered from state.
    /// Otherwise the fetcher is called (with its own cache bypassed when
    /// forced), and the result is stored and marked loaded, even if empty.
    /// Fetcher errors are returned unchanged and leave the state untouched.
    pub async fn load(
        &self,
        kind: ResourceKind,
        scope: &Scope,
        force_refresh: bool,
    ) -> Result<Vec<Resource>> {
        if kind.scope_level() != scope.level() {
            return Err(StateError::ScopeMismatch {
                kind,
                scope: scope.clone(),
            });
        }

        if !force_refresh {
            let collections = self.collections.read().await;
            if let Some(items) = collections.get(&kind).and_then(|by_scope| by_scope.get(scope)) {
                info!("Returning {} {} from state for {}", items.len(), kind, scope);
                return Ok(items.clone());
            }
        }

        let fetcher = self.fetchers.get(kind).ok_or(StateError::NoFetcher(kind))?;
        let items = fetcher.list(scope, !force_refresh).await?;

        self.collections
            .write()
            .await
            .entry(kind)
            .or_default()
            .insert(scope.clone(), items.clone());

        info!("Loaded {} {} into state for {}", items.len(), kind, scope);
        Ok(items)
    }

    /// Loads the project list.
    pub async fn load_projects(&self, force_refresh: bool) -> Result<Vec<Resource>> {
        self.load(ResourceKind::Project, &Scope::Global, force_refresh)
            .await
    }

    // == Get ==
    /// Whatever is stored for `kind` under `scope`; empty if never loaded.
    /// Never fetches.
    pub async fn get(&self, kind: ResourceKind, scope: &Scope) -> Vec<Resource> {
        self.collections
            .read()
            .await
            .get(&kind)
            .and_then(|by_scope| by_scope.get(scope))
            .cloned()
            .unwrap_or_default()
    }

    /// Looks a project up in the loaded project list.
    ///
    /// [`invalidate_project`](Self::invalidate_project) keeps the project
    /// list, so an invalidated project is still found here until the list
    /// itself is reloaded or [`invalidate_all`](Self::invalidate_all) runs.
    pub async fn get_project(&self, project_id: &str) -> Option<Resource> {
        self.collections
            .read()
            .await
            .get(&ResourceKind::Project)
            .and_then(|by_scope| by_scope.get(&Scope::Global))
            .and_then(|projects| {
                projects
                    .iter()
                    .find(|project| project.project_id == project_id)
                    .cloned()
            })
    }

    pub async fn is_loaded(&self, kind: ResourceKind, scope: &Scope) -> bool {
        self.collections
            .read()
            .await
            .get(&kind)
            .is_some_and(|by_scope| by_scope.contains_key(scope))
    }

    /// Number of loaded scopes across all kinds.
    pub async fn loaded_count(&self) -> usize {
        self.collections
            .read()
            .await
            .values()
            .map(HashMap::len)
            .sum()
    }

    // == Invalidation ==
    /// Forgets every scope under `project_id`, across all kinds, child scopes
    /// included. The project list itself is global and stays loaded.
    pub async fn invalidate_project(&self, project_id: &str) {
        let mut collections = self.collections.write().await;
        let mut dropped = 0;
        for by_scope in collections.values_mut() {
            let before = by_scope.len();
            by_scope.retain(|scope, _| !scope.belongs_to(project_id));
            dropped += before - by_scope.len();
        }
        collections.retain(|_, by_scope| !by_scope.is_empty());

        info!("Invalidated project {} from state ({} scopes)", project_id, dropped);
    }

    /// Forgets everything.
    pub async fn invalidate_all(&self) {
        self.collections.write().await.clear();
        info!("Invalidated all state");
    }
}
