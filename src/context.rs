//! Process-wide context
//!
//! One cache, one executor and one state manager, built once from
//! [`Config`] and handed to fetchers and the HTTP layer explicitly.

use std::sync::Arc;

use tracing::info;

use crate::cache::Cache;
use crate::config::Config;
use crate::executor::{RetryExecutor, RetryPolicy};
use crate::fetch::{FetchSupport, FetcherRegistry};
use crate::models::Resource;
use crate::state::ResourceState;

/// Shared engine services.
#[derive(Debug, Clone)]
pub struct AppContext {
    pub config: Arc<Config>,
    pub cache: Arc<Cache<Vec<Resource>>>,
    pub executor: Arc<RetryExecutor>,
    pub state: Arc<ResourceState>,
}

impl AppContext {
    /// Builds the context; `register` installs fetchers before the state
    /// manager takes ownership of the registry.
    pub fn new<F>(config: Config, register: F) -> Self
    where
        F: FnOnce(&mut FetcherRegistry, &FetchSupport),
    {
        let cache = Arc::new(Cache::new(config.cache_max_bytes));
        let executor = Arc::new(RetryExecutor::new(RetryPolicy::from_config(&config)));
        let support = FetchSupport::new(cache.clone(), executor.clone(), &config);

        let mut registry = FetcherRegistry::new();
        register(&mut registry, &support);
        info!("Registered fetchers for {:?}", registry.kinds());

        Self {
            config: Arc::new(config),
            cache,
            executor,
            state: Arc::new(ResourceState::new(registry)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::{Inventory, InventoryFetcher};
    use crate::models::{ResourceKind, Scope};

    #[tokio::test]
    async fn test_context_wires_registered_fetchers() {
        let inventory = Arc::new(Inventory::new(vec![
            Resource::project("p1", "Payments"),
            Resource::new(ResourceKind::Bucket, "p1", "invoices"),
        ]));
        let ctx = AppContext::new(Config::default(), |registry, support| {
            InventoryFetcher::register_all(registry, inventory.clone(), support);
        });

        let projects = ctx.state.load_projects(false).await.unwrap();
        let buckets = ctx
            .state
            .load(ResourceKind::Bucket, &Scope::project("p1"), false)
            .await
            .unwrap();

        assert_eq!(projects.len(), 1);
        assert_eq!(buckets[0].name, "invoices");
        assert_eq!(ctx.cache.size().await, 2);
    }
}
