//! Read-through listing shared by fetchers.
//!
//! Cache in front, resilient executor behind, empty collection on failure.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::cache::Cache;
use crate::config::Config;
use crate::executor::{RemoteError, RetryExecutor};
use crate::models::{Resource, ResourceKind, Scope};

// == Fetch Support ==
/// Everything a fetcher needs from the process context.
#[derive(Debug, Clone)]
pub struct FetchSupport {
    pub cache: Arc<Cache<Vec<Resource>>>,
    pub executor: Arc<RetryExecutor>,
    cache_enabled: bool,
    ttl_projects: Duration,
    ttl_resources: Duration,
}

impl FetchSupport {
    pub fn new(
        cache: Arc<Cache<Vec<Resource>>>,
        executor: Arc<RetryExecutor>,
        config: &Config,
    ) -> Self {
        Self {
            cache,
            executor,
            cache_enabled: config.cache_enabled,
            ttl_projects: config.cache_ttl_projects,
            ttl_resources: config.cache_ttl_resources,
        }
    }

    /// Cache key of one listing.
    pub fn cache_key(kind: ResourceKind, scope: &Scope) -> String {
        format!("{}:{}", kind.slug(), scope.cache_key())
    }

    /// Projects and resources age independently.
    pub fn ttl_for(&self, kind: ResourceKind) -> Duration {
        match kind {
            ResourceKind::Project => self.ttl_projects,
            _ => self.ttl_resources,
        }
    }

    // == Cached List ==
    /// Lists `kind` under `scope`, consulting the cache first when `use_cache`.
    ///
    /// A fresh result is cached even when `use_cache` is false, so a forced
    /// refresh also repopulates the cache. Failures are logged and yield an
    /// empty collection, which is not cached.
    pub async fn cached_list<F, Fut>(
        &self,
        kind: ResourceKind,
        scope: &Scope,
        use_cache: bool,
        operation: F,
    ) -> Vec<Resource>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<Vec<Resource>, RemoteError>>,
    {
        let key = Self::cache_key(kind, scope);

        if use_cache && self.cache_enabled {
            if let Some(items) = self.cache.get(&key).await {
                debug!("Returning {} {} from cache for {}", items.len(), kind, scope);
                return items;
            }
        }

        let name = format!("list {} for {}", kind, scope);
        match self.executor.execute(&name, operation).await {
            Ok(items) => {
                if self.cache_enabled {
                    if let Err(err) = self.cache.set(key, items.clone(), self.ttl_for(kind)).await {
                        warn!("Not caching {} for {}: {}", kind, scope, err);
                    }
                }
                items
            }
            Err(err) => {
                warn!("Returning no {} for {}: {}", kind, scope, err);
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::{RemoteCode, RetryPolicy};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn support(config: &Config) -> FetchSupport {
        let policy = RetryPolicy {
            max_retries: 1,
            initial_delay: Duration::from_millis(10),
            ..RetryPolicy::from_config(config)
        };
        FetchSupport::new(
            Arc::new(Cache::new(1 << 20)),
            Arc::new(RetryExecutor::new(policy)),
            config,
        )
    }

    fn secrets() -> Vec<Resource> {
        vec![Resource::new(ResourceKind::Secret, "p1", "api-key")]
    }

    #[test]
    fn test_cache_key_and_ttls() {
        let support = support(&Config::default());
        assert_eq!(
            FetchSupport::cache_key(ResourceKind::GkeNode, &Scope::child("p1", "c1")),
            "gke_node:c:2:p1|2:c1|-"
        );
        assert_eq!(support.ttl_for(ResourceKind::Project), Duration::from_secs(600));
        assert_eq!(support.ttl_for(ResourceKind::Secret), Duration::from_secs(300));
    }

    #[test]
    fn test_cache_key_distinguishes_parent_with_at_sign() {
        assert_ne!(
            FetchSupport::cache_key(ResourceKind::RoleBinding, &Scope::child("p", "a@b")),
            FetchSupport::cache_key(ResourceKind::RoleBinding, &Scope::child_in("p", "a", "b"))
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_lookalike_child_scopes_do_not_share_entries() {
        let support = support(&Config::default());
        let account = Scope::child("infra", "deployer@infra.iam");
        let located = Scope::child_in("infra", "deployer", "infra.iam");
        let binding = Resource::new(ResourceKind::RoleBinding, "infra", "roles/editor")
            .with_parent("deployer@infra.iam");

        let first = support
            .cached_list(ResourceKind::RoleBinding, &account, true, || {
                let binding = binding.clone();
                async move { Ok(vec![binding]) }
            })
            .await;
        let second = support
            .cached_list(ResourceKind::RoleBinding, &located, true, || async {
                Ok(Vec::new())
            })
            .await;

        assert_eq!(first.len(), 1);
        assert!(second.is_empty());
        assert_eq!(support.cache.size().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_second_call_served_from_cache() {
        let support = support(&Config::default());
        let calls = AtomicUsize::new(0);
        let scope = Scope::project("p1");

        for _ in 0..2 {
            let items = support
                .cached_list(ResourceKind::Secret, &scope, true, || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Ok(secrets()) }
                })
                .await;
            assert_eq!(items, secrets());
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_bypass_refetches_and_repopulates() {
        let support = support(&Config::default());
        let calls = AtomicUsize::new(0);
        let scope = Scope::project("p1");

        for use_cache in [true, false, true] {
            support
                .cached_list(ResourceKind::Secret, &scope, use_cache, || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Ok(secrets()) }
                })
                .await;
        }

        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_returns_empty_and_is_not_cached() {
        let support = support(&Config::default());
        let scope = Scope::project("p1");

        let items = support
            .cached_list(ResourceKind::Secret, &scope, true, || async {
                Err(RemoteError::new(RemoteCode::PermissionDenied, "denied"))
            })
            .await;

        assert!(items.is_empty());
        let key = FetchSupport::cache_key(ResourceKind::Secret, &scope);
        assert!(!support.cache.contains(&key).await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_disabled_always_calls_remote() {
        let config = Config {
            cache_enabled: false,
            ..Config::default()
        };
        let support = support(&config);
        let calls = AtomicUsize::new(0);
        let scope = Scope::project("p1");

        for _ in 0..3 {
            support
                .cached_list(ResourceKind::Secret, &scope, true, || {
                    calls.fetch_add(1, Ordering::SeqCst);
                    async { Ok(secrets()) }
                })
                .await;
        }

        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(support.cache.size().await, 0);
    }
}
