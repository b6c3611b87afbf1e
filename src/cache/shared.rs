//! Shared Cache Module
//!
//! Concurrency-safe handle around [`CacheStore`] that also owns the periodic
//! expiry sweep.

use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::cache::{CacheStats, CacheStore, Weigh};
use crate::error::CacheError;
use crate::tasks::spawn_cleanup_task;

// == Cache ==
/// Process-wide cache shared by every fetcher.
///
/// Every operation holds the store lock for its whole body, so a
/// read-modify-write never interleaves with another task.
#[derive(Debug)]
pub struct Cache<V> {
    store: Arc<Mutex<CacheStore<V>>>,
    cleanup: StdMutex<Option<JoinHandle<()>>>,
}

impl<V> Cache<V>
where
    V: Weigh + Clone + Send + 'static,
{
    pub fn new(max_size_bytes: usize) -> Self {
        Self {
            store: Arc::new(Mutex::new(CacheStore::new(max_size_bytes))),
            cleanup: StdMutex::new(None),
        }
    }

    pub async fn get(&self, key: &str) -> Option<V> {
        self.store.lock().await.get(key)
    }

    pub async fn set(&self, key: impl Into<String>, value: V, ttl: Duration) -> Result<(), CacheError> {
        self.store.lock().await.set(key, value, ttl)
    }

    pub async fn invalidate(&self, key: &str) {
        self.store.lock().await.invalidate(key);
    }

    pub async fn clear(&self) {
        self.store.lock().await.clear();
    }

    /// Runs one expiry sweep; returns the number of entries removed.
    pub async fn cleanup_expired(&self) -> usize {
        self.store.lock().await.cleanup_expired()
    }

    pub async fn get_stats(&self) -> CacheStats {
        self.store.lock().await.stats()
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.store.lock().await.contains(key)
    }

    /// Number of entries.
    pub async fn size(&self) -> usize {
        self.store.lock().await.len()
    }

    pub async fn size_bytes(&self) -> usize {
        self.store.lock().await.size_bytes()
    }

    pub async fn max_size_bytes(&self) -> usize {
        self.store.lock().await.max_size_bytes()
    }

    // == Cleanup Task ==
    /// Starts the periodic expiry sweep. Must be called from within a tokio runtime.
    ///
    /// Returns false (and does nothing) if a sweep is already running.
    pub fn start_cleanup_task(&self, interval: Duration) -> bool {
        let mut slot = self.cleanup.lock().unwrap_or_else(PoisonError::into_inner);
        if slot.as_ref().is_some_and(|handle| !handle.is_finished()) {
            warn!("Cache cleanup task already running");
            return false;
        }

        *slot = Some(spawn_cleanup_task(self.store.clone(), interval));
        true
    }

    /// Stops the periodic expiry sweep. Returns false if none was running.
    pub fn stop_cleanup_task(&self) -> bool {
        let handle = self
            .cleanup
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        match handle {
            Some(handle) => {
                handle.abort();
                info!("Cache cleanup task stopped");
                true
            }
            None => {
                warn!("Cache cleanup task not running");
                false
            }
        }
    }

    pub fn is_cleanup_running(&self) -> bool {
        self.cleanup
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl<V> Drop for Cache<V> {
    fn drop(&mut self) {
        let slot = self.cleanup.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_concurrent_set_then_get() {
        let cache = Arc::new(Cache::<String>::new(4096));

        let setters = (0..8).map(|i| {
            let cache = cache.clone();
            tokio::spawn(async move {
                cache
                    .set(format!("key{}", i), format!("value{}", i), Duration::from_secs(60))
                    .await
                    .unwrap();
            })
        });
        futures::future::join_all(setters).await;

        for i in 0..8 {
            assert_eq!(cache.get(&format!("key{}", i)).await, Some(format!("value{}", i)));
        }
        assert_eq!(cache.size().await, 8);
        assert_eq!(cache.get_stats().await.hits, 8);
    }

    #[tokio::test]
    async fn test_invalidate_and_clear() {
        let cache = Cache::<String>::new(4096);
        cache.set("a", "1".to_string(), Duration::from_secs(60)).await.unwrap();
        cache.set("b", "2".to_string(), Duration::from_secs(60)).await.unwrap();

        cache.invalidate("a").await;
        cache.invalidate("missing").await;
        assert!(!cache.contains("a").await);
        assert!(cache.contains("b").await);

        cache.clear().await;
        assert_eq!(cache.size().await, 0);
        assert_eq!(cache.size_bytes().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_task_start_stop_is_idempotent() {
        let cache = Cache::<String>::new(4096);

        assert!(!cache.stop_cleanup_task(), "stopping when idle is a no-op");
        assert!(cache.start_cleanup_task(Duration::from_secs(1)));
        assert!(!cache.start_cleanup_task(Duration::from_secs(1)));
        assert!(cache.is_cleanup_running());
        assert!(cache.stop_cleanup_task());
        assert!(!cache.is_cleanup_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cleanup_task_sweeps_expired_entries() {
        let cache = Cache::<String>::new(4096);
        cache.set("short", "v".to_string(), Duration::from_secs(1)).await.unwrap();
        cache.set("long", "v".to_string(), Duration::from_secs(3600)).await.unwrap();

        cache.start_cleanup_task(Duration::from_secs(5));
        tokio::time::sleep(Duration::from_secs(6)).await;

        assert_eq!(cache.size().await, 1);
        assert_eq!(cache.get_stats().await.expirations, 1);
        assert!(cache.contains("long").await);
        cache.stop_cleanup_task();
    }
}
