//! TTL Cleanup Task
//!
//! Background task that periodically removes expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::{CacheStore, Weigh};

/// Spawns a background task that periodically cleans up expired cache entries.
///
/// The task sleeps for `interval` between sweeps and holds the store lock only
/// for the duration of one sweep.
///
/// # Returns
/// A JoinHandle for the spawned task; abort it to stop the sweep.
///
/// # Example
/// ```ignore
/// let store = Arc::new(Mutex::new(CacheStore::<String>::new(1 << 20)));
/// let cleanup_handle = spawn_cleanup_task(store.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// cleanup_handle.abort();
/// ```
pub fn spawn_cleanup_task<V>(store: Arc<Mutex<CacheStore<V>>>, interval: Duration) -> JoinHandle<()>
where
    V: Weigh + Clone + Send + 'static,
{
    tokio::spawn(async move {
        info!(
            "Starting TTL cleanup task with interval of {:.1} seconds",
            interval.as_secs_f64()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = store.lock().await.cleanup_expired();

            if removed > 0 {
                info!("TTL cleanup: removed {} expired entries", removed);
            } else {
                debug!("TTL cleanup: no expired entries found");
            }
        }
    })
}
