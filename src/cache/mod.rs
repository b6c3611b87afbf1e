//! Cache Module
//!
//! Provides a process-wide in-memory cache with per-entry TTL, size-bounded
//! LRU eviction and a background expiry sweep.

mod entry;
mod lru;
mod shared;
mod stats;
mod store;
mod weigh;


// Re-export public types
pub use entry::CacheEntry;
pub use lru::LruTracker;
pub use shared::Cache;
pub use stats::CacheStats;
pub use store::CacheStore;
pub use weigh::Weigh;

// == Public Constants ==
/// Fixed bookkeeping cost charged to every entry on top of key and value
pub const ENTRY_OVERHEAD_BYTES: usize = 64;

/// Default total size budget
pub const DEFAULT_MAX_SIZE_BYTES: usize = 100 * 1024 * 1024; // 100 MB
