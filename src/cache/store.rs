//! Cache Store Module
//!
//! Main cache engine combining HashMap storage with LRU tracking, TTL
//! expiration and a total size budget.

use std::collections::HashMap;
use std::time::Duration;

use tracing::{debug, warn};

use crate::cache::{CacheEntry, CacheStats, LruTracker, Weigh, ENTRY_OVERHEAD_BYTES};
use crate::error::CacheError;

// == Cache Store ==
/// Single-owner cache storage. Wrap it in [`crate::cache::Cache`] to share it.
#[derive(Debug)]
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// LRU access tracker
    lru: LruTracker,
    /// Lifetime counters
    stats: CacheStats,
    /// Total size budget
    max_size_bytes: usize,
    /// Sum of `size_bytes` over all entries
    current_size: usize,
}

impl<V: Weigh + Clone> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store bounded to `max_size_bytes`.
    pub fn new(max_size_bytes: usize) -> Self {
        Self {
            entries: HashMap::new(),
            lru: LruTracker::new(),
            stats: CacheStats::new(),
            max_size_bytes,
            current_size: 0,
        }
    }

    /// Size an entry would be charged for.
    pub fn entry_size(key: &str, value: &V) -> usize {
        key.len()
            .saturating_add(value.approx_bytes())
            .saturating_add(ENTRY_OVERHEAD_BYTES)
    }

    // == Set ==
    /// Stores a value under `key` for `ttl`.
    ///
    /// Overwriting replaces the value and resets its TTL. Least recently used
    /// entries are evicted until the new entry fits the budget. An entry that
    /// could never fit is rejected, and any older value under the key is dropped.
    pub fn set(&mut self, key: impl Into<String>, value: V, ttl: Duration) -> Result<(), CacheError> {
        let key = key.into();
        let size = Self::entry_size(&key, &value);

        // The old value no longer counts against the budget
        self.remove_entry(&key);

        if size > self.max_size_bytes {
            warn!(
                key = %key,
                size,
                max = self.max_size_bytes,
                "Cache entry larger than cache budget, not stored"
            );
            return Err(CacheError::EntryTooLarge {
                key,
                size,
                max: self.max_size_bytes,
            });
        }

        while self.current_size + size > self.max_size_bytes {
            let Some(victim) = self.lru.evict_oldest() else {
                break;
            };
            if let Some(entry) = self.entries.remove(&victim) {
                self.current_size -= entry.size_bytes;
            }
            self.stats.record_eviction();
            debug!(key = %victim, "Cache evicted");
        }

        debug!(key = %key, ttl_secs = ttl.as_secs_f64(), size, "Cache set");
        self.entries.insert(key.clone(), CacheEntry::new(value, ttl, size));
        self.lru.touch(&key);
        self.current_size += size;

        Ok(())
    }

    // == Get ==
    /// Returns a clone of the live value under `key`.
    ///
    /// An expired entry is removed on the spot and reported as a miss.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let expired = match self.entries.get(key) {
            None => {
                self.stats.record_miss();
                debug!(key, "Cache miss");
                return None;
            }
            Some(entry) => entry.is_expired(),
        };

        if expired {
            self.remove_entry(key);
            self.stats.record_expiration();
            self.stats.record_miss();
            debug!(key, "Cache expired");
            return None;
        }

        self.stats.record_hit();
        self.lru.touch(key);
        debug!(key, "Cache hit");
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Invalidate ==
    /// Removes an entry; returns whether one was present.
    pub fn invalidate(&mut self, key: &str) -> bool {
        let removed = self.remove_entry(key).is_some();
        if removed {
            debug!(key, "Cache invalidated");
        }
        removed
    }

    // == Clear ==
    /// Removes every entry. Lifetime counters are kept.
    pub fn clear(&mut self) {
        let count = self.entries.len();
        self.entries.clear();
        self.lru.clear();
        self.current_size = 0;
        debug!(count, "Cache cleared");
    }

    // == Cleanup Expired ==
    /// Removes all expired entries from the cache.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&mut self) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.remove_entry(key);
            self.stats.record_expiration();
        }

        expired_keys.len()
    }

    // == Stats ==
    /// Returns a snapshot of the lifetime counters.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Returns true if a live entry exists. Does not touch recency or counters.
    pub fn contains(&self, key: &str) -> bool {
        self.entries
            .get(key)
            .is_some_and(|entry| !entry.is_expired())
    }

    /// Remaining lifetime of a live entry.
    pub fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(CacheEntry::ttl_remaining)
    }

    /// Bytes charged for `key`, zero if absent.
    pub fn charge_of(&self, key: &str) -> usize {
        self.entries.get(key).map_or(0, |entry| entry.size_bytes)
    }

    /// Keys from least to most recently used.
    pub fn keys_by_recency(&self) -> Vec<String> {
        self.lru.iter_oldest_first().cloned().collect()
    }

    /// Number of entries, expired ones included until they are noticed.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn size_bytes(&self) -> usize {
        self.current_size
    }

    pub fn max_size_bytes(&self) -> usize {
        self.max_size_bytes
    }

    fn remove_entry(&mut self, key: &str) -> Option<CacheEntry<V>> {
        let entry = self.entries.remove(key)?;
        self.lru.remove(key);
        self.current_size -= entry.size_bytes;
        Some(entry)
    }
}
