//! Cache Statistics Module
//!
//! Counters kept by the store and reported by `/stats`.

use serde::Serialize;

// == Cache Stats ==
/// Running counters for one cache. A snapshot is copied out under the cache
/// lock, so the fields are always mutually consistent.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Lookups that found a live entry (and refreshed its recency)
    pub hits: u64,
    /// Lookups for keys not in the table, whether never set, evicted or swept
    pub misses: u64,
    /// Entries dropped because a new key arrived at capacity
    pub evictions: u64,
    /// Entries dropped by the sweeper after sitting idle past the TTL
    pub expirations: u64,
    /// Live entries after the last mutation
    pub total_entries: usize,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Share of lookups served from the cache, 0.0 before the first lookup.
    pub fn hit_rate(&self) -> f64 {
        match self.hits + self.misses {
            0 => 0.0,
            total => self.hits as f64 / total as f64,
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    /// Counts one capacity eviction. Overwriting an existing key never lands here.
    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }

    /// Adds the number of entries removed by one sweep; empty sweeps add 0.
    pub fn record_expirations(&mut self, count: usize) {
        self.expirations += count as u64;
    }

    pub fn set_total_entries(&mut self, count: usize) {
        self.total_entries = count;
    }
}
