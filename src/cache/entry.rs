//! Cache Entry Module
//!
//! Defines a single cached value together with its recency metadata.

use std::time::Duration;

use tokio::time::Instant;

use crate::cache::heap::Recency;

// == Cache Entry ==
/// Represents a single cache entry with value and recency metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    /// Key extracted from the value at insertion time
    pub key: String,
    /// The stored value
    pub value: V,
    /// Last time the entry was inserted or read
    pub last_used: Instant,
    /// Access sequence number, breaks ties between equal `last_used` stamps
    pub access_seq: u64,
    /// Slot of this entry in the eviction index. Maintained by the index only.
    pub heap_pos: usize,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new entry stamped with the given access time.
    ///
    /// `heap_pos` is provisional until the entry is pushed onto the index.
    pub fn new(key: String, value: V, last_used: Instant, access_seq: u64) -> Self {
        Self {
            key,
            value,
            last_used,
            access_seq,
            heap_pos: 0,
        }
    }

    // == Touch ==
    /// Records an access at `now`.
    pub fn touch(&mut self, now: Instant, access_seq: u64) {
        self.last_used = now;
        self.access_seq = access_seq;
    }

    // == Recency ==
    /// Returns the ordering key used by the eviction index.
    pub fn recency(&self) -> Recency {
        Recency {
            last_used: self.last_used,
            seq: self.access_seq,
        }
    }

    // == Idle Time ==
    /// Time elapsed since the last access, measured at `now`.
    pub fn idle_for(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.last_used)
    }

    // == Is Expired ==
    /// Checks whether the entry has been idle for strictly longer than `ttl`.
    ///
    /// An entry idle for exactly `ttl` is still live.
    pub fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        self.idle_for(now) > ttl
    }
}
