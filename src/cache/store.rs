//! Cache Store Module
//!
//! Main cache engine combining the entry table with the eviction index.
//! Not synchronized; [`BoundedCache`](crate::cache::BoundedCache) wraps it in a mutex.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::debug;

use crate::cache::heap::{EvictionIndex, HeapPositions};
use crate::cache::{CacheEntry, CacheStats};
use crate::error::{CacheError, Result};

/// Extracts the cache key from a value.
pub type KeyFn<V> = Arc<dyn Fn(&V) -> String + Send + Sync>;

impl<V> HeapPositions for HashMap<String, CacheEntry<V>> {
    fn set_heap_pos(&mut self, key: &str, pos: usize) {
        if let Some(entry) = self.get_mut(key) {
            entry.heap_pos = pos;
        }
    }
}

// == Cache Store ==
/// Capacity-bounded entry table with LRU eviction and idle-time expiry.
pub struct CacheStore<V> {
    /// Key-value storage
    entries: HashMap<String, CacheEntry<V>>,
    /// Least-recently-used ordering over the same keys
    index: EvictionIndex,
    /// Performance statistics
    stats: CacheStats,
    /// Maximum number of entries allowed
    capacity: usize,
    /// Idle time after which an entry may be swept
    ttl: Duration,
    key_fn: KeyFn<V>,
    next_seq: u64,
}

impl<V> fmt::Debug for CacheStore<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheStore")
            .field("len", &self.entries.len())
            .field("capacity", &self.capacity)
            .field("ttl", &self.ttl)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}

impl<V> CacheStore<V> {
    // == Constructor ==
    /// Creates a new CacheStore with the given capacity, idle TTL and key extractor.
    ///
    /// Fails if `capacity` is zero.
    pub fn new(capacity: usize, ttl: Duration, key_fn: KeyFn<V>) -> Result<Self> {
        if capacity == 0 {
            return Err(CacheError::Config(
                "cache capacity must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            entries: HashMap::with_capacity(capacity),
            index: EvictionIndex::with_capacity(capacity),
            stats: CacheStats::new(),
            capacity,
            ttl,
            key_fn,
            next_seq: 0,
        })
    }

    // == Set ==
    /// Stores a value under the key extracted from it.
    ///
    /// An existing key is updated in place: the value is replaced, its recency
    /// refreshed, and nothing is evicted. A new key on a full table evicts
    /// exactly one entry, the least recently used.
    pub fn set(&mut self, value: V) -> Result<()> {
        let key = (self.key_fn)(&value);
        let now = Instant::now();
        let seq = self.bump_seq();

        if let Some(entry) = self.entries.get_mut(&key) {
            entry.value = value;
            entry.touch(now, seq);
            let (pos, recency) = (entry.heap_pos, entry.recency());
            self.index.update(pos, recency, &mut self.entries);
            return Ok(());
        }

        if self.entries.len() >= self.capacity {
            if let Some(evicted) = self.index.pop(&mut self.entries) {
                self.entries.remove(&evicted);
                self.stats.record_eviction();
                debug!(key = %evicted, "Evicted least recently used entry");
            }
        }

        let entry = CacheEntry::new(key.clone(), value, now, seq);
        let recency = entry.recency();
        self.entries.insert(key.clone(), entry);
        self.index.push(key, recency, &mut self.entries);

        self.stats.set_total_entries(self.entries.len());
        Ok(())
    }

    // == Get ==
    /// Retrieves a value by key and marks it as most recently used.
    ///
    /// A miss leaves the table and index untouched.
    pub fn get(&mut self, key: &str) -> Option<V>
    where
        V: Clone,
    {
        let seq = self.next_seq;
        let Some(entry) = self.entries.get_mut(key) else {
            self.stats.record_miss();
            return None;
        };
        self.next_seq += 1;

        entry.touch(Instant::now(), seq);
        let (pos, recency, value) = (entry.heap_pos, entry.recency(), entry.value.clone());
        self.index.update(pos, recency, &mut self.entries);

        self.stats.record_hit();
        Some(value)
    }

    // == Remove Expired ==
    /// Removes every entry idle for longer than the TTL.
    ///
    /// Returns the number of entries removed.
    pub fn remove_expired(&mut self) -> usize {
        self.remove_expired_at(Instant::now())
    }

    /// Same as [`remove_expired`](Self::remove_expired) with an explicit clock reading.
    pub fn remove_expired_at(&mut self, now: Instant) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .values()
            .filter(|entry| entry.is_expired(self.ttl, now))
            .map(|entry| entry.key.clone())
            .collect();

        for key in &expired_keys {
            // Positions shift as the heap is repaired, so look each one up fresh.
            if let Some(pos) = self.entries.get(key).map(|entry| entry.heap_pos) {
                self.index.remove(pos, &mut self.entries);
                self.entries.remove(key);
            }
        }

        let count = expired_keys.len();
        self.stats.record_expirations(count);
        self.stats.set_total_entries(self.entries.len());
        count
    }

    // == Values ==
    /// Iterates all live values in table order.
    pub fn values(&self) -> impl Iterator<Item = &V> {
        self.entries.values().map(|entry| &entry.value)
    }

    // == Contains ==
    /// Checks for a key without refreshing its recency.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    // == Peek LRU ==
    /// Returns the key that the next eviction would remove.
    pub fn peek_lru(&self) -> Option<&str> {
        self.index.peek()
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut stats = self.stats.clone();
        stats.set_total_entries(self.entries.len());
        stats
    }

    // == Consistency ==
    /// Checks that the table and index hold the same keys, that every entry's
    /// `heap_pos` matches its slot, and that heap order holds.
    pub fn is_consistent(&self) -> bool {
        self.entries.len() == self.index.len()
            && self.entries.iter().all(|(key, entry)| {
                entry.key == *key && self.index.key_at(entry.heap_pos) == Some(key.as_str())
            })
            && self.index.is_heap_ordered()
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn bump_seq(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}
