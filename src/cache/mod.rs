//! Cache Module
//!
//! Provides a bounded in-memory cache with LRU eviction, idle-time expiry and
//! snapshot warm start.

mod bounded;
mod entry;
mod heap;
mod snapshot;
mod stats;
mod store;

#[cfg(test)]
pub(crate) mod test_utils;

// Re-export public types
pub use bounded::{BoundedCache, CacheConfig, DEFAULT_SWEEP_INTERVAL};
pub use entry::CacheEntry;
pub use heap::{EvictionIndex, HeapPositions, Recency};
pub use stats::CacheStats;
pub use store::{CacheStore, KeyFn};
