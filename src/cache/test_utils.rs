//! Shared fixtures for cache tests.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::CacheStore;

/// Minimal keyed value used to exercise the generic cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: String,
    pub payload: String,
}

pub fn record(id: &str, payload: &str) -> Record {
    Record {
        id: id.to_string(),
        payload: payload.to_string(),
    }
}

pub fn record_key(record: &Record) -> String {
    record.id.clone()
}

pub fn record_store(capacity: usize, ttl: Duration) -> CacheStore<Record> {
    CacheStore::new(capacity, ttl, Arc::new(record_key)).unwrap()
}
