//! Order Cache - an order lookup service fronted by a bounded in-memory cache
//!
//! Provides LRU eviction, idle-time expiry and snapshot warm start for cached orders.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod service;
pub mod tasks;

pub use api::AppState;
pub use cache::{BoundedCache, CacheConfig};
pub use config::Config;
pub use error::{CacheError, Result};
pub use tasks::{spawn_ingest_task, spawn_sweeper};
