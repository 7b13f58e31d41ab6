//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::error::{CacheError, Result};

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of orders the cache can hold
    pub cache_capacity: usize,
    /// Idle time in seconds after which a cached order is dropped
    pub cache_ttl: u64,
    /// Expiry sweep interval in seconds
    pub sweep_interval: u64,
    /// Warm-start snapshot file, unset disables persistence
    pub snapshot_path: Option<PathBuf>,
    /// HTTP server port
    pub server_port: u16,
    /// Read newline-delimited order JSON from stdin as the ingestion feed
    pub ingest_stdin: bool,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_CAPACITY` - Maximum cached orders (default: 1000)
    /// - `CACHE_TTL` - Idle TTL in seconds (default: 3600)
    /// - `SWEEP_INTERVAL` - Expiry sweep frequency in seconds (default: 30)
    /// - `CACHE_SNAPSHOT_PATH` - Snapshot file (default: unset)
    /// - `SERVER_PORT` - HTTP server port (default: 8080)
    /// - `INGEST_STDIN` - `true`/`1` to ingest orders from stdin (default: false)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cache_capacity: parse_var("CACHE_CAPACITY").unwrap_or(defaults.cache_capacity),
            cache_ttl: parse_var("CACHE_TTL").unwrap_or(defaults.cache_ttl),
            sweep_interval: parse_var("SWEEP_INTERVAL").unwrap_or(defaults.sweep_interval),
            snapshot_path: env::var("CACHE_SNAPSHOT_PATH")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
            server_port: parse_var("SERVER_PORT").unwrap_or(defaults.server_port),
            ingest_stdin: env::var("INGEST_STDIN")
                .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.ingest_stdin),
        }
    }

    /// Rejects values the cache cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.cache_capacity == 0 {
            return Err(CacheError::Config(
                "CACHE_CAPACITY must be greater than zero".to_string(),
            ));
        }
        if self.sweep_interval == 0 {
            return Err(CacheError::Config(
                "SWEEP_INTERVAL must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// Cache construction parameters derived from this configuration.
    pub fn cache_config(&self) -> CacheConfig {
        CacheConfig {
            capacity: self.cache_capacity,
            ttl: Duration::from_secs(self.cache_ttl),
            sweep_interval: Duration::from_secs(self.sweep_interval),
            snapshot_path: self.snapshot_path.clone(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cache_capacity: 1000,
            cache_ttl: 3600,
            sweep_interval: 30,
            snapshot_path: None,
            server_port: 8080,
            ingest_stdin: false,
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.trim().parse().ok())
}
