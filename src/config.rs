//! Configuration Module
//!
//! Handles loading cache-layer settings from environment variables and
//! building the configured driver.

use std::env;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::{Driver, InMemoryDriver, MemcachedDriver, RedisDriver};
use crate::error::Result;

// == Cache Backend ==
/// Which driver the cache layer runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheBackend {
    #[default]
    Memory,
    Redis,
    Memcached,
}

impl CacheBackend {
    /// Parses a backend name, falling back to the in-process map.
    fn parse(raw: &str) -> Self {
        match raw {
            "redis" => Self::Redis,
            "memcached" => Self::Memcached,
            _ => Self::Memory,
        }
    }
}

/// Cache-layer configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Selected cache backend
    pub backend: CacheBackend,
    /// Connection URL for remote backends, e.g. `redis://127.0.0.1:6379`
    pub url: String,
    /// Prefix prepended to every cache key
    pub prefix: String,
    /// Default TTL in seconds for cache entries (0 = no expiry)
    pub default_ttl: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_BACKEND` - `memory`, `redis` or `memcached` (default: memory)
    /// - `CACHE_URL` - connection URL for remote backends (default: empty)
    /// - `CACHE_PREFIX` - key prefix (default: empty)
    /// - `CACHE_DEFAULT_TTL` - default TTL in seconds (default: 300)
    pub fn from_env() -> Self {
        Self {
            backend: CacheBackend::parse(&env::var("CACHE_BACKEND").unwrap_or_default()),
            url: env::var("CACHE_URL").unwrap_or_default(),
            prefix: env::var("CACHE_PREFIX").unwrap_or_default(),
            default_ttl: env::var("CACHE_DEFAULT_TTL")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(300),
        }
    }

    /// Default TTL as a duration.
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.default_ttl)
    }

    /// Builds the configured cache driver.
    pub async fn connect(&self) -> Result<Arc<dyn Driver>> {
        match self.backend {
            CacheBackend::Memory => Ok(Arc::new(InMemoryDriver::new())),
            CacheBackend::Redis => Ok(Arc::new(RedisDriver::connect(&self.url).await?)),
            CacheBackend::Memcached => Ok(Arc::new(MemcachedDriver::connect(&self.url)?)),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend: CacheBackend::Memory,
            url: String::new(),
            prefix: String::new(),
            default_ttl: 300,
        }
    }
}
