//! Memcached Driver
//!
//! Remote cache backend over the pooled memcache client. The client speaks
//! a blocking protocol, so every call runs on the tokio blocking pool.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::cache::Driver;
use crate::error::{CacheError, Result};

// == Memcached Driver ==
/// Cache backend backed by a Memcached server.
pub struct MemcachedDriver {
    client: Arc<memcache::Client>,
}

impl MemcachedDriver {
    // == Constructor ==
    /// Connects to a Memcached server, e.g. `memcache://127.0.0.1:11211`.
    pub fn connect(url: &str) -> Result<Self> {
        let client = memcache::connect(url).map_err(|e| CacheError::Driver(e.into()))?;
        Ok(Self {
            client: Arc::new(client),
        })
    }
}

/// Runs one blocking client call off the async runtime.
async fn blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> std::result::Result<T, memcache::MemcacheError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| CacheError::Driver(e.into()))?
        .map_err(|e| CacheError::Driver(e.into()))
}

#[async_trait]
impl Driver for MemcachedDriver {
    async fn set(&self, key: &str, data: Vec<u8>, ttl: Duration) -> Result<()> {
        let client = Arc::clone(&self.client);
        let key = key.to_string();
        blocking(move || client.set(&key, data.as_slice(), ttl.as_secs() as u32)).await
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        let client = Arc::clone(&self.client);
        let owned = key.to_string();
        let data: Option<Vec<u8>> = blocking(move || client.get(&owned)).await?;
        data.ok_or_else(|| CacheError::Missed(key.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let client = Arc::clone(&self.client);
        let key = key.to_string();
        // delete reports whether the key existed; absence is not an error
        blocking(move || client.delete(&key).map(|_| ())).await
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
