//! In-Memory Driver
//!
//! Process-local cache backend with lazy TTL expiry.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::{CacheEntry, Driver};
use crate::error::{CacheError, Result};

// == In-Memory Driver ==
/// Lock-guarded map backend.
///
/// Expired entries are evicted lazily by the `get` that observes them,
/// never by a background sweep. Entries with no expiry stay until deleted
/// or overwritten.
#[derive(Debug, Default)]
pub struct InMemoryDriver {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl InMemoryDriver {
    // == Constructor ==
    /// Creates an empty in-memory driver.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    // == Length ==
    /// Returns the current number of stored entries, live or expired.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    // == Is Empty ==
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl Driver for InMemoryDriver {
    async fn set(&self, key: &str, data: Vec<u8>, ttl: Duration) -> Result<()> {
        let mut entries = self.entries.write().await;
        entries.insert(key.to_string(), CacheEntry::new(data, ttl));
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        // Fast path: shared lock is enough for a live entry.
        {
            let entries = self.entries.read().await;
            match entries.get(key) {
                Some(entry) if !entry.is_expired() => return Ok(entry.data.clone()),
                Some(_) => {} // expired, evict below under the exclusive lock
                None => return Err(CacheError::Missed(key.to_string())),
            }
        }

        // Re-check under the exclusive lock: a concurrent set may have
        // replaced the entry since the shared-lock observation, and that
        // replacement must not be clobbered.
        let mut entries = self.entries.write().await;
        match entries.get(key) {
            Some(entry) if entry.is_expired() => {
                entries.remove(key);
                Err(CacheError::Missed(key.to_string()))
            }
            Some(entry) => Ok(entry.data.clone()),
            None => Err(CacheError::Missed(key.to_string())),
        }
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
