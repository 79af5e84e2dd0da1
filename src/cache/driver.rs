//! Cache Driver Interface
//!
//! Byte-oriented contract implemented by the in-memory, Redis and
//! Memcached backends.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;

// == Driver Trait ==
/// Byte-oriented cache backend.
///
/// `get` must fail with [`CacheError::Missed`](crate::error::CacheError::Missed)
/// when the key is absent or expired, so callers can match misses uniformly
/// across backends instead of inspecting backend-specific errors.
#[async_trait]
pub trait Driver: Send + Sync {
    /// Stores raw bytes under a key. A zero TTL means no expiry.
    async fn set(&self, key: &str, data: Vec<u8>, ttl: Duration) -> Result<()>;

    /// Retrieves raw bytes by key.
    async fn get(&self, key: &str) -> Result<Vec<u8>>;

    /// Removes a key. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Releases any resources held by the backend.
    async fn close(&self) -> Result<()>;
}
