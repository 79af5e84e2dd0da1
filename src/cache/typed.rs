//! Typed Cache
//!
//! Generic value (de)serialization over a byte-oriented driver.

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::cache::Driver;
use crate::error::Result;

// == Typed Cache ==
/// Serializes values of one type into an underlying [`Driver`].
///
/// Keys are namespaced by prepending the configured prefix, so multiple
/// typed caches can share one backend without colliding.
pub struct Cache<T> {
    driver: Arc<dyn Driver>,
    prefix: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Cache<T> {
    fn clone(&self) -> Self {
        Self {
            driver: Arc::clone(&self.driver),
            prefix: self.prefix.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> Cache<T>
where
    T: Serialize + DeserializeOwned,
{
    // == Constructor ==
    /// Creates a typed cache over a driver.
    ///
    /// `prefix` is prepended verbatim to every key; pass an empty string
    /// for no namespacing.
    pub fn new(driver: Arc<dyn Driver>, prefix: impl Into<String>) -> Self {
        Self {
            driver,
            prefix: prefix.into(),
            _marker: PhantomData,
        }
    }

    fn full_key(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }

    // == Set ==
    /// Serializes and stores a value. A zero TTL means no expiry.
    pub async fn set(&self, key: &str, value: &T, ttl: Duration) -> Result<()> {
        let data = serde_json::to_vec(value)?;
        self.driver.set(&self.full_key(key), data, ttl).await
    }

    // == Get ==
    /// Fetches and deserializes a value.
    ///
    /// Fails with [`CacheError::Missed`](crate::error::CacheError::Missed)
    /// when the backend has no usable entry, and with
    /// [`CacheError::Codec`](crate::error::CacheError::Codec) when the
    /// stored bytes do not decode as `T`.
    pub async fn get(&self, key: &str) -> Result<T> {
        let data = self.driver.get(&self.full_key(key)).await?;
        Ok(serde_json::from_slice(&data)?)
    }

    // == Delete ==
    /// Removes a value.
    pub async fn delete(&self, key: &str) -> Result<()> {
        self.driver.delete(&self.full_key(key)).await
    }
}
