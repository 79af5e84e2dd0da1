//! Cache Entry Module
//!
//! Defines the structure for individual byte entries with TTL support.

use std::time::{Duration, Instant};

// == Cache Entry ==
/// A single stored value with optional expiry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Serialized value bytes
    pub data: Vec<u8>,
    /// Absolute expiry instant, None = no expiration
    pub expires_at: Option<Instant>,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry.
    ///
    /// A zero TTL means the entry never expires.
    pub fn new(data: Vec<u8>, ttl: Duration) -> Self {
        let expires_at = if ttl.is_zero() {
            None
        } else {
            Some(Instant::now() + ttl)
        };

        Self { data, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// Boundary condition: an entry is considered expired when the current
    /// instant is greater than or equal to the expiry instant, so once the
    /// TTL has fully elapsed the entry is immediately expired.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => Instant::now() >= expires,
            None => false,
        }
    }
}
