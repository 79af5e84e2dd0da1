//! Error types for the cache layer
//!
//! Provides unified error handling using thiserror.

use thiserror::Error;

// == Cache Error Enum ==
/// Unified error type for the cache subsystem.
///
/// Store/persistence errors never appear here: callbacks supplied to the
/// sync engine carry their own opaque errors. This enum only describes
/// what can go wrong on the cache side.
#[derive(Error, Debug)]
pub enum CacheError {
    /// Cache has no usable entry for the key (absent or expired)
    #[error("cache missed: {0}")]
    Missed(String),

    /// Value serialization or deserialization failed
    #[error("codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// The underlying cache backend failed
    #[error("driver error: {0}")]
    Driver(#[source] anyhow::Error),
}

impl CacheError {
    /// Returns true for a plain cache miss, as opposed to a codec or
    /// backend failure.
    pub fn is_miss(&self) -> bool {
        matches!(self, CacheError::Missed(_))
    }
}

// == Result Type Alias ==
/// Convenience Result type for the cache layer.
pub type Result<T> = std::result::Result<T, CacheError>;
