//! Cache Module
//!
//! Byte-oriented cache drivers with TTL support and a typed serialization
//! layer on top of them.

mod driver;
mod entry;
mod memcached;
mod memory;
mod redis;
mod typed;

// Re-export public types
pub use driver::Driver;
pub use entry::CacheEntry;
pub use memcached::MemcachedDriver;
pub use memory::InMemoryDriver;
pub use self::redis::RedisDriver;
pub use typed::Cache;
