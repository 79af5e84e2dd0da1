//! syncache - database-first cache synchronization and safe list queries
//!
//! Keeps a read cache consistent with an authoritative data store under
//! blocking and fire-and-forget consistency modes, and turns untrusted
//! filter/sort/pagination parameters into parameterized queries for
//! relational and document stores.

pub mod cache;
pub mod config;
pub mod error;
pub mod query;
pub mod sync;

pub use cache::{Cache, Driver, InMemoryDriver, MemcachedDriver, RedisDriver};
pub use config::{CacheBackend, Config};
pub use error::{CacheError, Result};
pub use query::{
    build_count_query, build_document_query, build_query, DocumentQuery, FieldWhitelist,
    Paginated, Pagination,
};
pub use sync::CacheSync;
