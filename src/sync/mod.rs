//! Cache-Sync Module
//!
//! Database-first synchronization engine that keeps a typed cache
//! consistent with an authoritative store, in blocking and fire-and-forget
//! consistency modes.

mod engine;
mod pending;

pub use engine::CacheSync;
