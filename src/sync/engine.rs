//! Cache-Sync Engine
//!
//! Orchestrates read-through and write-through between an authoritative
//! store callback and a typed cache, in blocking and fire-and-forget
//! consistency modes.
//!
//! The store is always the source of truth: every write hits the store
//! first, and a store failure is always fatal to the calling operation.
//! Cache failures are logged and swallowed, so a cache outage degrades the
//! system to "always fetch from store", never to unavailability.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::cache::Cache;
use crate::sync::pending::PendingTasks;

// == Cache Sync ==
/// Database-first synchronization between a store and a typed cache.
///
/// The blocking operations (`get`, `set`, `delete`) apply the cache
/// mutation before returning; their `*_async` counterparts dispatch it as
/// a tracked background task after the store callback succeeds, trading
/// consistency for latency. The eventual-consistency window of the async
/// mode is bounded by the entry TTL.
pub struct CacheSync<T> {
    cache: Cache<T>,
    name: String,
    ttl: Duration,
    pending: Arc<PendingTasks>,
}

impl<T> Clone for CacheSync<T> {
    fn clone(&self) -> Self {
        Self {
            cache: self.cache.clone(),
            name: self.name.clone(),
            ttl: self.ttl,
            pending: Arc::clone(&self.pending),
        }
    }
}

impl<T> CacheSync<T>
where
    T: Serialize + DeserializeOwned + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates an engine that writes cache entries with the given TTL.
    ///
    /// `name` is recorded on every log event emitted by this instance, so
    /// cache failures can be traced back to the engine that produced them.
    /// A zero TTL caches entries without expiry.
    pub fn new(cache: Cache<T>, name: impl Into<String>, ttl: Duration) -> Self {
        Self {
            cache,
            name: name.into(),
            ttl,
            pending: Arc::new(PendingTasks::new()),
        }
    }

    // == Synchronous Mode ==

    /// Read-through get.
    ///
    /// On a cache hit the cached value is returned and `fetch` is never
    /// invoked. On a miss, `fetch` reads the authoritative store; its
    /// result is written to the cache best-effort and returned. A `fetch`
    /// error propagates unchanged and leaves the cache untouched.
    pub async fn get<F, Fut>(&self, key: &str, fetch: F) -> anyhow::Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        if let Some(value) = self.cache_read(key).await {
            return Ok(value);
        }

        let value = fetch().await?;
        if let Err(e) = self.cache.set(key, &value, self.ttl).await {
            warn!(engine = %self.name, key, error = %e, "cache fill failed");
        }
        Ok(value)
    }

    /// Write-through set: `persist` writes the authoritative store first,
    /// and only on its success is the value mirrored into the cache.
    ///
    /// A `persist` error propagates unchanged and the cache is left
    /// untouched, so a failed write can never leave stale cache data.
    pub async fn set<F, Fut>(&self, key: &str, value: &T, persist: F) -> anyhow::Result<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<()>>,
    {
        persist().await?;
        if let Err(e) = self.cache.set(key, value, self.ttl).await {
            warn!(engine = %self.name, key, error = %e, "cache write failed");
        }
        Ok(())
    }

    /// Write-through delete: `delete` removes from the authoritative store
    /// first, and only on its success is the cache entry removed.
    pub async fn delete<F, Fut>(&self, key: &str, delete: F) -> anyhow::Result<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<()>>,
    {
        delete().await?;
        if let Err(e) = self.cache.delete(key).await {
            warn!(engine = %self.name, key, error = %e, "cache delete failed");
        }
        Ok(())
    }

    // == Asynchronous Mode ==
    //
    // The store callback still runs inline and its error still propagates
    // synchronously; only the cache mutation that follows a successful
    // callback is dispatched in the background. No ordering is guaranteed
    // between two concurrent async operations on the same key.

    /// Like [`get`](Self::get), but the cache fill after a successful
    /// fetch happens in the background.
    pub async fn get_async<F, Fut>(&self, key: &str, fetch: F) -> anyhow::Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
        T: Clone,
    {
        if let Some(value) = self.cache_read(key).await {
            return Ok(value);
        }

        let value = fetch().await?;
        self.spawn_set(key, value.clone());
        Ok(value)
    }

    /// Like [`set`](Self::set), but the cache write after a successful
    /// persist happens in the background.
    pub async fn set_async<F, Fut>(&self, key: &str, value: T, persist: F) -> anyhow::Result<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<()>>,
    {
        persist().await?;
        self.spawn_set(key, value);
        Ok(())
    }

    /// Like [`delete`](Self::delete), but the cache removal after a
    /// successful store delete happens in the background.
    pub async fn delete_async<F, Fut>(&self, key: &str, delete: F) -> anyhow::Result<()>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<()>>,
    {
        delete().await?;
        self.spawn_delete(key);
        Ok(())
    }

    // == Lifecycle ==

    /// Waits for every outstanding background cache mutation to finish.
    ///
    /// Call before shutdown when the process must not drop dispatched
    /// cache writes on the floor.
    pub async fn flush(&self) {
        self.pending.wait_idle().await;
    }

    /// Number of background cache mutations still in flight.
    pub fn pending_mutations(&self) -> usize {
        self.pending.len()
    }

    // == Internals ==

    /// Cache read that treats every failure as a miss. Backend failures
    /// are logged; the caller falls back to the authoritative store either
    /// way.
    async fn cache_read(&self, key: &str) -> Option<T> {
        match self.cache.get(key).await {
            Ok(value) => Some(value),
            Err(e) if e.is_miss() => None,
            Err(e) => {
                warn!(engine = %self.name, key, error = %e, "cache read failed");
                None
            }
        }
    }

    fn spawn_set(&self, key: &str, value: T) {
        let cache = self.cache.clone();
        let name = self.name.clone();
        let key = key.to_string();
        let ttl = self.ttl;
        let pending = Arc::clone(&self.pending);

        pending.start();
        tokio::spawn(async move {
            if let Err(e) = cache.set(&key, &value, ttl).await {
                warn!(engine = %name, key = %key, error = %e, "async cache write failed");
            }
            pending.finish();
        });
    }

    fn spawn_delete(&self, key: &str) {
        let cache = self.cache.clone();
        let name = self.name.clone();
        let key = key.to_string();
        let pending = Arc::clone(&self.pending);

        pending.start();
        tokio::spawn(async move {
            if let Err(e) = cache.delete(&key).await {
                warn!(engine = %name, key = %key, error = %e, "async cache delete failed");
            }
            pending.finish();
        });
    }
}
