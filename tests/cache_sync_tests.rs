//! Cache-Sync Integration Tests
//!
//! Exercises the full database-first flow: a fake authoritative store, a
//! typed cache over the in-memory driver, and the sync engine orchestrating
//! read-through and write-through in both consistency modes.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use syncache::{Cache, CacheError, CacheSync, Driver, InMemoryDriver};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct User {
    id: u64,
    name: String,
}

/// Fake authoritative store standing in for a database.
#[derive(Default)]
struct UserStore {
    rows: Mutex<HashMap<u64, User>>,
    reads: Mutex<u64>,
}

impl UserStore {
    async fn insert(&self, user: User) {
        self.rows.lock().await.insert(user.id, user);
    }

    async fn fetch(&self, id: u64) -> anyhow::Result<User> {
        *self.reads.lock().await += 1;
        self.rows
            .lock()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| anyhow!("user {id} not found"))
    }

    async fn delete(&self, id: u64) -> anyhow::Result<()> {
        self.rows
            .lock()
            .await
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| anyhow!("user {id} not found"))
    }

    async fn read_count(&self) -> u64 {
        *self.reads.lock().await
    }
}

/// Driver whose every operation fails, simulating a cache outage.
struct BrokenDriver;

#[async_trait]
impl Driver for BrokenDriver {
    async fn set(&self, _key: &str, _data: Vec<u8>, _ttl: Duration) -> syncache::Result<()> {
        Err(CacheError::Driver(anyhow!("backend down")))
    }

    async fn get(&self, _key: &str) -> syncache::Result<Vec<u8>> {
        Err(CacheError::Driver(anyhow!("backend down")))
    }

    async fn delete(&self, _key: &str) -> syncache::Result<()> {
        Err(CacheError::Driver(anyhow!("backend down")))
    }

    async fn close(&self) -> syncache::Result<()> {
        Ok(())
    }
}

/// Opt-in log output for debugging, e.g. `RUST_LOG=syncache=warn`.
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn engine_over(driver: Arc<dyn Driver>) -> CacheSync<User> {
    init_tracing();
    let cache: Cache<User> = Cache::new(driver, "user:");
    CacheSync::new(cache, "users", Duration::from_secs(60))
}

fn sample_user() -> User {
    User {
        id: 7,
        name: "amir".to_string(),
    }
}

#[tokio::test]
async fn test_read_through_hits_store_once() {
    let store = Arc::new(UserStore::default());
    store.insert(sample_user()).await;

    let engine = engine_over(Arc::new(InMemoryDriver::new()));

    for _ in 0..3 {
        let user = engine.get("7", || store.fetch(7)).await.unwrap();
        assert_eq!(user, sample_user());
    }

    // First read filled the cache; the rest were served from it.
    assert_eq!(store.read_count().await, 1);
}

#[tokio::test]
async fn test_write_through_lifecycle() {
    let store = Arc::new(UserStore::default());
    let driver = Arc::new(InMemoryDriver::new());
    let engine = engine_over(Arc::clone(&driver) as Arc<dyn Driver>);

    // Create: store first, cache mirrored in the background.
    let user = sample_user();
    engine
        .set_async("7", user.clone(), || async {
            store.insert(user.clone()).await;
            Ok(())
        })
        .await
        .unwrap();
    engine.flush().await;
    assert_eq!(driver.len().await, 1);

    // Read comes from cache; the store is never consulted.
    let cached = engine.get("7", || store.fetch(7)).await.unwrap();
    assert_eq!(cached, sample_user());
    assert_eq!(store.read_count().await, 0);

    // Delete: store first, cache invalidated in the background.
    engine
        .delete_async("7", || store.delete(7))
        .await
        .unwrap();
    engine.flush().await;
    assert_eq!(driver.len().await, 0);

    // The next read misses everywhere and surfaces the store error.
    let result = engine.get("7", || store.fetch(7)).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_store_failure_is_visible_cache_untouched() {
    let store = Arc::new(UserStore::default());
    let driver = Arc::new(InMemoryDriver::new());
    let engine = engine_over(Arc::clone(&driver) as Arc<dyn Driver>);

    // The store rejects the delete (row does not exist).
    let result = engine.delete_async("7", || store.delete(7)).await;
    assert!(result.is_err());

    engine.flush().await;
    assert_eq!(engine.pending_mutations(), 0);
    assert!(driver.is_empty().await);
}

#[tokio::test]
async fn test_cache_outage_degrades_to_store_reads() {
    let store = Arc::new(UserStore::default());
    store.insert(sample_user()).await;

    let engine = engine_over(Arc::new(BrokenDriver));

    // Every read goes to the store, but every read succeeds.
    for _ in 0..3 {
        let user = engine.get("7", || store.fetch(7)).await.unwrap();
        assert_eq!(user, sample_user());
    }
    assert_eq!(store.read_count().await, 3);

    // Async writes still succeed; the cache error is swallowed.
    let user = sample_user();
    engine
        .set_async("7", user.clone(), || async { Ok(()) })
        .await
        .unwrap();
    engine.flush().await;
}

#[tokio::test]
async fn test_ttl_bounds_staleness() {
    let store = Arc::new(UserStore::default());
    store.insert(sample_user()).await;

    let driver = Arc::new(InMemoryDriver::new());
    let cache: Cache<User> = Cache::new(Arc::clone(&driver) as Arc<dyn Driver>, "user:");
    let engine = CacheSync::new(cache, "users", Duration::from_millis(40));

    engine.get("7", || store.fetch(7)).await.unwrap();
    assert_eq!(store.read_count().await, 1);

    // After the TTL elapses the cache entry is gone and the store is
    // consulted again.
    tokio::time::sleep(Duration::from_millis(70)).await;
    engine.get("7", || store.fetch(7)).await.unwrap();
    assert_eq!(store.read_count().await, 2);
}
