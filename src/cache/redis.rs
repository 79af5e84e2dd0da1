//! Redis Driver
//!
//! Remote cache backend over a multiplexed, auto-reconnecting Redis
//! connection.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use crate::cache::Driver;
use crate::error::{CacheError, Result};

// == Redis Driver ==
/// Cache backend backed by a Redis server.
///
/// The connection manager is cheap to clone and reconnects on its own, so
/// each operation works on a clone rather than serializing on a shared
/// handle.
#[derive(Clone)]
pub struct RedisDriver {
    conn: ConnectionManager,
}

impl RedisDriver {
    // == Constructor ==
    /// Connects to a Redis server, e.g. `redis://127.0.0.1:6379`.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url).map_err(|e| CacheError::Driver(e.into()))?;
        let conn = client
            .get_connection_manager()
            .await
            .map_err(|e| CacheError::Driver(e.into()))?;
        Ok(Self { conn })
    }
}

#[async_trait]
impl Driver for RedisDriver {
    async fn set(&self, key: &str, data: Vec<u8>, ttl: Duration) -> Result<()> {
        let mut conn = self.conn.clone();
        if ttl.is_zero() {
            conn.set::<_, _, ()>(key, data)
                .await
                .map_err(|e| CacheError::Driver(e.into()))?;
        } else {
            // Redis rejects SET EX 0, so sub-second TTLs round up to one second.
            conn.set_ex::<_, _, ()>(key, data, ttl.as_secs().max(1))
                .await
                .map_err(|e| CacheError::Driver(e.into()))?;
        }
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Vec<u8>> {
        let mut conn = self.conn.clone();
        let data: Option<Vec<u8>> = conn
            .get(key)
            .await
            .map_err(|e| CacheError::Driver(e.into()))?;
        data.ok_or_else(|| CacheError::Missed(key.to_string()))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(key)
            .await
            .map_err(|e| CacheError::Driver(e.into()))?;
        Ok(())
    }

    async fn close(&self) -> Result<()> {
        // The connection closes when the last manager clone is dropped.
        Ok(())
    }
}
