//! Redis Store Module
//!
//! Key-value store backed by a Redis server through a managed connection.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tracing::info;

use crate::error::{Result, StoreKitError};
use crate::store::{validate_ttl, KeyValueStore, StoreValue};

// == Redis Store ==
/// Redis-backed store.
///
/// The connection is established by [`RedisStore::connect`] and released when
/// the last clone is dropped. Clones share the managed connection, which
/// reconnects on its own after a dropped link.
#[derive(Clone)]
pub struct RedisStore {
    conn: ConnectionManager,
    url: String,
}

impl RedisStore {
    // == Connect ==
    /// Opens a managed connection to the server at `url`.
    pub async fn connect(url: &str) -> Result<Self> {
        let client = redis::Client::open(url)
            .map_err(|e| StoreKitError::Connection(format!("invalid Redis URL '{}': {}", url, e)))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| StoreKitError::Connection(e.to_string()))?;

        info!("Connected to Redis at {}", url);

        Ok(Self {
            conn,
            url: url.to_string(),
        })
    }
}

impl fmt::Debug for RedisStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedisStore").field("url", &self.url).finish()
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(key).await?;
        Ok(value)
    }

    async fn set(&self, key: &str, value: StoreValue) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = conn.set(key, value.into_bytes()).await?;
        Ok(())
    }

    async fn set_with_expiry(&self, key: &str, value: StoreValue, ttl: Duration) -> Result<()> {
        validate_ttl(ttl)?;
        let mut conn = self.conn.clone();
        // PSETEX keeps sub-second TTLs intact
        let millis = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX).max(1);
        let _: () = conn.pset_ex(key, value.into_bytes(), millis).await?;
        Ok(())
    }

    async fn increment(&self, key: &str) -> Result<i64> {
        let mut conn = self.conn.clone();
        let value: i64 = conn.incr(key, 1).await?;
        Ok(value)
    }

    async fn append_to_list(&self, key: &str, value: StoreValue) -> Result<usize> {
        let mut conn = self.conn.clone();
        let len: usize = conn.rpush(key, value.into_bytes()).await?;
        Ok(len)
    }

    async fn list_range(&self, key: &str) -> Result<Vec<Vec<u8>>> {
        let mut conn = self.conn.clone();
        let items: Vec<Vec<u8>> = conn.lrange(key, 0, -1).await?;
        Ok(items)
    }

    async fn flush_all(&self) -> Result<()> {
        let mut conn = self.conn.clone();
        let _: () = redis::cmd("FLUSHDB").query_async(&mut conn).await?;
        Ok(())
    }
}
