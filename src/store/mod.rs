//! Store Module
//!
//! Key-value store abstraction with an in-process backend and a Redis backend.

mod entry;
mod memory;
mod redis_store;
mod value;


use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::{Result, StoreKitError};

// Re-export public types
pub use entry::{EntryData, StoreEntry};
pub use memory::MemoryStore;
pub use redis_store::RedisStore;
pub use value::{FromStoreValue, StoreValue};

// == Key Value Store ==
/// Operations the key-value collaborator exposes.
///
/// Handles are cheap to clone and shared by reference; atomicity of
/// `increment` and enforcement of expiry belong to the backend.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Returns the raw bytes stored at `key`, or `None` if absent or expired.
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    /// Stores `value` without expiry, replacing any previous value and TTL.
    async fn set(&self, key: &str, value: StoreValue) -> Result<()>;

    /// Stores `value` so that it disappears after `ttl`.
    async fn set_with_expiry(&self, key: &str, value: StoreValue, ttl: Duration) -> Result<()>;

    /// Atomically adds one to the integer at `key` (missing counts as 0).
    async fn increment(&self, key: &str) -> Result<i64>;

    /// Appends `value` to the list at `key`, returning the new length.
    async fn append_to_list(&self, key: &str, value: StoreValue) -> Result<usize>;

    /// Returns every element of the list at `key`, empty if absent.
    async fn list_range(&self, key: &str) -> Result<Vec<Vec<u8>>>;

    /// Removes every key.
    async fn flush_all(&self) -> Result<()>;
}

#[async_trait]
impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        (**self).get(key).await
    }

    async fn set(&self, key: &str, value: StoreValue) -> Result<()> {
        (**self).set(key, value).await
    }

    async fn set_with_expiry(&self, key: &str, value: StoreValue, ttl: Duration) -> Result<()> {
        (**self).set_with_expiry(key, value, ttl).await
    }

    async fn increment(&self, key: &str) -> Result<i64> {
        (**self).increment(key).await
    }

    async fn append_to_list(&self, key: &str, value: StoreValue) -> Result<usize> {
        (**self).append_to_list(key, value).await
    }

    async fn list_range(&self, key: &str) -> Result<Vec<Vec<u8>>> {
        (**self).list_range(key).await
    }

    async fn flush_all(&self) -> Result<()> {
        (**self).flush_all().await
    }
}

/// Shared, type-erased store handle.
pub type SharedStore = Arc<dyn KeyValueStore>;

// == Typed Accessors ==
/// Typed reads layered on any [`KeyValueStore`].
///
/// A missing key is `Ok(None)`; a present value that does not decode as the
/// requested type is [`StoreKitError::Decode`].
#[async_trait]
pub trait StoreExt: KeyValueStore {
    async fn get_as<T: FromStoreValue>(&self, key: &str) -> Result<Option<T>> {
        match self.get(key).await? {
            Some(bytes) => T::from_store_bytes(&bytes)
                .map(Some)
                .ok_or_else(|| StoreKitError::Decode {
                    key: key.to_string(),
                    expected: T::EXPECTED,
                }),
            None => Ok(None),
        }
    }

    async fn get_str(&self, key: &str) -> Result<Option<String>> {
        self.get_as::<String>(key).await
    }

    async fn get_int(&self, key: &str) -> Result<Option<i64>> {
        self.get_as::<i64>(key).await
    }
}

impl<S: KeyValueStore + ?Sized> StoreExt for S {}

pub(crate) fn validate_ttl(ttl: Duration) -> Result<()> {
    if ttl.is_zero() {
        return Err(StoreKitError::InvalidRequest(
            "TTL must be greater than zero".to_string(),
        ));
    }
    Ok(())
}
