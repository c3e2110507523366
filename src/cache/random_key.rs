//! Random-Key Cache Module
//!
//! Stores values under freshly generated UUID keys, with every `store` call
//! counted and its history recorded in the same store.

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::error::Result;
use crate::instrument::{replay, CallHistory, CountCalls, Operation, Replay};
use crate::store::{FromStoreValue, KeyValueStore, StoreExt, StoreValue};

/// Operation name used for the call counter and history keys of [`Cache::store`].
pub const STORE_OPERATION: &str = "Cache.store";

// == Store Data ==
/// Writes a value under a new random key and returns the key.
#[derive(Debug, Clone)]
struct StoreData<S> {
    store: S,
}

#[async_trait]
impl<S: KeyValueStore> Operation for StoreData<S> {
    type Input = StoreValue;
    type Output = String;

    fn name(&self) -> &str {
        STORE_OPERATION
    }

    async fn call(&self, data: StoreValue) -> Result<String> {
        let key = Uuid::new_v4().to_string();
        self.store.set(&key, data).await?;
        Ok(key)
    }
}

// == Cache ==
/// Random-key cache over a key-value store.
///
/// Construction flushes the store, so each `Cache` starts from an empty
/// keyspace.
pub struct Cache<S> {
    store: S,
    storer: CountCalls<CallHistory<StoreData<S>, S>, S>,
}

impl<S> Cache<S>
where
    S: KeyValueStore + Clone,
{
    // == Constructor ==
    /// Flushes `store` and wraps it.
    pub async fn new(store: S) -> Result<Self> {
        store.flush_all().await?;
        debug!("Cache store flushed");

        let storer = CountCalls::new(
            CallHistory::new(
                StoreData {
                    store: store.clone(),
                },
                store.clone(),
            ),
            store.clone(),
        );

        Ok(Self { store, storer })
    }

    // == Store ==
    /// Stores `data` under a new random key and returns the key.
    pub async fn store(&self, data: impl Into<StoreValue>) -> Result<String> {
        let value = data.into();
        self.storer.call(value).await
    }

    // == Get ==
    /// Reads the value at `key` back as `T`; `None` if never stored.
    pub async fn get<T: FromStoreValue>(&self, key: &str) -> Result<Option<T>> {
        self.store.get_as::<T>(key).await
    }

    /// Reads the value at `key` as a UTF-8 string.
    pub async fn get_str(&self, key: &str) -> Result<Option<String>> {
        self.store.get_str(key).await
    }

    /// Reads the value at `key` as an integer.
    pub async fn get_int(&self, key: &str) -> Result<Option<i64>> {
        self.store.get_int(key).await
    }

    // == Replay ==
    /// Returns how often `store` was called and with what.
    pub async fn replay(&self) -> Result<Replay> {
        replay(&self.store, STORE_OPERATION).await
    }
}
