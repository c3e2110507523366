//! In-Process Store Module
//!
//! HashMap-backed key-value store with TTL expiration, mirroring the Redis
//! commands the rest of the crate relies on.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::{Result, StoreKitError};
use crate::store::{validate_ttl, EntryData, KeyValueStore, StoreEntry, StoreValue};

const WRONG_TYPE: &str = "WRONGTYPE Operation against a key holding the wrong kind of value";

// == Memory Store ==
/// In-process key-value store.
///
/// Clones share the same underlying map. Expired entries are dropped lazily
/// on access and in bulk by [`MemoryStore::purge_expired`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, StoreEntry>>>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Purge Expired ==
    /// Removes all expired entries.
    ///
    /// Returns the number of entries removed.
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        before - entries.len()
    }

    // == Time To Live ==
    /// Returns the remaining TTL of a live key, `None` if absent or persistent.
    pub async fn ttl_remaining(&self, key: &str) -> Option<Duration> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .and_then(StoreEntry::ttl_remaining)
    }

    // == Length ==
    /// Returns the number of entries held, including expired ones not yet purged.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    // == Is Empty ==
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

/// Returns the live entry at `key`, dropping it first if it has expired.
fn live_entry<'a>(
    entries: &'a mut HashMap<String, StoreEntry>,
    key: &str,
) -> Option<&'a mut StoreEntry> {
    if entries.get(key).is_some_and(StoreEntry::is_expired) {
        entries.remove(key);
    }
    entries.get_mut(key)
}

#[async_trait]
impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let mut entries = self.entries.write().await;
        match live_entry(&mut entries, key) {
            Some(StoreEntry {
                data: EntryData::Value(bytes),
                ..
            }) => Ok(Some(bytes.clone())),
            Some(_) => Err(StoreKitError::Store(WRONG_TYPE.to_string())),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: StoreValue) -> Result<()> {
        let entry = StoreEntry::new(EntryData::Value(value.into_bytes()), None);
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn set_with_expiry(&self, key: &str, value: StoreValue, ttl: Duration) -> Result<()> {
        validate_ttl(ttl)?;
        let entry = StoreEntry::new(EntryData::Value(value.into_bytes()), Some(ttl));
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn increment(&self, key: &str) -> Result<i64> {
        let mut entries = self.entries.write().await;
        match live_entry(&mut entries, key) {
            Some(entry) => {
                // Existing TTL is preserved, as with INCR
                let EntryData::Value(bytes) = &mut entry.data else {
                    return Err(StoreKitError::Store(WRONG_TYPE.to_string()));
                };
                let current: i64 = std::str::from_utf8(bytes)
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .ok_or_else(|| {
                        StoreKitError::Store("value is not an integer or out of range".to_string())
                    })?;
                let next = current.checked_add(1).ok_or_else(|| {
                    StoreKitError::Store("increment would overflow".to_string())
                })?;
                *bytes = next.to_string().into_bytes();
                Ok(next)
            }
            None => {
                entries.insert(
                    key.to_string(),
                    StoreEntry::new(EntryData::Value(b"1".to_vec()), None),
                );
                Ok(1)
            }
        }
    }

    async fn append_to_list(&self, key: &str, value: StoreValue) -> Result<usize> {
        let mut entries = self.entries.write().await;
        match live_entry(&mut entries, key) {
            Some(StoreEntry {
                data: EntryData::List(items),
                ..
            }) => {
                items.push(value.into_bytes());
                Ok(items.len())
            }
            Some(_) => Err(StoreKitError::Store(WRONG_TYPE.to_string())),
            None => {
                entries.insert(
                    key.to_string(),
                    StoreEntry::new(EntryData::List(vec![value.into_bytes()]), None),
                );
                Ok(1)
            }
        }
    }

    async fn list_range(&self, key: &str) -> Result<Vec<Vec<u8>>> {
        let mut entries = self.entries.write().await;
        match live_entry(&mut entries, key) {
            Some(StoreEntry {
                data: EntryData::List(items),
                ..
            }) => Ok(items.clone()),
            Some(_) => Err(StoreKitError::Store(WRONG_TYPE.to_string())),
            None => Ok(Vec::new()),
        }
    }

    async fn flush_all(&self) -> Result<()> {
        self.entries.write().await.clear();
        Ok(())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_new() {
        let store = MemoryStore::new();
        assert_eq!(store.len().await, 0);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_store_set_and_get() {
        let store = MemoryStore::new();

        store.set("key1", "value1".into()).await.unwrap();

        assert_eq!(store.get("key1").await.unwrap(), Some(b"value1".to_vec()));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_store_get_nonexistent() {
        let store = MemoryStore::new();
        assert_eq!(store.get("nonexistent").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_store_overwrite() {
        let store = MemoryStore::new();

        store.set("key1", "value1".into()).await.unwrap();
        store.set("key1", "value2".into()).await.unwrap();

        assert_eq!(store.get("key1").await.unwrap(), Some(b"value2".to_vec()));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = MemoryStore::new();
        let other = store.clone();

        store.set("shared", "yes".into()).await.unwrap();

        assert_eq!(other.get("shared").await.unwrap(), Some(b"yes".to_vec()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_store_ttl_expiration() {
        let store = MemoryStore::new();

        store
            .set_with_expiry("key1", "value1".into(), Duration::from_secs(1))
            .await
            .unwrap();
        assert!(store.get("key1").await.unwrap().is_some());

        tokio::time::advance(Duration::from_millis(1100)).await;

        assert_eq!(store.get("key1").await.unwrap(), None);
        assert!(store.is_empty().await, "Expired entry should be dropped on read");
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_clears_previous_ttl() {
        let store = MemoryStore::new();

        store
            .set_with_expiry("key1", "old".into(), Duration::from_secs(1))
            .await
            .unwrap();
        store.set("key1", "new".into()).await.unwrap();

        tokio::time::advance(Duration::from_secs(5)).await;

        assert_eq!(store.get("key1").await.unwrap(), Some(b"new".to_vec()));
        assert_eq!(store.ttl_remaining("key1").await, None);
    }

    #[tokio::test]
    async fn test_zero_ttl_is_invalid() {
        let store = MemoryStore::new();

        let result = store.set_with_expiry("key", "v".into(), Duration::ZERO).await;
        assert!(matches!(result, Err(StoreKitError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_increment() {
        let store = MemoryStore::new();

        assert_eq!(store.increment("counter").await.unwrap(), 1);
        assert_eq!(store.increment("counter").await.unwrap(), 2);

        store.set("preset", 41.into()).await.unwrap();
        assert_eq!(store.increment("preset").await.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_increment_non_integer_fails() {
        let store = MemoryStore::new();
        store.set("text", "abc".into()).await.unwrap();

        let result = store.increment("text").await;
        assert!(matches!(result, Err(StoreKitError::Store(_))));
        assert_eq!(store.get("text").await.unwrap(), Some(b"abc".to_vec()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_increment_keeps_ttl() {
        let store = MemoryStore::new();
        store
            .set_with_expiry("n", 1.into(), Duration::from_secs(10))
            .await
            .unwrap();

        store.increment("n").await.unwrap();

        assert_eq!(store.ttl_remaining("n").await, Some(Duration::from_secs(10)));
    }

    #[tokio::test]
    async fn test_list_append_and_range() {
        let store = MemoryStore::new();

        assert_eq!(store.append_to_list("list", "a".into()).await.unwrap(), 1);
        assert_eq!(store.append_to_list("list", "b".into()).await.unwrap(), 2);

        let items = store.list_range("list").await.unwrap();
        assert_eq!(items, vec![b"a".to_vec(), b"b".to_vec()]);
        assert!(store.list_range("missing").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_type_operations() {
        let store = MemoryStore::new();
        store.append_to_list("list", "a".into()).await.unwrap();
        store.set("plain", "x".into()).await.unwrap();

        assert!(matches!(store.get("list").await, Err(StoreKitError::Store(_))));
        assert!(matches!(store.increment("list").await, Err(StoreKitError::Store(_))));
        assert!(matches!(
            store.append_to_list("plain", "b".into()).await,
            Err(StoreKitError::Store(_))
        ));
    }

    #[tokio::test]
    async fn test_flush_all() {
        let store = MemoryStore::new();
        store.set("a", "1".into()).await.unwrap();
        store.append_to_list("b", "2".into()).await.unwrap();

        store.flush_all().await.unwrap();

        assert!(store.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let store = MemoryStore::new();

        store
            .set_with_expiry("key1", "value1".into(), Duration::from_secs(1))
            .await
            .unwrap();
        store
            .set_with_expiry("key2", "value2".into(), Duration::from_secs(10))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_millis(1100)).await;

        assert_eq!(store.purge_expired().await, 1);
        assert_eq!(store.len().await, 1);
        assert!(store.get("key2").await.unwrap().is_some());
    }
}
