//! Expiring, access-counting page cache.

use std::time::Duration;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{Result, StoreKitError};
use crate::instrument::Operation;
use crate::store::{KeyValueStore, StoreExt, StoreValue};

/// How long fetched content stays cached.
pub const PAGE_TTL: Duration = Duration::from_secs(10);

/// Store key of the access counter for `url`.
pub fn count_key(url: &str) -> String {
    format!("count:{}", url)
}

/// Store key of the cached content for `url`.
pub fn cache_key(url: &str) -> String {
    format!("cache:{}", url)
}

// == Cached Page ==
/// Wraps a page fetch with an access counter and a [`PAGE_TTL`] content cache.
///
/// Every call increments `count:{url}`, hit or miss. A hit returns the content
/// stored at `cache:{url}`; a miss runs the inner fetch and stores its result
/// with [`PAGE_TTL`]. A failed fetch caches nothing.
///
/// The lookup and write-back are not atomic: concurrent misses on one URL
/// each fetch, and the last write wins.
#[derive(Debug, Clone)]
pub struct CachedPage<O, S> {
    inner: O,
    store: S,
}

impl<O, S> CachedPage<O, S>
where
    O: Operation<Input = String, Output = String>,
    S: KeyValueStore,
{
    /// Wraps `inner`, keeping counters and content in `store`.
    pub fn new(inner: O, store: S) -> Self {
        Self { inner, store }
    }

    /// Number of times `url` has been requested through this cache (0 if never).
    pub async fn access_count(&self, url: &str) -> Result<i64> {
        Ok(self.store.get_int(&count_key(url)).await?.unwrap_or(0))
    }
}

#[async_trait]
impl<O, S> Operation for CachedPage<O, S>
where
    O: Operation<Input = String, Output = String>,
    S: KeyValueStore,
{
    type Input = String;
    type Output = String;

    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn call(&self, url: String) -> Result<String> {
        if url.is_empty() {
            return Err(StoreKitError::InvalidRequest(
                "URL cannot be empty".to_string(),
            ));
        }

        let count = self.store.increment(&count_key(&url)).await?;

        let key = cache_key(&url);
        if let Some(content) = self.store.get_str(&key).await? {
            debug!("Cache hit for {} (access #{})", url, count);
            return Ok(content);
        }

        debug!("Cache miss for {} (access #{})", url, count);
        let content = self.inner.call(url).await?;
        self.store
            .set_with_expiry(&key, StoreValue::Str(content.clone()), PAGE_TTL)
            .await?;

        Ok(content)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use crate::store::MemoryStore;

    /// Fetcher double that counts calls and can be told to fail.
    #[derive(Clone, Default)]
    struct FakeFetcher {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl FakeFetcher {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Operation for FakeFetcher {
        type Input = String;
        type Output = String;

        fn name(&self) -> &str {
            "fake_get_page"
        }

        async fn call(&self, url: String) -> Result<String> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if self.fail {
                return Err(StoreKitError::Http(format!("500 for {}", url)));
            }
            Ok(format!("<html>{} v{}</html>", url, n))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_fetch_misses_and_caches() {
        let fetcher = FakeFetcher::default();
        let store = MemoryStore::new();
        let pages = CachedPage::new(fetcher.clone(), store.clone());

        let content = pages.call("http://a".to_string()).await.unwrap();

        assert_eq!(content, "<html>http://a v1</html>");
        assert_eq!(fetcher.calls(), 1);
        assert_eq!(
            store.get_str("cache:http://a").await.unwrap(),
            Some(content)
        );
        assert_eq!(store.ttl_remaining("cache:http://a").await, Some(PAGE_TTL));
    }

    #[tokio::test]
    async fn test_second_fetch_within_ttl_hits() {
        let fetcher = FakeFetcher::default();
        let pages = CachedPage::new(fetcher.clone(), MemoryStore::new());

        let first = pages.call("http://a".to_string()).await.unwrap();
        let second = pages.call("http://a".to_string()).await.unwrap();

        assert_eq!(first, second);
        assert_eq!(fetcher.calls(), 1);
        assert_eq!(pages.access_count("http://a").await.unwrap(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fetch_after_ttl_refetches() {
        let fetcher = FakeFetcher::default();
        let pages = CachedPage::new(fetcher.clone(), MemoryStore::new());

        pages.call("http://a".to_string()).await.unwrap();
        tokio::time::advance(Duration::from_secs(9)).await;
        pages.call("http://a".to_string()).await.unwrap();
        assert_eq!(fetcher.calls(), 1, "still cached just before expiry");

        tokio::time::advance(Duration::from_secs(1)).await;
        let content = pages.call("http://a".to_string()).await.unwrap();

        assert_eq!(fetcher.calls(), 2);
        assert_eq!(content, "<html>http://a v2</html>");
        assert_eq!(pages.access_count("http://a").await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_failed_fetch_counts_but_caches_nothing() {
        let fetcher = FakeFetcher::failing();
        let store = MemoryStore::new();
        let pages = CachedPage::new(fetcher.clone(), store.clone());

        let result = pages.call("http://down".to_string()).await;

        assert!(matches!(result, Err(StoreKitError::Http(_))));
        assert_eq!(store.get("cache:http://down").await.unwrap(), None);
        assert_eq!(pages.access_count("http://down").await.unwrap(), 1);

        // No negative caching: the next call tries again
        let _ = pages.call("http://down".to_string()).await;
        assert_eq!(fetcher.calls(), 2);
    }

    #[tokio::test]
    async fn test_keys_are_independent() {
        let fetcher = FakeFetcher::default();
        let pages = CachedPage::new(fetcher.clone(), MemoryStore::new());

        pages.call("http://a".to_string()).await.unwrap();
        pages.call("http://b".to_string()).await.unwrap();
        pages.call("http://a".to_string()).await.unwrap();

        assert_eq!(fetcher.calls(), 2);
        assert_eq!(pages.access_count("http://a").await.unwrap(), 2);
        assert_eq!(pages.access_count("http://b").await.unwrap(), 1);
        assert_eq!(pages.access_count("http://never").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_empty_url_rejected_before_store_access() {
        let store = MemoryStore::new();
        let pages = CachedPage::new(FakeFetcher::default(), store.clone());

        let result = pages.call(String::new()).await;

        assert!(matches!(result, Err(StoreKitError::InvalidRequest(_))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_cached_empty_page_is_a_hit() {
        let fetcher = FakeFetcher::default();
        let store = MemoryStore::new();
        store
            .set_with_expiry("cache:http://blank", "".into(), PAGE_TTL)
            .await
            .unwrap();
        let pages = CachedPage::new(fetcher.clone(), store);

        let content = pages.call("http://blank".to_string()).await.unwrap();

        assert_eq!(content, "");
        assert_eq!(fetcher.calls(), 0);
    }
}
