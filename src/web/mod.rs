//! Web Module
//!
//! Page fetching over HTTP and the expiring, access-counting cache in front of it.
//!
//! ```ignore
//! let store = MemoryStore::new();
//! let pages = CachedPage::new(HttpFetcher::new(Duration::from_secs(30))?, store);
//! let html = pages.call("http://example.com".to_string()).await?;
//! ```

mod cached;
mod fetcher;

#[cfg(test)]
mod property_tests;

pub use cached::{cache_key, count_key, CachedPage, PAGE_TTL};
pub use fetcher::HttpFetcher;
