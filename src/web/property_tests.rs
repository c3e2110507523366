//! Property-Based Tests for the page cache
//!
//! Uses proptest to check counting and caching over arbitrary call sequences.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use proptest::prelude::*;

use crate::error::Result;
use crate::instrument::Operation;
use crate::store::MemoryStore;
use crate::web::CachedPage;

/// Fetcher double recording how often each URL was fetched.
#[derive(Clone, Default)]
struct RecordingFetcher {
    fetches: Arc<Mutex<HashMap<String, usize>>>,
}

#[async_trait]
impl Operation for RecordingFetcher {
    type Input = String;
    type Output = String;

    fn name(&self) -> &str {
        "recording_get_page"
    }

    async fn call(&self, url: String) -> Result<String> {
        *self.fetches.lock().unwrap().entry(url.clone()).or_insert(0) += 1;
        Ok(format!("<html>{}</html>", url))
    }
}

fn url_strategy() -> impl Strategy<Value = String> {
    "http://[a-c]\\.example/[a-z]{0,3}".prop_map(|s| s)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Within the TTL window every URL is fetched once, counted once per call,
    // and every call returns that URL's content.
    #[test]
    fn prop_counts_all_calls_fetches_once(urls in prop::collection::vec(url_strategy(), 1..40)) {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_time()
            .start_paused(true)
            .build()
            .unwrap();
        let fetcher = RecordingFetcher::default();
        let pages = CachedPage::new(fetcher.clone(), MemoryStore::new());

        let mut expected_calls: HashMap<String, i64> = HashMap::new();
        for url in &urls {
            *expected_calls.entry(url.clone()).or_insert(0) += 1;
        }

        let (contents, counts) = rt.block_on(async {
            let mut contents = Vec::new();
            for url in &urls {
                contents.push(pages.call(url.clone()).await.unwrap());
            }
            let mut counts = HashMap::new();
            for url in expected_calls.keys() {
                counts.insert(url.clone(), pages.access_count(url).await.unwrap());
            }
            (contents, counts)
        });

        for (url, content) in urls.iter().zip(&contents) {
            prop_assert_eq!(content, &format!("<html>{}</html>", url));
        }
        prop_assert_eq!(counts, expected_calls.clone());

        let fetches = fetcher.fetches.lock().unwrap();
        prop_assert_eq!(fetches.len(), expected_calls.len());
        prop_assert!(fetches.values().all(|&n| n == 1));
    }
}
