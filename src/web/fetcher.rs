//! HTTP page fetcher.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, instrument};

use crate::error::{Result, StoreKitError};
use crate::instrument::Operation;

// == HTTP Fetcher ==
/// Fetches the body of a URL as text.
///
/// Non-success status codes are returned as [`StoreKitError::Http`].
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// Builds a fetcher whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| StoreKitError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Operation for HttpFetcher {
    type Input = String;
    type Output = String;

    fn name(&self) -> &str {
        "get_page"
    }

    #[instrument(skip(self))]
    async fn call(&self, url: String) -> Result<String> {
        let response = self.client.get(&url).send().await?.error_for_status()?;
        let body = response.text().await?;
        debug!("Fetched {} bytes", body.len());
        Ok(body)
    }
}
