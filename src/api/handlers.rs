//! API Handlers
//!
//! HTTP request handlers for each storekit endpoint.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    Json,
};
use tracing::info;

use crate::config::Config;
use crate::error::{Result, StoreKitError};
use crate::instrument::Operation;
use crate::models::{CountResponse, HealthResponse, PageQuery, PageResponse};
use crate::store::SharedStore;
use crate::web::{CachedPage, HttpFetcher};

/// Page cache served by the API.
pub type PageCache = CachedPage<HttpFetcher, SharedStore>;

/// Application state shared across all handlers.
///
/// Holds the page cache, which in turn holds the shared store handle.
#[derive(Clone)]
pub struct AppState {
    /// Expiring, access-counting page cache
    pub pages: Arc<PageCache>,
}

impl AppState {
    /// Creates a new AppState over `store`, fetching pages with `fetcher`.
    pub fn new(store: SharedStore, fetcher: HttpFetcher) -> Self {
        Self {
            pages: Arc::new(CachedPage::new(fetcher, store)),
        }
    }

    /// Creates a new AppState from configuration.
    ///
    /// Builds the HTTP fetcher with the configured request timeout.
    pub fn from_config(config: &Config, store: SharedStore) -> Result<Self> {
        let fetcher = HttpFetcher::new(std::time::Duration::from_secs(config.request_timeout))?;
        Ok(Self::new(store, fetcher))
    }
}

fn validated(query: &PageQuery) -> Result<()> {
    match query.validate() {
        Some(error_msg) => Err(StoreKitError::InvalidRequest(error_msg)),
        None => Ok(()),
    }
}

/// Handler for GET /page?url=
///
/// Returns the page content through the expiring cache.
pub async fn page_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<PageResponse>> {
    validated(&query)?;

    let content = state.pages.call(query.url.clone()).await?;
    info!("Served {} ({} bytes)", query.url, content.len());

    Ok(Json(PageResponse::new(query.url, content)))
}

/// Handler for GET /count?url=
///
/// Returns how many times the URL has been requested.
pub async fn count_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Result<Json<CountResponse>> {
    validated(&query)?;

    let count = state.pages.access_count(&query.url).await?;

    Ok(Json(CountResponse::new(query.url, count)))
}

/// Handler for GET /health
///
/// Returns health status of the server.
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
