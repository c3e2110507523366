//! Request DTOs for the storekit API
//!
//! Defines the query parameters accepted by the HTTP endpoints.

use serde::Deserialize;

/// Query string for `GET /page` and `GET /count`
///
/// # Fields
/// - `url`: The page URL; also the resource key for counting and caching
#[derive(Debug, Clone, Deserialize)]
pub struct PageQuery {
    /// The page URL; a missing parameter reads as empty and fails validation
    #[serde(default)]
    pub url: String,
}

impl PageQuery {
    /// Validates the query
    ///
    /// The resource key itself is opaque to the store; the scheme rule exists
    /// because `/page` hands the key to the HTTP fetcher, and `/count` applies
    /// the same rule so both endpoints accept the same keys.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.url.trim().is_empty() {
            return Some("URL cannot be empty".to_string());
        }
        if !(self.url.starts_with("http://") || self.url.starts_with("https://")) {
            return Some("URL must start with http:// or https://".to_string());
        }
        None
    }
}
