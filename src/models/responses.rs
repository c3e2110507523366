//! Response DTOs for the storekit API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;

/// Response body for `GET /page`
#[derive(Debug, Clone, Serialize)]
pub struct PageResponse {
    /// The requested URL
    pub url: String,
    /// Page content, cached or freshly fetched
    pub content: String,
}

impl PageResponse {
    /// Creates a new PageResponse
    pub fn new(url: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content: content.into(),
        }
    }
}

/// Response body for `GET /count`
#[derive(Debug, Clone, Serialize)]
pub struct CountResponse {
    /// The requested URL
    pub url: String,
    /// Number of times the URL was requested through the cache
    pub count: i64,
}

impl CountResponse {
    /// Creates a new CountResponse
    pub fn new(url: impl Into<String>, count: i64) -> Self {
        Self {
            url: url.into(),
            count,
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}

impl ErrorResponse {
    /// Creates a new ErrorResponse
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_response_serialize() {
        let resp = PageResponse::new("http://example.com", "<html>OK</html>");
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["url"], "http://example.com");
        assert_eq!(json["content"], "<html>OK</html>");
    }

    #[test]
    fn test_count_response_serialize() {
        let resp = CountResponse::new("http://example.com", 3);
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["count"], 3);
    }

    #[test]
    fn test_health_response_serialize() {
        let resp = HealthResponse::healthy();
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("healthy"));
        assert!(json.contains("timestamp"));
    }

    #[test]
    fn test_error_response_serialize() {
        let resp = ErrorResponse::new("Something went wrong");
        let json = serde_json::to_string(&resp).unwrap();
        assert!(json.contains("error"));
        assert!(json.contains("Something went wrong"));
    }
}
