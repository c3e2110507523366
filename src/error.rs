//! Error types for storekit
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == StoreKit Error Enum ==
/// Unified error type for stores, fetchers and the HTTP service.
#[derive(Error, Debug)]
pub enum StoreKitError {
    /// The backing store could not be reached
    #[error("Store connection failed: {0}")]
    Connection(String),

    /// The store rejected a command (e.g. increment on a non-integer value)
    #[error("Store command failed: {0}")]
    Store(String),

    /// Upstream HTTP fetch failed or returned a non-success status
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// A stored value could not be read back as the requested type
    #[error("Cannot decode value at '{key}' as {expected}")]
    Decode { key: String, expected: &'static str },

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<redis::RedisError> for StoreKitError {
    fn from(err: redis::RedisError) -> Self {
        if err.is_io_error()
            || err.is_connection_refusal()
            || err.is_connection_dropped()
            || err.is_timeout()
        {
            StoreKitError::Connection(err.to_string())
        } else {
            StoreKitError::Store(err.to_string())
        }
    }
}

impl From<reqwest::Error> for StoreKitError {
    fn from(err: reqwest::Error) -> Self {
        StoreKitError::Http(err.to_string())
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for StoreKitError {
    fn into_response(self) -> Response {
        let status = match &self {
            StoreKitError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            StoreKitError::Http(_) => StatusCode::BAD_GATEWAY,
            StoreKitError::Connection(_) => StatusCode::SERVICE_UNAVAILABLE,
            StoreKitError::Store(_)
            | StoreKitError::Decode { .. }
            | StoreKitError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(ErrorResponse::new(self.to_string()));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for storekit.
pub type Result<T> = std::result::Result<T, StoreKitError>;
