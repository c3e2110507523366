//! API Module
//!
//! HTTP handlers and routing for the storekit service.
//!
//! # Endpoints
//! - `GET /page?url=` - Page content through the expiring cache
//! - `GET /count?url=` - Access count for a URL
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
