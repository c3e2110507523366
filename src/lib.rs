//! storekit - Key-value and document store helpers
//!
//! Provides an expiring, access-counting page cache, call-count and
//! call-history instrumentation over a Redis-style store, a random-key value
//! cache, and count/find/aggregate queries over document collections.

pub mod api;
pub mod cache;
pub mod config;
pub mod docs;
pub mod error;
pub mod instrument;
pub mod models;
pub mod store;
pub mod tasks;
pub mod web;

pub use api::AppState;
pub use config::Config;
pub use error::{Result, StoreKitError};
pub use tasks::spawn_cleanup_task;
