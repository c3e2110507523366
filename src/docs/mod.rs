//! Documents Module
//!
//! Document collection abstraction with equality filters, a small aggregation
//! pipeline, an in-process collection, and the queries built on them.

mod collection;
mod filter;
mod log_stats;
mod pipeline;
mod queries;

pub use collection::{DocumentCollection, MemoryCollection};
pub use filter::Filter;
pub use log_stats::{log_stats, top_ips_pipeline, LogStats, HTTP_METHODS};
pub use pipeline::{Pipeline, Stage};
pub use queries::schools_by_topic;

/// A stored document: a JSON object.
pub type Document = serde_json::Map<String, serde_json::Value>;
