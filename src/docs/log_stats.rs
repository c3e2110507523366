//! Request statistics over nginx access-log documents.
//!
//! Each document is expected to carry `method`, `path` and `ip` fields.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::docs::{DocumentCollection, Filter, Pipeline};
use crate::error::Result;

/// Methods reported individually, in report order.
pub const HTTP_METHODS: [&str; 5] = ["GET", "POST", "PUT", "PATCH", "DELETE"];

/// Number of addresses listed under "IPs".
const TOP_IPS: usize = 10;

/// Group by `ip`, most frequent first, first ten.
pub fn top_ips_pipeline() -> Pipeline {
    Pipeline::new()
        .group_count("ip")
        .sort_desc("count")
        .limit(TOP_IPS)
}

// == Log Stats ==
/// Summary of an access-log collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogStats {
    pub total: u64,
    /// Count per entry of [`HTTP_METHODS`], same order
    pub methods: Vec<(String, u64)>,
    /// `GET /status` requests
    pub status_checks: u64,
    /// Most frequent client addresses with their request counts
    pub top_ips: Vec<(String, u64)>,
}

impl fmt::Display for LogStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} logs", self.total)?;
        writeln!(f, "Methods:")?;
        for (method, count) in &self.methods {
            writeln!(f, "\tmethod {}: {}", method, count)?;
        }
        writeln!(f, "{} status check", self.status_checks)?;
        write!(f, "IPs:")?;
        for (ip, count) in &self.top_ips {
            write!(f, "\n\t{}: {}", ip, count)?;
        }
        Ok(())
    }
}

/// Collects [`LogStats`] from `collection`.
pub async fn log_stats<C>(collection: &C) -> Result<LogStats>
where
    C: DocumentCollection + ?Sized,
{
    let total = collection.count(&Filter::new()).await?;

    let mut methods = Vec::with_capacity(HTTP_METHODS.len());
    for method in HTTP_METHODS {
        let count = collection.count(&Filter::new().where_eq("method", method)).await?;
        methods.push((method.to_string(), count));
    }

    let status_checks = collection
        .count(&Filter::new().where_eq("method", "GET").where_eq("path", "/status"))
        .await?;

    let top_ips = collection
        .aggregate(&top_ips_pipeline())
        .await?
        .into_iter()
        .map(|group| {
            let ip = match group.get("_id") {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => "None".to_string(),
                Some(other) => other.to_string(),
            };
            let count = group.get("count").and_then(Value::as_u64).unwrap_or(0);
            (ip, count)
        })
        .collect();

    Ok(LogStats {
        total,
        methods,
        status_checks,
        top_ips,
    })
}
