//! Operation trait shared by fetchers, store helpers and their wrappers.

use std::fmt::Display;

use async_trait::async_trait;

use crate::error::Result;

// == Operation ==
/// A named, fallible async call.
///
/// The name doubles as the store key prefix used by the instrumentation
/// wrappers, so it should be stable across runs (e.g. `Cache.store`).
#[async_trait]
pub trait Operation: Send + Sync {
    /// Argument type; its `Display` form is what call history records.
    type Input: Display + Send + 'static;
    /// Return type; its `Display` form is what call history records.
    type Output: Display + Send + 'static;

    /// Stable name of the operation.
    fn name(&self) -> &str;

    /// Runs the operation.
    async fn call(&self, input: Self::Input) -> Result<Self::Output>;
}
