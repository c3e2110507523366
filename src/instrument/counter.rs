//! Call Counter Module
//!
//! Counts every invocation of an operation in a shared store.

use async_trait::async_trait;
use tracing::debug;

use crate::error::Result;
use crate::instrument::Operation;
use crate::store::KeyValueStore;

// == Count Calls ==
/// Increments the integer at key `name()` before each call of the inner operation.
///
/// The count includes calls that go on to fail.
#[derive(Debug, Clone)]
pub struct CountCalls<O, S> {
    inner: O,
    store: S,
}

impl<O, S> CountCalls<O, S> {
    /// Wraps `inner`, counting into `store`.
    pub fn new(inner: O, store: S) -> Self {
        Self { inner, store }
    }
}

#[async_trait]
impl<O, S> Operation for CountCalls<O, S>
where
    O: Operation,
    S: KeyValueStore,
{
    type Input = O::Input;
    type Output = O::Output;

    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn call(&self, input: Self::Input) -> Result<Self::Output> {
        let calls = self.store.increment(self.inner.name()).await?;
        debug!("{} call #{}", self.inner.name(), calls);
        self.inner.call(input).await
    }
}
