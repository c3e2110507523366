//! Call History Module
//!
//! Records inputs and outputs of an operation in store lists and replays them.

use std::fmt;

use async_trait::async_trait;

use crate::error::Result;
use crate::instrument::Operation;
use crate::store::{KeyValueStore, StoreExt, StoreValue};

/// List key holding the recorded inputs of operation `name`.
pub fn inputs_key(name: &str) -> String {
    format!("{}:inputs", name)
}

/// List key holding the recorded outputs of operation `name`.
pub fn outputs_key(name: &str) -> String {
    format!("{}:outputs", name)
}

// == Call History ==
/// Appends each call's input to `name:inputs` and its output to `name:outputs`.
///
/// The input is recorded before the inner call runs; the output only when
/// it succeeds, so a failed call leaves an input without a matching output.
#[derive(Debug, Clone)]
pub struct CallHistory<O, S> {
    inner: O,
    store: S,
}

impl<O, S> CallHistory<O, S> {
    /// Wraps `inner`, recording into `store`.
    pub fn new(inner: O, store: S) -> Self {
        Self { inner, store }
    }
}

#[async_trait]
impl<O, S> Operation for CallHistory<O, S>
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
        let name = self.inner.name();
        self.store
            .append_to_list(&inputs_key(name), StoreValue::Str(input.to_string()))
            .await?;

        let output = self.inner.call(input).await?;

        self.store
            .append_to_list(&outputs_key(name), StoreValue::Str(output.to_string()))
            .await?;
        Ok(output)
    }
}

// == Replay ==
/// Recorded call count and input/output pairs of one operation.
#[derive(Debug, Clone, PartialEq)]
pub struct Replay {
    pub name: String,
    pub calls: i64,
    pub history: Vec<(String, String)>,
}

impl fmt::Display for Replay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} was called {} times:", self.name, self.calls)?;
        for (input, output) in &self.history {
            write!(f, "\n{}({}) -> {}", self.name, input, output)?;
        }
        Ok(())
    }
}

/// Reads back the call count and history recorded for operation `name`.
///
/// Inputs and outputs are paired in order; trailing inputs from failed calls
/// have no output and are left out.
pub async fn replay<S>(store: &S, name: &str) -> Result<Replay>
where
    S: KeyValueStore + ?Sized,
{
    let calls = store.get_int(name).await?.unwrap_or(0);
    let inputs = store.list_range(&inputs_key(name)).await?;
    let outputs = store.list_range(&outputs_key(name)).await?;

    let history = inputs
        .iter()
        .zip(outputs.iter())
        .map(|(input, output)| {
            (
                String::from_utf8_lossy(input).into_owned(),
                String::from_utf8_lossy(output).into_owned(),
            )
        })
        .collect();

    Ok(Replay {
        name: name.to_string(),
        calls,
        history,
    })
}
