//! Instrument Module
//!
//! Named async operations and the wrappers that record how they are called.
//!
//! Wrappers compose explicitly: each holds the inner operation plus a store
//! handle and exposes the same [`Operation`] signature, so they stack in any
//! order, e.g. `CountCalls::new(CallHistory::new(op, store.clone()), store)`.

mod counter;
mod history;
mod operation;

pub use counter::CountCalls;
pub use history::{inputs_key, outputs_key, replay, CallHistory, Replay};
pub use operation::Operation;
