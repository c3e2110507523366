//! Cache Module
//!
//! Random-key value cache with instrumented writes.

mod random_key;

pub use random_key::{Cache, STORE_OPERATION};
