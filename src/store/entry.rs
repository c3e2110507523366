//! Store Entry Module
//!
//! Defines the structure of individual in-process store entries with TTL support.

use std::time::Duration;

use tokio::time::Instant;

// == Entry Data ==
/// Payload held by an entry: a plain value or a list.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryData {
    Value(Vec<u8>),
    List(Vec<Vec<u8>>),
}

// == Store Entry ==
/// Represents a single store entry with payload and expiry metadata.
#[derive(Debug, Clone)]
pub struct StoreEntry {
    /// The stored payload
    pub data: EntryData,
    /// Expiration instant, None = no expiration
    pub expires_at: Option<Instant>,
}

impl StoreEntry {
    // == Constructor ==
    /// Creates a new entry with optional TTL.
    pub fn new(data: EntryData, ttl: Option<Duration>) -> Self {
        Self {
            data,
            expires_at: ttl.map(|ttl| Instant::now() + ttl),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time is greater than or equal to
    /// the expiration time.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => Instant::now() >= expires,
            None => false,
        }
    }

    // == Time To Live ==
    /// Returns remaining TTL, or None if no expiration is set.
    ///
    /// # Returns
    /// - `Some(Duration::ZERO)` if the entry has expired
    /// - `Some(remaining)` if the entry has TTL and hasn't expired
    /// - `None` if the entry never expires
    pub fn ttl_remaining(&self) -> Option<Duration> {
        self.expires_at
            .map(|expires| expires.saturating_duration_since(Instant::now()))
    }
}
