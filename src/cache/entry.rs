//! Cache key and entry types

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;

/// Identifies one cached value: a key within a namespace
///
/// Kept as a structured pair so that no choice of separator can make two distinct
/// pairs collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub namespace: String,
    pub key: String,
}

impl CacheKey {
    pub fn new(namespace: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            key: key.into(),
        }
    }
}

/// Last value observed for a key and when it was fetched
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    /// Response body of the fetch
    pub value: String,
    /// Wall-clock time the fetch completed, for display
    pub fetched_at: DateTime<Utc>,
    /// Monotonic reading taken when the fetch completed
    pub fetched_instant: Instant,
}

impl CacheEntry {
    /// Whether the entry may still be served at `now` given the freshness window
    ///
    /// Elapsed time is taken from the monotonic reading. An entry exactly `window`
    /// old is still fresh.
    pub fn is_fresh(&self, now: Instant, window: Duration) -> bool {
        now.saturating_duration_since(self.fetched_instant) <= window
    }
}
