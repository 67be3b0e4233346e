//! Cache entry structures.

use std::time::Duration;
use tokio::time::Instant;

/// A cached value together with the instant it was stored.
///
/// Timestamps come from `tokio::time::Instant`, so expiry follows the tokio
/// clock (and can be driven with `tokio::time::pause`/`advance` in tests).
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    /// The cached value
    pub value: T,
    /// When the value was stored
    pub inserted_at: Instant,
}

impl<T> CacheEntry<T> {
    /// Create a new cache entry stamped with the current instant
    pub fn new(value: T) -> Self {
        Self {
            value,
            inserted_at: Instant::now(),
        }
    }

    /// Create a cache entry with a specific insertion instant
    pub fn with_time(value: T, inserted_at: Instant) -> Self {
        Self { value, inserted_at }
    }

    /// Age of this entry at the given instant
    pub fn age(&self, now: Instant) -> Duration {
        now.saturating_duration_since(self.inserted_at)
    }

    /// An entry is live while `now - inserted_at < ttl`.
    pub fn is_expired(&self, ttl: Duration, now: Instant) -> bool {
        self.age(now) >= ttl
    }
}
