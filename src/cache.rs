//! Cache trait and implementations
//!
//! This module provides the cache abstraction and the concrete in-memory
//! backends. `TtlCache` is the default: a fixed-TTL map with lazy expiry.
//! `MokaCache` (feature `moka`) trades the lazy-expiry accounting for a
//! bounded, self-evicting store.

use crate::CacheEntry;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

#[cfg(feature = "moka")]
use moka::future::Cache as MokaFutureCache;

/// Cache trait that defines the interface for cache implementations.
///
/// Values are opaque to the cache and handed back as clones. The TTL is a
/// property of the cache instance, not of individual entries.
#[async_trait]
pub trait Cache<T>: Send + Sync
where
    T: Clone + Send + Sync + 'static,
{
    /// Get a live value by key
    ///
    /// # Returns
    ///
    /// Returns `Some(T)` if the key exists and has not expired, `None` otherwise.
    async fn get(&self, key: &str) -> Option<T>;

    /// Store a value, replacing any existing entry and restarting its TTL window
    async fn set(&self, key: &str, value: T);

    /// Remove a cache entry by key
    async fn remove(&self, key: &str);

    /// Clear all cache entries
    async fn clear(&self);

    /// Get the current number of entries in the cache
    async fn len(&self) -> usize;

    /// Check if the cache is empty
    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// In-memory cache with a fixed time-to-live and expiry-on-read.
///
/// There is no capacity bound and no background sweeper: an expired entry
/// stays in the map (and counts towards [`Cache::len`]) until a `get` for its
/// key observes it, or until [`Cache::clear`] is called.
///
/// Clones share the same underlying map.
///
/// # Examples
///
/// ```rust
/// use weather_facade::{Cache, TtlCache};
/// use std::time::Duration;
///
/// # #[tokio::main]
/// # async fn main() {
/// let cache: TtlCache<String> = TtlCache::new(Duration::from_secs(900));
/// cache.set("Denver", "39.7392,-104.9903".to_string()).await;
/// assert_eq!(cache.get("Denver").await.as_deref(), Some("39.7392,-104.9903"));
/// # }
/// ```
#[derive(Clone)]
pub struct TtlCache<T> {
    entries: Arc<Mutex<HashMap<String, CacheEntry<T>>>>,
    ttl: Duration,
}

impl<T> TtlCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a new cache whose entries live for `ttl`
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// The time-to-live applied to every entry
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

impl<T> std::fmt::Debug for TtlCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TtlCache")
            .field("ttl", &self.ttl)
            .field("len", &self.entries.lock().len())
            .finish()
    }
}

#[async_trait]
impl<T> Cache<T> for TtlCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> Option<T> {
        let now = Instant::now();
        let mut entries = self.entries.lock();

        let expired = match entries.get(key) {
            Some(entry) if !entry.is_expired(self.ttl, now) => {
                tracing::debug!(key, "cache hit");
                return Some(entry.value.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            tracing::debug!(key, "cache entry expired");
            entries.remove(key);
        }
        None
    }

    async fn set(&self, key: &str, value: T) {
        self.entries
            .lock()
            .insert(key.to_string(), CacheEntry::new(value));
    }

    async fn remove(&self, key: &str) {
        self.entries.lock().remove(key);
    }

    async fn clear(&self) {
        self.entries.lock().clear();
    }

    async fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

/// Moka-based cache implementation
///
/// A bounded in-memory cache that evicts on its own, both by capacity and by
/// time-to-live. Unlike [`TtlCache`], `len` is moka's eventually-consistent
/// entry count.
#[cfg(feature = "moka")]
#[derive(Clone)]
pub struct MokaCache<T> {
    inner: MokaFutureCache<String, T>,
}

#[cfg(feature = "moka")]
impl<T> MokaCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Create a new MokaCache holding at most `max_capacity` entries, each for `ttl`
    pub fn new(max_capacity: u64, ttl: Duration) -> Self {
        let inner = MokaFutureCache::builder()
            .max_capacity(max_capacity)
            .time_to_live(ttl)
            .build();

        Self { inner }
    }

    /// Get the underlying Moka cache for advanced operations
    pub fn inner(&self) -> &MokaFutureCache<String, T> {
        &self.inner
    }
}

#[cfg(feature = "moka")]
#[async_trait]
impl<T> Cache<T> for MokaCache<T>
where
    T: Clone + Send + Sync + 'static,
{
    async fn get(&self, key: &str) -> Option<T> {
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: T) {
        self.inner.insert(key.to_string(), value).await;
    }

    async fn remove(&self, key: &str) {
        self.inner.invalidate(key).await;
    }

    async fn clear(&self) {
        self.inner.invalidate_all();
    }

    async fn len(&self) -> usize {
        self.inner.entry_count() as usize
    }
}
