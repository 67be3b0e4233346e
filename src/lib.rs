#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! # weather-facade
//!
//! Resolves a free-form location (city name or postal code) to coordinates
//! through a geocoding provider, then fetches current weather for those
//! coordinates, with an in-memory TTL cache in front of each upstream.
//!
//! The pieces, leaves first:
//!
//! - [`TtlCache`]: fixed-TTL map with expiry-on-read, behind the [`Cache`] trait
//! - [`GeocodingClient`] / [`WeatherClient`]: the two upstream providers
//! - [`Orchestrator`]: geocode, then weather, each through its own cache
//! - [`http`]: the axum transport boundary exposing `GET /weather`
//!
//! ## Features
//!
//! - `moka`: Enable the bounded [`MokaCache`] backend
//!
//! ## Read-through caching
//!
//! ```rust
//! use weather_facade::{cachified, Cache, TtlCache, WeatherError};
//! use std::time::Duration;
//!
//! # tokio_test::block_on(async {
//! let cache: TtlCache<String> = TtlCache::new(Duration::from_secs(900));
//!
//! let value = cachified(&cache, "Denver", || async {
//!     // Typically an upstream API call
//!     Ok::<_, WeatherError>("fresh-value".to_string())
//! })
//! .await
//! .unwrap();
//!
//! assert_eq!(value, "fresh-value");
//! assert_eq!(cache.len().await, 1);
//! # });
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod geocoding;
pub mod http;
pub mod metadata;
pub mod models;
pub mod orchestrator;
pub mod weather;

pub use cache::{Cache, TtlCache};
#[cfg(feature = "moka")]
pub use cache::MokaCache;
pub use config::Settings;
pub use error::{Result, WeatherError};
pub use geocoding::{Geocoder, GeocodingClient};
pub use metadata::CacheEntry;
pub use models::{Location, WeatherResponse, WeatherStatus};
pub use orchestrator::Orchestrator;
pub use weather::{WeatherClient, WeatherProvider};

use std::future::Future;

/// Read a value through `cache`.
///
/// On a hit the cached value is returned and `get_fresh_value` is never
/// called. On a miss the future is awaited; an `Ok` value is stored under
/// `key` before being returned, an `Err` is returned as-is and leaves the
/// cache untouched.
///
/// No lock is held while `get_fresh_value` runs, so concurrent misses on the
/// same key each call it and the last writer wins.
pub async fn cachified<T, E, C, F, Fut>(cache: &C, key: &str, get_fresh_value: F) -> std::result::Result<T, E>
where
    T: Clone + Send + Sync + 'static,
    C: Cache<T> + ?Sized,
    F: FnOnce() -> Fut,
    Fut: Future<Output = std::result::Result<T, E>>,
{
    if let Some(value) = cache.get(key).await {
        return Ok(value);
    }

    tracing::debug!(key, "cache miss");
    let fresh_value = get_fresh_value().await?;
    cache.set(key, fresh_value.clone()).await;

    Ok(fresh_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_hit_skips_fresh_value() {
        let cache: TtlCache<String> = TtlCache::new(Duration::from_secs(60));
        let calls = Arc::new(AtomicUsize::new(0));

        for _ in 0..3 {
            let calls = calls.clone();
            let value: std::result::Result<String, WeatherError> = cachified(&cache, "key", || async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok("value".to_string())
            })
            .await;
            assert_eq!(value.unwrap(), "value");
        }

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_error_is_not_cached() {
        let cache: TtlCache<String> = TtlCache::new(Duration::from_secs(60));

        let err = cachified(&cache, "key", || async {
            Err::<String, _>(WeatherError::external_service("down"))
        })
        .await
        .unwrap_err();

        assert_eq!(err, WeatherError::ExternalService("down".to_string()));
        assert!(cache.is_empty().await);

        let value = cachified(&cache, "key", || async { Ok::<_, WeatherError>("up".to_string()) })
            .await
            .unwrap();
        assert_eq!(value, "up");
    }

    #[tokio::test(start_paused = true)]
    async fn test_refetches_after_ttl() {
        let cache: TtlCache<u32> = TtlCache::new(Duration::from_secs(60));

        let first = cachified(&cache, "key", || async { Ok::<_, WeatherError>(1) }).await.unwrap();
        tokio::time::advance(Duration::from_secs(61)).await;
        let second = cachified(&cache, "key", || async { Ok::<_, WeatherError>(2) }).await.unwrap();

        assert_eq!(first, 1);
        assert_eq!(second, 2);
        assert_eq!(cache.len().await, 1);
    }
}
