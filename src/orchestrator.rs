//! Geocode-then-weather orchestration.
//!
//! Each lookup goes through its own cache: locations are keyed by the raw
//! location text, weather by the exact coordinate pair, so different texts
//! that geocode to the same point share one weather entry.

use crate::cache::Cache;
use crate::cachified;
use crate::error::Result;
use crate::geocoding::Geocoder;
use crate::models::{Location, WeatherResponse, WeatherStatus};
use crate::weather::WeatherProvider;
use std::sync::Arc;
use tracing::instrument;

/// Composes a [`Geocoder`] and a [`WeatherProvider`] behind two caches.
///
/// Cheap to clone; clones share clients and caches.
#[derive(Clone)]
pub struct Orchestrator {
    geocoder: Arc<dyn Geocoder>,
    weather: Arc<dyn WeatherProvider>,
    location_cache: Arc<dyn Cache<Location>>,
    weather_cache: Arc<dyn Cache<WeatherStatus>>,
}

impl Orchestrator {
    /// Build an orchestrator from its collaborators
    pub fn new(
        geocoder: Arc<dyn Geocoder>,
        weather: Arc<dyn WeatherProvider>,
        location_cache: Arc<dyn Cache<Location>>,
        weather_cache: Arc<dyn Cache<WeatherStatus>>,
    ) -> Self {
        Self {
            geocoder,
            weather,
            location_cache,
            weather_cache,
        }
    }

    /// Resolve `location_text` to its current weather.
    ///
    /// The weather lookup needs the geocoded coordinates, so the two steps
    /// run strictly in order. Upstream errors propagate unchanged and nothing
    /// is cached for a step that failed.
    ///
    /// # Errors
    ///
    /// Whatever the geocoder or weather provider returned:
    /// [`LocationNotFound`](crate::WeatherError::LocationNotFound),
    /// [`ExternalService`](crate::WeatherError::ExternalService) or
    /// [`DataParse`](crate::WeatherError::DataParse).
    #[instrument(skip(self))]
    pub async fn resolve(&self, location_text: &str) -> Result<WeatherResponse> {
        let location = cachified(self.location_cache.as_ref(), location_text, || {
            self.geocoder.resolve(location_text)
        })
        .await?;

        let weather_key = location.coordinate_key();
        let weather = cachified(self.weather_cache.as_ref(), &weather_key, || {
            self.weather.fetch(location.latitude, location.longitude)
        })
        .await?;

        Ok(WeatherResponse::assemble(location_text, &location, &weather))
    }

    /// Cache holding geocoding results
    pub fn location_cache(&self) -> &Arc<dyn Cache<Location>> {
        &self.location_cache
    }

    /// Cache holding weather results
    pub fn weather_cache(&self) -> &Arc<dyn Cache<WeatherStatus>> {
        &self.weather_cache
    }
}
