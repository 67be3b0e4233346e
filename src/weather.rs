//! Open-Meteo current-conditions client
//!
//! Fetches temperature and precipitation for a coordinate pair. Units are
//! requested explicitly (Fahrenheit, inches) so nothing depends on the
//! provider's locale defaults.

use crate::error::{Result, WeatherError};
use crate::models::WeatherStatus;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;

const PROVIDER: &str = "Weather";

/// Looks up current conditions at a coordinate pair.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    /// Fetch current weather at (`latitude`, `longitude`).
    ///
    /// # Errors
    ///
    /// [`WeatherError::ExternalService`] when the provider is unreachable,
    /// times out or answers with a non-success status;
    /// [`WeatherError::DataParse`] when the answer is missing fields.
    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<WeatherStatus>;
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: CurrentConditions,
}

#[derive(Debug, Deserialize)]
struct CurrentConditions {
    temperature_2m: f64,
    precipitation: f64,
}

/// HTTP client for the weather provider.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: Client,
    base_url: String,
}

impl WeatherClient {
    /// Create a client for `base_url` whose requests give up after `timeout`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WeatherError::external_service(format!("Failed to build {PROVIDER} client: {e}")))?;

        Ok(Self::with_client(client, base_url))
    }

    /// Create a client around an existing `reqwest::Client`
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl WeatherProvider for WeatherClient {
    #[instrument(skip(self), level = "debug")]
    async fn fetch(&self, latitude: f64, longitude: f64) -> Result<WeatherStatus> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", latitude.to_string()),
                ("longitude", longitude.to_string()),
                ("current", "temperature_2m,precipitation".to_string()),
                ("forecast_days", "1".to_string()),
                ("temperature_unit", "fahrenheit".to_string()),
                ("wind_speed_unit", "mph".to_string()),
                ("precipitation_unit", "inch".to_string()),
            ])
            .send()
            .await
            .map_err(|e| WeatherError::from_reqwest(PROVIDER, e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "weather request failed");
            return Err(WeatherError::external_service(format!(
                "{PROVIDER} API returned status {}",
                status.as_u16()
            )));
        }

        let body: ForecastResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::from_reqwest(PROVIDER, e))?;

        tracing::debug!(
            "Weather at ({}, {}): temp={}F, precip={}in",
            latitude,
            longitude,
            body.current.temperature_2m,
            body.current.precipitation
        );

        Ok(WeatherStatus {
            temperature_fahrenheit: body.current.temperature_2m,
            precipitation_inch: body.current.precipitation,
        })
    }
}
