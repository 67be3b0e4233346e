//! Forward geocoding: turn a city name or postal code into coordinates.
//! Talks to the Open-Meteo geocoding API.

use crate::error::{Result, WeatherError};
use crate::models::Location;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::instrument;

const PROVIDER: &str = "Geocoding";

/// Resolves free-form location text to a single [`Location`].
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolve `location` to its best match.
    ///
    /// # Errors
    ///
    /// [`WeatherError::LocationNotFound`] when nothing matches,
    /// [`WeatherError::ExternalService`] when the provider is unreachable or
    /// answers with a non-success status, and [`WeatherError::DataParse`] when
    /// the answer is missing fields.
    async fn resolve(&self, location: &str) -> Result<Location>;
}

#[derive(Debug, Deserialize)]
struct GeocodingResponse {
    #[serde(default)]
    results: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct GeocodingResult {
    name: String,
    latitude: f64,
    longitude: f64,
    country: String,
    admin1: Option<String>,
    admin2: Option<String>,
}

impl From<GeocodingResult> for Location {
    fn from(result: GeocodingResult) -> Self {
        Location {
            name: result.name,
            latitude: result.latitude,
            longitude: result.longitude,
            country: result.country,
            area_1: result.admin1,
            area_2: result.admin2,
        }
    }
}

/// HTTP client for the geocoding provider.
#[derive(Debug, Clone)]
pub struct GeocodingClient {
    client: Client,
    base_url: String,
    result_count: u32,
}

impl GeocodingClient {
    /// Create a client for `base_url` whose requests give up after `timeout`.
    ///
    /// `result_count` is forwarded as the provider's `count` parameter; only
    /// the first candidate is ever used.
    pub fn new(base_url: impl Into<String>, timeout: Duration, result_count: u32) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WeatherError::external_service(format!("Failed to build {PROVIDER} client: {e}")))?;

        Ok(Self::with_client(client, base_url, result_count))
    }

    /// Create a client around an existing `reqwest::Client`
    pub fn with_client(client: Client, base_url: impl Into<String>, result_count: u32) -> Self {
        Self {
            client,
            base_url: base_url.into(),
            result_count,
        }
    }
}

#[async_trait]
impl Geocoder for GeocodingClient {
    #[instrument(skip(self), level = "debug")]
    async fn resolve(&self, location: &str) -> Result<Location> {
        let count = self.result_count.to_string();
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("name", location), ("count", count.as_str())])
            .send()
            .await
            .map_err(|e| WeatherError::from_reqwest(PROVIDER, e))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%status, "geocoding request failed");
            return Err(WeatherError::external_service(format!(
                "{PROVIDER} API returned status {}",
                status.as_u16()
            )));
        }

        let body: GeocodingResponse = response
            .json()
            .await
            .map_err(|e| WeatherError::from_reqwest(PROVIDER, e))?;

        // Ranked by the provider; the first candidate wins, ambiguous or not
        let first = match body.results.and_then(|r| r.into_iter().next()) {
            Some(first) => first,
            None => {
                return Err(WeatherError::location_not_found(format!(
                    "No location found for: {location}"
                )));
            }
        };

        let result: GeocodingResult = serde_json::from_value(first).map_err(|e| {
            WeatherError::data_parse(format!(
                "Unexpected response format from {PROVIDER} API: {e}"
            ))
        })?;

        tracing::debug!(
            "Geocoded location: {}, {} -> ({}, {})",
            result.name,
            result.country,
            result.latitude,
            result.longitude
        );

        Ok(result.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GeocodingClient {
        GeocodingClient::new(
            format!("{}/v1/search", server.uri()),
            Duration::from_secs(2),
            3,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_resolve_takes_first_candidate() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .and(query_param("name", "Springfield"))
            .and(query_param("count", "3"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [
                    {
                        "name": "Springfield",
                        "latitude": 39.80172,
                        "longitude": -89.64371,
                        "country": "United States",
                        "admin1": "Illinois",
                        "admin2": "Sangamon"
                    },
                    {
                        "name": "Springfield",
                        "latitude": 37.21533,
                        "longitude": -93.29824,
                        "country": "United States",
                        "admin1": "Missouri"
                    }
                ]
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let location = client_for(&mock_server).resolve("Springfield").await.unwrap();

        assert_eq!(location.latitude, 39.80172);
        assert_eq!(location.longitude, -89.64371);
        assert_eq!(location.area_1.as_deref(), Some("Illinois"));
        assert_eq!(location.area_2.as_deref(), Some("Sangamon"));
    }

    #[tokio::test]
    async fn test_resolve_without_admin_fields() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [{
                    "name": "Denver",
                    "latitude": 39.7392,
                    "longitude": -104.9903,
                    "country": "United States"
                }]
            })))
            .mount(&mock_server)
            .await;

        let location = client_for(&mock_server).resolve("Denver").await.unwrap();

        assert_eq!(location.name, "Denver");
        assert_eq!(location.area_1, None);
        assert_eq!(location.area_2, None);
    }

    #[tokio::test]
    async fn test_empty_results_is_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": []
            })))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).resolve("asdfghjkl").await.unwrap_err();
        assert_matches!(err, WeatherError::LocationNotFound(msg) if msg.contains("asdfghjkl"));
    }

    #[tokio::test]
    async fn test_absent_results_is_not_found() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({ "generationtime_ms": 0.5 })),
            )
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).resolve("asdfghjkl").await.unwrap_err();
        assert_matches!(err, WeatherError::LocationNotFound(_));
    }

    #[tokio::test]
    async fn test_error_status_is_external_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).resolve("Denver").await.unwrap_err();
        assert_eq!(
            err,
            WeatherError::ExternalService("Geocoding API returned status 500".to_string())
        );
    }

    #[tokio::test]
    async fn test_missing_fields_is_parse_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "results": [{ "name": "Denver", "country": "United States" }]
            })))
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server).resolve("Denver").await.unwrap_err();
        assert_matches!(err, WeatherError::DataParse(msg) if msg.contains("Geocoding API"));
    }

    #[tokio::test]
    async fn test_timeout_is_external_failure() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/search"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&mock_server)
            .await;

        let client = GeocodingClient::new(
            format!("{}/v1/search", mock_server.uri()),
            Duration::from_millis(100),
            3,
        )
        .unwrap();

        let err = client.resolve("Denver").await.unwrap_err();
        assert_matches!(err, WeatherError::ExternalService(msg) if msg.starts_with("Failed to connect to Geocoding API"));
    }

    #[tokio::test]
    async fn test_connection_refused_is_external_failure() {
        let client = GeocodingClient::new("http://127.0.0.1:9/v1/search", Duration::from_secs(1), 3).unwrap();

        let err = client.resolve("Denver").await.unwrap_err();
        assert_matches!(err, WeatherError::ExternalService(_));
    }
}
