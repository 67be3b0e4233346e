//! Error types for location and weather lookups.

use thiserror::Error;

/// Result type alias for weather facade operations.
pub type Result<T> = std::result::Result<T, WeatherError>;

/// Errors that can occur while resolving a location and its weather.
///
/// The display string is the bare message; callers add their own prefix.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WeatherError {
    /// The geocoding provider returned no candidates
    #[error("{0}")]
    LocationNotFound(String),

    /// An upstream provider failed: non-success status, connection error or timeout
    #[error("{0}")]
    ExternalService(String),

    /// An upstream response was missing expected fields
    #[error("{0}")]
    DataParse(String),
}

impl WeatherError {
    /// Create a new location-not-found error
    pub fn location_not_found<S: Into<String>>(msg: S) -> Self {
        WeatherError::LocationNotFound(msg.into())
    }

    /// Create a new external service error
    pub fn external_service<S: Into<String>>(msg: S) -> Self {
        WeatherError::ExternalService(msg.into())
    }

    /// Create a new data parse error
    pub fn data_parse<S: Into<String>>(msg: S) -> Self {
        WeatherError::DataParse(msg.into())
    }

    /// Map a `reqwest` failure from talking to `provider`.
    ///
    /// Body decoding failures mean the provider answered with something we
    /// could not read; everything else is a transport problem.
    pub(crate) fn from_reqwest(provider: &str, err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::data_parse(format!(
                "Unexpected response format from {provider} API: {err}"
            ))
        } else if let Some(status) = err.status() {
            Self::external_service(format!(
                "{provider} API returned status {}",
                status.as_u16()
            ))
        } else {
            Self::external_service(format!("Failed to connect to {provider} API: {err}"))
        }
    }
}
