//! HTTP transport boundary.
//!
//! Validates the `location` query parameter, runs the [`Orchestrator`] and
//! maps its errors onto status codes. Error bodies are always
//! `{"detail": "..."}`.

use crate::error::WeatherError;
use crate::models::WeatherResponse;
use crate::orchestrator::Orchestrator;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    orchestrator: Orchestrator,
    info: Arc<ServiceInfo>,
}

impl AppState {
    /// Bundle the orchestrator with the service metadata reported on `/`
    pub fn new(orchestrator: Orchestrator, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            orchestrator,
            info: Arc::new(ServiceInfo {
                title: title.into(),
                description: description.into(),
            }),
        }
    }
}

/// Body of `GET /`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Application title
    pub title: String,
    /// Application description
    pub description: String,
}

/// Body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable reason
    pub detail: String,
}

/// An error on its way to becoming an HTTP response.
#[derive(Debug, Clone)]
pub struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    /// Create an error with an explicit status
    pub fn new<S: Into<String>>(status: StatusCode, detail: S) -> Self {
        ApiError {
            status,
            detail: detail.into(),
        }
    }

    /// Translate an orchestrator error for the request that asked about `location`
    pub fn from_weather(err: WeatherError, location: &str) -> Self {
        match err {
            WeatherError::LocationNotFound(_) => {
                Self::new(StatusCode::NOT_FOUND, format!("Location not found: {location}"))
            }
            WeatherError::ExternalService(msg) => Self::new(
                StatusCode::SERVICE_UNAVAILABLE,
                format!("External service error: {msg}"),
            ),
            WeatherError::DataParse(msg) => Self::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Data parsing error: {msg}"),
            ),
        }
    }

    /// The status code this error maps to
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// The `detail` message this error carries
    pub fn detail(&self) -> &str {
        &self.detail
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorResponse { detail: self.detail })).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct WeatherQuery {
    location: Option<String>,
}

/// Build the service router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(service_info))
        .route("/health", get(health))
        .route("/weather", get(get_weather))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn service_info(State(state): State<AppState>) -> Json<ServiceInfo> {
    Json(state.info.as_ref().clone())
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// `GET /weather?location=<text>`: current weather for a city name or postal code.
async fn get_weather(
    State(state): State<AppState>,
    query: Result<Query<WeatherQuery>, QueryRejection>,
) -> Result<Json<WeatherResponse>, ApiError> {
    let Query(query) = query
        .map_err(|rejection| ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, rejection.body_text()))?;

    let location = query.location.ok_or_else(|| {
        ApiError::new(
            StatusCode::UNPROCESSABLE_ENTITY,
            "Missing required query parameter: location",
        )
    })?;

    if location.trim().is_empty() {
        return Err(ApiError::new(
            StatusCode::BAD_REQUEST,
            "Location parameter cannot be empty",
        ));
    }

    match state.orchestrator.resolve(&location).await {
        Ok(response) => Ok(Json(response)),
        Err(err) => {
            let api_error = ApiError::from_weather(err, &location);
            if api_error.status().is_server_error() {
                tracing::warn!(location = %location, status = %api_error.status(), "{}", api_error.detail());
            } else {
                tracing::debug!(location = %location, status = %api_error.status(), "{}", api_error.detail());
            }
            Err(api_error)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_mapping() {
        let not_found = ApiError::from_weather(
            WeatherError::location_not_found("No location found for: asdfghjkl"),
            "asdfghjkl",
        );
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.detail(), "Location not found: asdfghjkl");

        let upstream = ApiError::from_weather(
            WeatherError::external_service("Weather API returned status 502"),
            "Denver",
        );
        assert_eq!(upstream.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            upstream.detail(),
            "External service error: Weather API returned status 502"
        );

        let parse = ApiError::from_weather(WeatherError::data_parse("missing field `current`"), "Denver");
        assert_eq!(parse.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(parse.detail(), "Data parsing error: missing field `current`");
    }
}
