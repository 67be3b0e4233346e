//! Location, weather and response records.

use serde::{Deserialize, Serialize};

/// A geocoded location: the first candidate the geocoding provider returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// Place name as the provider spells it
    pub name: String,
    /// WGS84 degrees
    pub latitude: f64,
    /// WGS84 degrees
    pub longitude: f64,
    /// Country name
    pub country: String,
    /// First-level administrative area (state, province), when the provider has one
    pub area_1: Option<String>,
    /// Second-level administrative area (county, district)
    pub area_2: Option<String>,
}

impl Location {
    /// Key under which weather for this location is cached.
    ///
    /// Uses the exact coordinate values, so two locations share a weather
    /// entry only when both coordinates compare equal.
    pub fn coordinate_key(&self) -> String {
        format!("{},{}", self.latitude, self.longitude)
    }
}

/// Current conditions at a coordinate pair, in Fahrenheit and inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherStatus {
    /// Air temperature at 2m
    pub temperature_fahrenheit: f64,
    /// Precipitation over the preceding interval
    pub precipitation_inch: f64,
}

/// Payload returned by `GET /weather`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResponse {
    /// The location text exactly as the client sent it
    pub location: String,
    /// Resolved latitude
    pub latitude: f64,
    /// Resolved longitude
    pub longitude: f64,
    /// Resolved country
    pub country: String,
    /// First-level administrative area, or `null`
    pub area_1: Option<String>,
    /// Second-level administrative area, or `null`
    pub area_2: Option<String>,
    /// Current temperature in °F
    pub temperature_fahrenheit: f64,
    /// Current precipitation in inches
    pub precipitation_inch: f64,
}

impl WeatherResponse {
    /// Merge a resolved location and its weather into a response.
    pub fn assemble(location_text: &str, location: &Location, weather: &WeatherStatus) -> Self {
        Self {
            location: location_text.to_string(),
            latitude: location.latitude,
            longitude: location.longitude,
            country: location.country.clone(),
            area_1: location.area_1.clone(),
            area_2: location.area_2.clone(),
            temperature_fahrenheit: weather.temperature_fahrenheit,
            precipitation_inch: weather.precipitation_inch,
        }
    }
}
