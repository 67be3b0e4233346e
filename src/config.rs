//! Service settings.
//!
//! Every value has a baked-in default and can be overridden through the
//! environment or a command-line flag (flag > env > default).

use clap::Parser;
use std::net::SocketAddr;
use std::time::Duration;

/// Runtime settings for the weather facade.
#[derive(Debug, Clone, Parser)]
#[clap(version, about = "HTTP facade for geocoded current weather")]
pub struct Settings {
    /// Address the HTTP server listens on
    #[clap(long, env = "WEATHER_BIND_ADDRESS", default_value = "0.0.0.0:8000")]
    pub bind_address: SocketAddr,

    /// Geocoding provider endpoint
    #[clap(
        long,
        env = "GEOCODING_BASE_URL",
        default_value = "https://geocoding-api.open-meteo.com/v1/search"
    )]
    pub geocoding_base_url: String,

    /// Geocoding request timeout, in (fractional) seconds
    #[clap(long = "geocoding-timeout", env = "GEOCODING_TIMEOUT", default_value = "10", value_parser = parse_secs)]
    pub geocoding_timeout: Duration,

    /// Number of candidates requested from the geocoding provider
    #[clap(long, env = "GEOCODING_RESULT_COUNT", default_value_t = 3)]
    pub geocoding_result_count: u32,

    /// Weather provider endpoint
    #[clap(
        long,
        env = "WEATHER_BASE_URL",
        default_value = "https://api.open-meteo.com/v1/forecast"
    )]
    pub weather_base_url: String,

    /// Weather request timeout, in (fractional) seconds
    #[clap(long = "weather-timeout", env = "WEATHER_TIMEOUT", default_value = "10", value_parser = parse_secs)]
    pub weather_timeout: Duration,

    /// How long geocoding and weather results stay cached, in seconds
    #[clap(long, env = "CACHE_TTL", default_value_t = 900)]
    pub cache_ttl_secs: u64,

    /// Bound each cache to this many entries, evicting on its own (moka backend)
    #[cfg(feature = "moka")]
    #[clap(long, env = "CACHE_MAX_ENTRIES")]
    pub cache_max_entries: Option<u64>,

    /// Title reported by the service info endpoint
    #[clap(long, env = "APP_TITLE", default_value = "Weather API")]
    pub app_title: String,

    /// Description reported by the service info endpoint
    #[clap(long, env = "APP_DESCRIPTION", default_value = "Simple weather API")]
    pub app_description: String,
}

impl Settings {
    /// Cache time-to-live
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }
}

fn parse_secs(value: &str) -> Result<Duration, String> {
    let secs: f64 = value
        .parse()
        .map_err(|e| format!("invalid number of seconds '{value}': {e}"))?;
    match Duration::try_from_secs_f64(secs) {
        Ok(duration) if !duration.is_zero() => Ok(duration),
        _ => Err(format!("timeout must be a positive number of seconds, got '{value}'")),
    }
}
