use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tokio::net::TcpListener;
use weather_facade::http::{self, AppState};
use weather_facade::{
    Cache, GeocodingClient, Location, Orchestrator, Settings, TtlCache, WeatherClient,
    WeatherStatus,
};

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

fn build_cache<T>(settings: &Settings) -> Arc<dyn Cache<T>>
where
    T: Clone + Send + Sync + 'static,
{
    #[cfg(feature = "moka")]
    if let Some(max_entries) = settings.cache_max_entries {
        return Arc::new(weather_facade::MokaCache::new(max_entries, settings.cache_ttl()));
    }

    Arc::new(TtlCache::new(settings.cache_ttl()))
}

fn build_orchestrator(settings: &Settings) -> anyhow::Result<Orchestrator> {
    let geocoder = GeocodingClient::new(
        settings.geocoding_base_url.clone(),
        settings.geocoding_timeout,
        settings.geocoding_result_count,
    )
    .context("failed to create geocoding client")?;

    let weather = WeatherClient::new(settings.weather_base_url.clone(), settings.weather_timeout)
        .context("failed to create weather client")?;

    let location_cache: Arc<dyn Cache<Location>> = build_cache(settings);
    let weather_cache: Arc<dyn Cache<WeatherStatus>> = build_cache(settings);

    Ok(Orchestrator::new(
        Arc::new(geocoder),
        Arc::new(weather),
        location_cache,
        weather_cache,
    ))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to listen for ctrl-c: {err}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!("failed to listen for SIGTERM: {err}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutting down");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging();

    let settings = Settings::parse();
    tracing::debug!(?settings, "loaded settings");

    let orchestrator = build_orchestrator(&settings)?;
    let state = AppState::new(
        orchestrator,
        settings.app_title.clone(),
        settings.app_description.clone(),
    );

    let listener = TcpListener::bind(settings.bind_address)
        .await
        .with_context(|| format!("failed to bind {}", settings.bind_address))?;
    tracing::info!(
        "{} listening on {} (cache ttl {}s)",
        settings.app_title,
        settings.bind_address,
        settings.cache_ttl_secs
    );

    axum::serve(listener, http::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}
