//! Smokeduty API Server
//!
//! Main entry point for the import tax calculator service.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use smokeduty_api::{AppState, create_router};
use smokeduty_fx::{FrankfurterProvider, RateLookupService};
use smokeduty_shared::{AppConfig, config::LogFormat};
use smokeduty_store::{FxCacheRepository, RateConfigRepository};

fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("smokeduty=debug,tower_http=debug"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(false))
            .init(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;
    init_tracing(config.logging.format);

    let rates = RateConfigRepository::new(&config.rates.path);
    info!(path = %rates.path().display(), "Rate file configured");

    let provider = FrankfurterProvider::new(
        config.fx.provider_url.clone(),
        Duration::from_secs(config.fx.timeout_secs),
    )?;
    let cache = FxCacheRepository::new(&config.fx.cache_path);
    info!(
        provider_url = %config.fx.provider_url,
        cache = %cache.path().display(),
        local_currency = %config.fx.local_currency,
        "Exchange rate lookup configured"
    );

    let state = AppState {
        rates: Arc::new(rates),
        fx: Arc::new(RateLookupService::new(Arc::new(provider), Arc::new(cache))),
        local_currency: config.fx.local_currency.clone(),
    };

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown");
}
