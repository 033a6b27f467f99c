//! Insurance Purchase API Server Binary
//!
//! This binary starts the HTTP API server for the insurance purchase flow.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration
//! cargo run --bin insurance-purchase-api
//!
//! # Run with environment variables
//! PURCHASE_PORT=9090 PURCHASE_CATALOG_PATH=config/catalog.json cargo run --bin insurance-purchase-api
//! ```
//!
//! # Environment Variables
//!
//! * `PURCHASE_HOST` - Server host (default: 0.0.0.0)
//! * `PURCHASE_PORT` - Server port (default: 8080)
//! * `PURCHASE_LOG_LEVEL` - trace, debug, info, warn, error (default: info)
//! * `PURCHASE_CATALOG_PATH` - Catalog JSON file (default: config/catalog.json)
//! * `PURCHASE_QUOTE_LATENCY_MS` - Simulated pricing delay (default: 500)
//! * `PURCHASE_OTP_LATENCY_MS` - Simulated OTP delay (default: 1000)
//! * `PURCHASE_OTP_CODE` - Accepted OTP (default: 123456)
//! * `PURCHASE_TAX_RATE_PERCENT` - Tax on the premium subtotal (default: 18)

use std::net::SocketAddr;

use anyhow::Context;
use domain_catalog::Catalog;
use interface_api::{config::ApiConfig, create_router, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Main entry point for the API server.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration cannot be loaded from environment
/// - The catalog cannot be read or fails validation
/// - Server fails to bind to the configured address
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("Failed to load configuration")?;

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        catalog = %config.catalog_path.display(),
        "Starting Insurance Purchase API Server"
    );

    let catalog = Catalog::from_path(&config.catalog_path)
        .with_context(|| format!("Failed to load catalog {}", config.catalog_path.display()))?;

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("Invalid server address {}", config.server_addr()))?;

    let state = AppState::new(catalog, config).context("Invalid field rules in catalog")?;
    let app = create_router(state);

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// `RUST_LOG` takes precedence over the configured level.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
