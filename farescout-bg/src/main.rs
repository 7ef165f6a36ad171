//! FareScout background coordinator (farescout-bg) - Main entry point
//!
//! Serves the coordinator's message protocol over HTTP so the page producer,
//! the popup consumer and the host runtime can reach it.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use clap::Parser;
use farescout_common::config::{default_config_path, TomlConfig};
use farescout_common::events::EventBus;
use farescout_bg::credentials::TomlCredentialStore;
use farescout_bg::{build_router, AppState};
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for farescout-bg
#[derive(Parser, Debug)]
#[command(name = "farescout-bg")]
#[command(about = "Background coordinator for FareScout")]
#[command(version)]
struct Args {
    /// Path to the TOML config file
    #[arg(short, long, env = "FARESCOUT_CONFIG")]
    config: Option<PathBuf>,

    /// Port to listen on (overrides config)
    #[arg(short, long, env = "FARESCOUT_PORT")]
    port: Option<u16>,

    /// Interface to bind (overrides config)
    #[arg(long, env = "FARESCOUT_HOST")]
    host: Option<String>,

    /// Credential file (overrides config)
    #[arg(long, env = "FARESCOUT_CREDENTIALS")]
    credentials: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.clone().unwrap_or_else(default_config_path);
    let mut config = TomlConfig::load_or_default(&config_path)
        .with_context(|| format!("Failed to load config {}", config_path.display()))?;
    if let Some(port) = args.port {
        config.port = port;
    }
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(credentials) = args.credentials {
        config.credentials_path = Some(credentials);
    }

    init_tracing(&config)?;

    info!(
        "Starting FareScout background coordinator (farescout-bg) v{}",
        env!("CARGO_PKG_VERSION")
    );
    info!("Config file: {}", config_path.display());

    let credentials_path = config.resolved_credentials_path();
    info!("Credential file: {}", credentials_path.display());

    let events = EventBus::new(config.event_bus_capacity);
    let state = AppState::new(events, Arc::new(TomlCredentialStore::new(credentials_path)));

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("farescout-bg listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing from `RUST_LOG`, falling back to the configured level
fn init_tracing(config: &TomlConfig) -> Result<()> {
    let level = &config.logging.level;
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("farescout_bg={level},farescout_common={level},tower_http={level}").into()
    });

    match &config.logging.file {
        Some(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_ansi(false)
                        .with_writer(Mutex::new(file)),
                )
                .init();
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
