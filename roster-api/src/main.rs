//! roster-api - attendee roster service
//!
//! Serves the roster HTTP API in front of the data backend and the
//! semantic-search service.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use roster_common::config::{
    load_toml_config, resolve_config_path, ConfigOverrides, ServiceConfig, CONFIG_ENV_VAR,
};
use roster_api::services::{HttpSearchClient, SupabaseClient};
use roster_api::{build_router, AppState};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "roster-api")]
#[command(about = "Attendee roster service", long_about = None)]
#[command(version)]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, env = "ROSTER_CONFIG")]
    config: Option<PathBuf>,

    /// Bind address
    #[arg(long, env = "ROSTER_HOST")]
    host: Option<String>,

    /// HTTP server port
    #[arg(short, long, env = "ROSTER_PORT")]
    port: Option<u16>,

    /// Data backend base URL
    #[arg(long, env = "ROSTER_BACKEND_URL")]
    backend_url: Option<String>,

    /// Data backend API key
    #[arg(long, env = "ROSTER_BACKEND_KEY", hide_env_values = true)]
    backend_key: Option<String>,

    /// Semantic-search service base URL
    #[arg(long, env = "ROSTER_SEARCH_URL")]
    search_url: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "ROSTER_LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Config is read before tracing so the file can set the log level
    let config_path = resolve_config_path(args.config.as_deref(), CONFIG_ENV_VAR);
    let toml_config = load_toml_config(config_path.as_deref())
        .context("Failed to load configuration file")?;

    let overrides = ConfigOverrides {
        host: args.host,
        port: args.port,
        backend_url: args.backend_url,
        backend_api_key: args.backend_key,
        search_url: args.search_url,
        log_level: args.log_level,
    };
    let config = ServiceConfig::resolve(toml_config, overrides)
        .context("Invalid configuration")?;

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting roster-api v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match &config_path {
        Some(path) if path.exists() => info!(path = %path.display(), "Configuration file"),
        Some(path) => warn!(path = %path.display(), "Configuration file not found, using defaults"),
        None => info!("No configuration file, using defaults"),
    }

    let backend = SupabaseClient::new(&config.backend, config.http_timeout)
        .context("Failed to create data backend client")?;
    let search = HttpSearchClient::new(&config.search.url, config.http_timeout)
        .context("Failed to create search client")?;
    info!(
        backend = %config.backend.url,
        table = %config.backend.table,
        bucket = %config.backend.bucket,
        search = %config.search.url,
        "Collaborators configured"
    );

    let state = AppState::new(
        Arc::new(backend),
        Arc::new(search),
        config.placeholder_image_url.clone(),
    );
    let app = build_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(addr.as_str())
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("roster-api listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("roster-api stopped");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
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
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl-C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
