//! bkm-web (BookMinder) - personal reading tracker
//!
//! Serves the book list and add/edit forms over HTTP. All state lives in
//! per-visitor in-memory sessions and is lost on restart.

use std::path::PathBuf;

use anyhow::{Context, Result};
use bkm_common::config::TomlConfig;
use bkm_web::{build_router, AppState};
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, reload, util::SubscriberInitExt, EnvFilter};

/// Command-line arguments for bkm-web
#[derive(Parser, Debug)]
#[command(name = "bkm-web")]
#[command(about = "BookMinder reading tracker")]
#[command(version)]
struct Args {
    /// TOML config file (defaults to the platform config dir)
    #[arg(short, long, env = "BKM_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind
    #[arg(short, long, env = "BKM_BIND")]
    bind: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "BKM_PORT")]
    port: Option<u16>,

    /// Log level when RUST_LOG is unset (trace, debug, info, warn, error)
    #[arg(long, env = "BKM_LOG_LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Tracing goes up first so config loading is reported; the filter is
    // swapped once the file's log level is known.
    let initial_level = args.log_level.clone().unwrap_or_else(|| "info".to_string());
    let (filter, filter_handle) = reload::Layer::new(log_filter(&initial_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting BookMinder (bkm-web) v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let (mut config, source) =
        TomlConfig::load(args.config.as_deref()).context("Failed to load configuration")?;
    source.log();

    if let Some(bind) = args.bind {
        config.bind = bind;
    }
    if let Some(port) = args.port {
        config.port = port;
    }
    match args.log_level {
        Some(level) => config.logging.level = level,
        None if config.logging.level != initial_level => {
            filter_handle
                .reload(log_filter(&config.logging.level))
                .context("Failed to apply configured log level")?;
        }
        None => {}
    }

    info!(
        "Session cookie '{}', idle timeout {}s, at most {} sessions",
        config.session.cookie_name, config.session.idle_timeout_secs, config.session.max_sessions
    );

    let state = AppState::new(&config.session);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind((config.bind.as_str(), config.port))
        .await
        .with_context(|| format!("Failed to bind to {}:{}", config.bind, config.port))?;
    let addr = listener.local_addr().context("Failed to read bound address")?;
    info!("bkm-web listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// `RUST_LOG` if set, else `level` for this service's crates
fn log_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "bkm_web={level},bkm_common={level},tower_http={level}"
        ))
    })
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
