//! Bundle manager service
//!
//! Serves the bundle manager and installer proxy calls used by
//! `bundle_test_tool` over HTTP.
//!
//! # Fixtures
//!
//! The registry is seeded in one of two ways:
//!
//! 1. **Built-in fixtures** (default): three bundles, including the
//!    preinstalled system bundle `com.ohos.settings`.
//!
//! 2. **Fixtures file**: a TOML file given with `--fixtures` or
//!    `BUNDLEMGRD_FIXTURES`, replacing the built-in bundles.

use anyhow::{Context, Result};
use bundlemgrd::{create_router, AppState, BundleRegistry, Fixtures};
use clap::Parser;
use std::path::PathBuf;
use tokio::signal;
use tracing::info;

/// Bundle manager API server
#[derive(Parser, Debug)]
#[command(name = "bundlemgrd")]
#[command(version, about = "Bundle Manager API Server", long_about = None)]
struct Args {
    /// Server bind address
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// Server port
    #[arg(short, long, default_value_t = 8620)]
    port: u16,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// TOML file with the bundles to serve
    #[arg(long, env = "BUNDLEMGRD_FIXTURES")]
    fixtures: Option<PathBuf>,

    /// Answer installer calls with an always-succeeding mock
    ///
    /// The registry is left untouched by install and uninstall requests.
    #[arg(long)]
    mock_installer: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(args.verbose);

    info!("Bundle manager starting...");

    let fixtures = match &args.fixtures {
        Some(path) => Fixtures::load(path)
            .await
            .with_context(|| format!("Failed to load fixtures from {}", path.display()))?,
        None => {
            info!("No fixtures file, using built-in bundles");
            Fixtures::builtin()
        }
    };
    let registry = BundleRegistry::new(fixtures);
    info!("Registry initialized: {} bundle(s)", registry.bundle_count());

    let app_state = AppState::new(registry, args.mock_installer);
    info!("Installer: {}", app_state.installer_kind);

    let app = create_router(app_state);

    let bind_addr = format!("{}:{}", args.bind, args.port);
    info!("Starting server on {}", bind_addr);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!("Bundle manager listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down gracefully...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down gracefully...");
        },
    }
}

/// Initialize tracing subscriber for logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
