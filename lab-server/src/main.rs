//! lab-server - laboratory sample tracking service
//!
//! Serves the sample lifecycle and review API over HTTP, backed by a
//! SQLite database holding the sample and reviewed-sample stores.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lab_common::config::{ConfigOverrides, ServiceConfig};
use lab_server::db::Database;
use lab_server::{build_router, AppState};
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for lab-server
#[derive(Parser, Debug)]
#[command(name = "lab-server")]
#[command(about = "Laboratory sample tracking service")]
#[command(version)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    port: Option<u16>,

    /// Address to bind to
    #[arg(short, long, env = "LAB_BIND")]
    bind: Option<String>,

    /// SQLite database file
    #[arg(short, long, env = "LAB_DATABASE")]
    database: Option<PathBuf>,

    /// Connection pool size
    #[arg(long, env = "LAB_MAX_CONNECTIONS")]
    max_connections: Option<u32>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lab_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting lab-server v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let args = Args::parse();

    let config = ServiceConfig::load(ConfigOverrides {
        database: args.database,
        bind: args.bind,
        port: args.port,
        max_connections: args.max_connections,
    })
    .context("Failed to resolve configuration")?;

    info!("Database path: {}", config.database.display());

    let db = Database::open(&config.database, config.max_connections)
        .await
        .context("Failed to open database")?;
    info!(
        "✓ Connected to database (pool size {})",
        config.max_connections
    );

    let app = build_router(AppState::new(db.clone()));

    let addr: SocketAddr = format!("{}:{}", config.bind, config.port)
        .parse()
        .context("Invalid bind address")?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind to address")?;

    info!("lab-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    db.close().await;
    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
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
