//! Main REST API server for the students service.
//!
//! Loads configuration, opens SQLite storage, serves the REST API and
//! shuts down gracefully on Ctrl+C or SIGTERM.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use students_api::{router::Router, server::Server};
use students_core::{config::AppConfig, SqliteStorage};
use tokio::signal;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for the students server.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a TOML config file
    #[arg(short, long, env = "CONFIG_PATH")]
    config: Option<PathBuf>,

    /// Address to bind, overrides `http_server.address`
    #[arg(long)]
    addr: Option<String>,

    /// SQLite database file, overrides `storage_path`
    #[arg(long)]
    storage_path: Option<PathBuf>,
}

fn load_config(args: &Args) -> anyhow::Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };

    if let Some(addr) = &args.addr {
        config.http_server.address = addr.clone();
    }
    if let Some(storage_path) = &args.storage_path {
        config.storage_path = storage_path.clone();
    }

    config.validate()?;
    Ok(config)
}

/// Resolves on Ctrl+C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {}
        () = terminate => {}
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Arc::new(load_config(&args)?);

    if let Some(parent) = config.storage_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create storage directory {}", parent.display())
            })?;
        }
    }

    let storage = SqliteStorage::connect(&config.storage_path)
        .await
        .with_context(|| format!("Failed to open storage {}", config.storage_path.display()))?;

    tracing::info!(
        env = %config.env,
        version = env!("CARGO_PKG_VERSION"),
        storage_path = %config.storage_path.display(),
        "Storage initialized"
    );

    let router = Router::new(Arc::new(storage.clone()), config.clone());
    let server = Server::bind(config.http_server.address.as_str(), router)
        .await
        .with_context(|| format!("Failed to bind {}", config.http_server.address))?;

    server
        .serve_with_shutdown(
            shutdown_signal(),
            Duration::from_millis(config.shutdown_grace_ms),
        )
        .await?;

    storage.close().await;
    Ok(())
}
