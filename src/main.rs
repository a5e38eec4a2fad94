//! tierkv - A two-tier local key-value cache service
//!
//! Serves newline-framed JSON requests over a Unix stream socket, backed by
//! an in-memory tier with TTL expiry and size eviction plus a SQLite-backed
//! durable tier.

mod config;
mod error;
mod models;
mod server;
mod storage;
mod tasks;

use std::path::Path;
use std::sync::Arc;

use tokio::signal;
use tokio::sync::{watch, Notify, RwLock};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use config::Config;
use storage::{DiskStore, MemoryStore, StorageRouter};
use tasks::spawn_sweeper;

/// Main entry point for the tierkv cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from the file given as the only CLI argument
/// 3. Open the durable store (fatal on failure)
/// 4. Create the memory store and start the background sweeper
/// 5. Bind the Unix socket and serve until SIGINT/SIGTERM
/// 6. Stop and join the sweeper, remove the socket file
///
/// Exits 0 on clean shutdown, 1 on configuration or startup error.
#[tokio::main]
async fn main() {
    // Initialize tracing subscriber with env filter
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tierkv=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting tierkv cache server");

    // The only CLI argument is the optional config file path.
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.json".to_string());
    let config = match Config::load(Path::new(&config_path)) {
        Ok(config) => config,
        Err(e) => {
            error!(path = %config_path, error = %e, "failed to load configuration");
            std::process::exit(1);
        }
    };
    info!(
        max_size_mb = config.ram.max_size_mb,
        db_file = %config.disk.db_file.display(),
        socket_path = %config.socket.socket_path.display(),
        "configuration loaded"
    );

    let disk = match DiskStore::open(&config.disk.db_file) {
        Ok(disk) => Arc::new(disk),
        Err(e) => {
            error!(error = %e, "failed to open durable store");
            std::process::exit(1);
        }
    };

    let memory = Arc::new(RwLock::new(MemoryStore::new(config.max_bytes())));
    let wakeup = Arc::new(Notify::new());
    let (stop_tx, stop_rx) = watch::channel(false);
    let sweeper = spawn_sweeper(Arc::clone(&memory), Arc::clone(&wakeup), stop_rx);

    let router = Arc::new(StorageRouter::new(memory, disk, wakeup));

    let listener = match server::bind(&config.socket.socket_path) {
        Ok(listener) => listener,
        Err(e) => {
            error!(
                path = %config.socket.socket_path.display(),
                error = %e,
                "failed to bind socket"
            );
            std::process::exit(1);
        }
    };
    info!(path = %config.socket.socket_path.display(), "listening");

    tokio::select! {
        result = server::serve(listener, router) => {
            if let Err(e) = result {
                error!(error = %e, "server loop failed");
            }
        }
        _ = shutdown_signal() => {
            info!("shutdown signal received");
        }
    }

    // Teardown order: set the stop flag, wake the sweeper, join it, and only
    // then let the store drop.
    let _ = stop_tx.send(true);
    if let Err(e) = sweeper.await {
        error!(error = %e, "sweeper did not stop cleanly");
    }
    let _ = std::fs::remove_file(&config.socket.socket_path);

    info!("Server shutdown complete");
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
