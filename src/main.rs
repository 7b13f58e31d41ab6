//! Order Cache - an order lookup service fronted by a bounded in-memory cache
//!
//! Provides LRU eviction, idle-time expiry and snapshot warm start for cached orders.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::{mpsc, watch};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use order_cache::api::create_router;
use order_cache::repository::InMemoryRepository;
use order_cache::{spawn_ingest_task, AppState, CacheError, Config};

/// Main entry point for the order cache service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load and validate configuration from environment variables
/// 3. Create the order cache (snapshot warm start, expiry sweeper)
/// 4. Start the ingestion consumer if enabled
/// 5. Serve HTTP until SIGINT/SIGTERM
/// 6. Stop background tasks and dump the cache snapshot
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "order_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Order Cache Service");

    let config = Config::from_env();
    config.validate().context("invalid configuration")?;
    info!(
        "Configuration loaded: capacity={}, ttl={}s, sweep_interval={}s, snapshot={:?}, port={}",
        config.cache_capacity,
        config.cache_ttl,
        config.sweep_interval,
        config.snapshot_path,
        config.server_port
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let repo = Arc::new(InMemoryRepository::new());
    let state = AppState::from_config(&config.cache_config(), repo, shutdown_rx.clone())
        .await
        .context("failed to create order cache")?;
    info!("Order cache initialized");

    let ingest_handle = if config.ingest_stdin {
        let (tx, rx) = mpsc::channel(256);
        tokio::spawn(forward_stdin(tx));
        Some(spawn_ingest_task(state.orders.clone(), rx, shutdown_rx.clone()))
    } else {
        None
    };

    let cache = state.cache.clone();
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_tx))
        .await
        .context("server error")?;

    // Background tasks saw the shutdown flag; wait for them before the dump
    cache.join_sweeper().await;
    if let Some(handle) = ingest_handle {
        if let Err(err) = handle.await {
            warn!(error = %err, "Ingestion task ended abnormally");
        }
    }

    match cache.close().await {
        Ok(()) => {}
        Err(CacheError::SnapshotNotConfigured) => {
            info!("No snapshot path configured, skipping cache dump")
        }
        Err(err) => error!(error = %err, "Failed to save cache snapshot"),
    }

    info!("Server shutdown complete");
    Ok(())
}

/// Forwards each stdin line to the ingestion channel until EOF.
async fn forward_stdin(tx: mpsc::Sender<Vec<u8>>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) if line.trim().is_empty() => continue,
            Ok(Some(line)) => {
                if tx.send(line.into_bytes()).await.is_err() {
                    break;
                }
            }
            Ok(None) => break,
            Err(err) => {
                error!(error = %err, "Failed to read from stdin");
                break;
            }
        }
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM), then notifies background tasks.
async fn shutdown_signal(shutdown_tx: watch::Sender<bool>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(error = %err, "Failed to install Ctrl+C handler");
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
                error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
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

    if shutdown_tx.send(true).is_err() {
        warn!("No background task was listening for shutdown");
    }
}
