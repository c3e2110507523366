//! storekit - Key-value and document store helpers
//!
//! Serves the expiring page cache over HTTP.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storekit::api::create_router;
use storekit::store::{MemoryStore, RedisStore, SharedStore};
use storekit::{spawn_cleanup_task, AppState, Config};

/// Main entry point for the storekit service.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect the store (Redis when `REDIS_URL` is set, in-process otherwise)
/// 4. Start the expiry sweep for the in-process store
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storekit=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting storekit");

    let config = Config::from_env();
    info!(
        "Configuration loaded: store={}, port={}, cleanup_interval={}s, request_timeout={}s",
        config.redis_url.as_deref().unwrap_or("in-process"),
        config.server_port,
        config.cleanup_interval,
        config.request_timeout
    );

    // Store handle lives for the whole process and is released on shutdown
    let (store, cleanup_handle): (SharedStore, Option<JoinHandle<()>>) = match &config.redis_url
    {
        Some(url) => {
            let redis = RedisStore::connect(url)
                .await
                .with_context(|| format!("failed to connect to Redis at {}", url))?;
            (Arc::new(redis), None)
        }
        None => {
            let memory = MemoryStore::new();
            let handle = spawn_cleanup_task(memory.clone(), config.cleanup_interval);
            info!("In-process store initialized with expiry sweep");
            (Arc::new(memory), Some(handle))
        }
    };

    let state = AppState::from_config(&config, store).context("failed to build page cache")?;
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cleanup_handle))
        .await
        .context("server error")?;

    info!("Server shutdown complete, store released");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the expiry sweep and allows graceful shutdown.
async fn shutdown_signal(cleanup_handle: Option<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
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

    if let Some(handle) = cleanup_handle {
        handle.abort();
        warn!("Expiry sweep aborted");
    }
}
