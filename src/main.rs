//! Emissions Cache - A priority-aware TTL cache for emissions lookups
//!
//! Serves `POST /measure` from an in-memory cache, fetching misses from the
//! measurement API in one batched call.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use emissions_cache::api::create_router;
use emissions_cache::fetch::MeasureApiClient;
use emissions_cache::{spawn_expiry_reaper, AppState, Config};

/// Main entry point for the emissions cache server.
///
/// # Startup Sequence
/// 1. Load `.env` if present, then configuration from environment variables
/// 2. Initialize tracing subscriber for logging
/// 3. Build the measurement API client
/// 4. Create cache store and batch coordinator
/// 5. Start the expiry reaper
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real environment variables take precedence
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Defaults to "info" level (warn in production), overridable with RUST_LOG
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.default_log_filter().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Emissions Cache Server");
    info!(
        "Configuration loaded: max_entries={}, cache_ttl={}s, port={}, fetch_timeout={}s",
        config.max_entries, config.cache_ttl, config.server_port, config.fetch_timeout
    );

    let api_token = config.require_api_token()?;
    let fetcher = MeasureApiClient::from_config(&config, api_token)
        .context("Failed to build measurement API client")?;

    let state = AppState::from_config(&config, Arc::new(fetcher));
    info!("Cache store initialized");

    let reaper_handle = spawn_expiry_reaper(state.cache().clone());
    info!("Expiry reaper started");

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(reaper_handle))
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the expiry reaper and allows graceful shutdown.
async fn shutdown_signal(reaper_handle: tokio::task::JoinHandle<()>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
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
                warn!("Failed to install SIGTERM handler: {}", err);
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

    reaper_handle.abort();
    warn!("Expiry reaper aborted");
}
