//! Cloudscope server
//!
//! Serves an inventory snapshot through the cached browser engine.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cloudscope::fetch::{Inventory, InventoryFetcher};
use cloudscope::{create_router, AppContext, AppState, Config};

/// Main entry point for the Cloudscope server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load and validate configuration from environment variables
/// 3. Build the context and register inventory fetchers
/// 4. Start background cache cleanup
/// 5. Preload the project list and every project-level kind
/// 6. Serve HTTP until SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cloudscope=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Cloudscope");

    let config = Config::from_env();
    config.validate()?;
    info!(
        "Configuration loaded: timeout={:?}, retries={}, cache_enabled={}, cache_max_bytes={}, port={}",
        config.api_timeout,
        config.api_max_retries,
        config.cache_enabled,
        config.cache_max_bytes,
        config.server_port
    );

    let inventory = match &config.inventory_path {
        Some(path) => Some(Arc::new(Inventory::load(path)?)),
        None => {
            warn!("CLOUDSCOPE_INVENTORY not set, no fetchers registered");
            None
        }
    };
    let ctx = AppContext::new(config.clone(), |registry, support| {
        if let Some(inventory) = inventory {
            InventoryFetcher::register_all(registry, inventory, support);
        }
    });

    ctx.cache.start_cleanup_task(config.cache_cleanup_interval);
    info!("Background cleanup task started");

    if ctx.state.fetchers().contains(cloudscope::ResourceKind::Project) {
        tokio::spawn(preload(ctx.clone()));
    }

    let app = create_router(AppState::new(ctx.clone()));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    ctx.cache.stop_cleanup_task();
    info!("Server shutdown complete");
    Ok(())
}

/// Loads projects, then every project-level kind, logging progress.
async fn preload(ctx: AppContext) {
    let projects = match ctx.state.load_projects(false).await {
        Ok(projects) => projects,
        Err(err) => {
            warn!("Preload aborted, could not list projects: {}", err);
            return;
        }
    };

    let mut report = |done: usize, total: usize, message: &str| {
        info!("Preload {}/{}: {}", done, total, message);
    };
    let summary = ctx
        .state
        .load_all_resources(&projects, Some(&mut report))
        .await;

    for failure in &summary.failed {
        warn!(
            "Preload left {} unloaded for {}: {}",
            failure.kind, failure.project_id, failure.error
        );
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
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
}
