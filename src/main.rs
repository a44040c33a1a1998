//! Product QR Viewer - sortable product table with per-product QR codes
//!
//! Serves a single page listing every row of the local `products` SQLite
//! table. Each row carries an inline PNG QR code encoding the product's
//! fields. Also exposes:
//! - a JSON listing of the same rows
//! - a raw PNG endpoint per product
//! - a health check

mod app;
mod config;
mod http;
mod qr;
mod store;
mod view;

use std::net::SocketAddr;

use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::app::AppState;
use crate::config::Config;
use crate::http::build_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    init_tracing(&config.log_level, config.log_json);

    info!("Starting Product QR Viewer");
    info!("Server address: {}", config.server_addr);

    // Open the products database
    let pool = store::connect(&config).await?;

    // Create application state
    let state = AppState::new(config.clone(), pool.clone());

    // Build router
    let router = build_router(state);

    // Start server
    let addr: SocketAddr = config.server_addr;
    let listener = TcpListener::bind(addr).await?;

    info!("Server listening on {}", addr);
    info!("Product page: http://{}/", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    pool.close().await;

    info!("Server shutdown complete");
    Ok(())
}

/// Initialize tracing/logging
fn init_tracing(log_level: &str, json: bool) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_target(true))
            .init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(true))
            .init();
    }
}

/// Resolves on Ctrl+C, or SIGTERM where the platform has it
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                tokio::select! {
                    result = tokio::signal::ctrl_c() => log_interrupt(result),
                    _ = sigterm.recv() => info!("SIGTERM received, draining connections"),
                }
                return;
            }
            Err(e) => warn!("SIGTERM listener unavailable, only Ctrl+C will stop the server: {}", e),
        }
    }

    log_interrupt(tokio::signal::ctrl_c().await);
}

fn log_interrupt(result: std::io::Result<()>) {
    match result {
        Ok(()) => info!("Ctrl+C received, draining connections"),
        Err(e) => warn!("Ctrl+C listener failed, shutting down: {}", e),
    }
}
