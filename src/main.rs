//! File Input Service - Main Entry Point
//!
//! Hosts file input controls and exposes the validation pipeline over HTTP.

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use file_input::api::{self, handlers::AppState};
use file_input::types::ServiceConfig;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "file_input=info,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = ServiceConfig::from_env()?;

    info!("Starting File Input Service v{}", env!("CARGO_PKG_VERSION"));
    info!(defaults = ?config.default_attributes, "Default attributes");

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let max_idle = config.control_idle;
    let state = Arc::new(AppState::new(config));

    // Drop controls whose page went away without deleting them
    let sweeper = Arc::clone(&state);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(60));
        loop {
            interval.tick().await;
            let removed = sweeper.controls.write().await.cleanup_idle(max_idle);
            if removed > 0 {
                info!(removed, "Dropped idle controls");
            }
        }
    });

    let app = api::router(state);

    info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
