//! Gascon API Server
//!
//! Main entry point for the gas consumption control service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gascon_api::{AppState, InMemoryStore, create_router};
use gascon_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gascon=debug,gascon_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;
    let timezone = config.organization.timezone()?;

    // Load records
    let store = match &config.data.dataset_path {
        Some(path) => {
            let store = InMemoryStore::load(path).await?;
            info!(path = %path, "Dataset loaded");
            store
        }
        None => {
            info!("No dataset configured, starting with an empty store");
            InMemoryStore::default()
        }
    };

    // Create application state
    let state = AppState {
        store: Arc::new(store),
        timezone,
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!(timezone = %timezone, "Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
