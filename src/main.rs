// This is the entry point of the channel directory server.
//
// **Architecture Overview:**
// - `core/` = Business logic (moderation workflow, rating aggregation)
// - `infra/` = Implementations of core traits (SQLite, in-memory)
// - `web/` = HTTP adapter (axum routes, admin sessions)
//
// This file's job is to:
// 1. Load configuration
// 2. Pick the listing store and build the services (dependency injection)
// 3. Serve the HTTP API

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "core/core_layer.rs"]
mod core;
#[path = "infra/infra_layer.rs"]
mod infra;
#[path = "web/web_layer.rs"]
mod web;

mod config;

use crate::config::{AppConfig, StoreKind};
use crate::infra::listings::{InMemoryListingStore, SqliteListingStore};
use crate::web::{AppState, SessionVerifier, SharedStore};
use anyhow::Context;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "channel_directory=info,tower_http=info".into()),
        )
        .init();

    let config = AppConfig::from_env()?;

    let store: SharedStore = match config.store {
        StoreKind::Sqlite => {
            let store = SqliteListingStore::connect(&config.database_url)
                .await
                .with_context(|| format!("Failed to open listing DB at {}", config.database_url))?;
            info!("Listing store: sqlite ({})", config.database_url);
            Arc::new(store)
        }
        StoreKind::Memory => {
            tracing::warn!("Listing store: in-memory, nothing will survive a restart");
            Arc::new(InMemoryListingStore::new())
        }
    };

    let state = AppState::new(store, SessionVerifier::new(&config.admin_jwt_secret));
    let app = web::router(state);

    let addr = config.bind_addr()?;
    info!("Channel directory listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
