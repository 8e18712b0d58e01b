/**
 * Server Initialization
 *
 * This module handles the initialization and setup of the Axum HTTP server,
 * including state creation, database loading, and route configuration.
 *
 * # Initialization Process
 *
 * 1. Open the database pool (if `DATABASE_URL` is set) and run migrations
 * 2. Build the storage backends: PostgreSQL, or in-memory as a fallback
 * 3. Create the application state and the global notification feed
 * 4. Spawn the global feed consumer
 * 5. Create and configure the router
 */

use axum::Router;
use tokio::sync::mpsc;

use crate::backend::realtime::broadcast::run_global_consumer;
use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_database, ServerConfig};
use crate::backend::server::state::{AppState, Backends};
use crate::shared::RealtimeEvent;

/// Create and configure the Axum application
///
/// # Error Handling
///
/// The function is designed to be resilient:
/// - Missing database: server runs on in-memory backends, where nobody is a
///   member of any match until the roster is populated
/// - Migration failures: logged but don't prevent startup
pub async fn create_app(config: ServerConfig) -> Router<()> {
    tracing::info!("[Server] Initializing TeamUp chat server");

    let backends = match load_database(config.database_url.as_deref()).await {
        Some(pool) => Backends::postgres(pool),
        None => {
            tracing::warn!("[Server] Running without a database; history is lost on restart");
            Backends::in_memory()
        }
    };

    build_app(config, backends)
}

/// Build the router over explicit backends.
///
/// Must be called inside a Tokio runtime: the global feed consumer is
/// spawned here and lives as long as the returned router's state.
pub fn build_app(config: ServerConfig, backends: Backends) -> Router<()> {
    let (app_state, global_rx) = AppState::new(config, backends);
    build_router(app_state, global_rx)
}

/// Spawn the global consumer for an already built state and route it.
pub fn build_router(app_state: AppState, global_rx: mpsc::Receiver<RealtimeEvent>) -> Router<()> {
    tokio::spawn(run_global_consumer(global_rx, app_state.distributor.clone()));
    tracing::info!("[Server] Global notification consumer started");

    let app = create_router(app_state);
    tracing::info!("[Server] Router configured");
    app
}
