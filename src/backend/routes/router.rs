/**
 * Router Configuration
 *
 * This module provides the main router creation function that combines
 * all route configurations into a single Axum router.
 *
 * # Route Order
 *
 * 1. Chat routes (WebSocket upgrades)
 * 2. API routes (history, sends, match events, friend messaging)
 * 3. Health check
 * 4. Fallback handler (404)
 *
 * Every route except `/health` resolves the caller from a JWT.
 */

use axum::{extract::State, routing::get, Json, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::backend::error::BackendError;
use crate::backend::routes::api_routes::configure_api_routes;
use crate::backend::routes::chat_routes::configure_chat_routes;
use crate::backend::server::state::AppState;

/// Create the Axum router with all routes configured
///
/// # Route Details
///
/// ## Chat Routes
///
/// - `GET /ws` - lobby socket, global notifications only
/// - `GET /ws/chat/{match_id}` - match chat socket
/// - `GET /ws/direct/{friend_id}` - direct conversation socket
///
/// ## API Routes
///
/// - `GET /api/chat/{match_id}` - recent history
/// - `DELETE /api/chat/{match_id}` - clear history
/// - `POST /api/chat/{match_id}/messages` - send a message
/// - `POST /api/matches/{match_id}/events` - structured match event
/// - `POST /api/friends/messages` - send a direct message
/// - `GET /api/friends/messages/{friend_id}` - direct history
/// - `POST /api/friends/notify` - friend request notification
///
/// ## Health
///
/// - `GET /health` - liveness plus the number of open connections
pub fn create_router(app_state: AppState) -> Router<()> {
    let router = Router::new();

    // Add WebSocket routes
    let router = configure_chat_routes(router);

    // Add API routes
    let router = configure_api_routes(router);

    let router = router
        .route("/health", get(health))
        .fallback(|| async { BackendError::not_found("no such route") });

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

/// Health check (GET /health)
async fn health(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "connections": state.registry.connection_count(),
        "rooms": state.registry.room_count(),
    }))
}
