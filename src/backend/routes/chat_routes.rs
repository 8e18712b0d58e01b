/**
 * Chat Route Handlers
 *
 * This module defines the WebSocket upgrade routes.
 *
 * # Routes
 *
 * - `GET /ws` - lobby; global notifications only
 * - `GET /ws/chat/{match_id}` - match chat room
 * - `GET /ws/direct/{friend_id}` - direct conversation with a friend
 *
 * Browsers cannot set headers on a WebSocket handshake, so these routes
 * also accept the token as a `token` query parameter.
 */

use axum::{routing::get, Router};

use crate::backend::realtime::subscription::{
    handle_direct_socket, handle_lobby_socket, handle_match_socket,
};
use crate::backend::server::state::AppState;

/// Configure WebSocket routes
pub fn configure_chat_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route("/ws", get(handle_lobby_socket))
        .route("/ws/chat/{match_id}", get(handle_match_socket))
        .route("/ws/direct/{friend_id}", get(handle_direct_socket))
}
