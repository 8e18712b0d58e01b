/**
 * API Route Handlers
 *
 * This module defines the HTTP endpoints of the chat service.
 *
 * # Routes
 *
 * ## Match Chat
 * - `GET /api/chat/{match_id}?limit=N` - most recent messages, oldest first
 * - `DELETE /api/chat/{match_id}` - clear the match history
 * - `POST /api/chat/{match_id}/messages` - send a message
 * - `POST /api/matches/{match_id}/events` - push a structured event to the room
 *
 * ## Friends
 * - `POST /api/friends/messages` - send a direct message
 * - `GET /api/friends/messages/{friend_id}?limit=N` - direct message history
 * - `POST /api/friends/notify` - friend request or acceptance notification
 */

use axum::{
    routing::{get, post},
    Router,
};

use crate::backend::chat::handlers::{
    handle_clear_history, handle_get_history, handle_match_event, handle_send_message,
};
use crate::backend::messaging::handlers::{
    get_direct_messages, notify_friend_request, send_direct_message,
};
use crate::backend::server::state::AppState;

/// Configure API routes
///
/// # Authentication
///
/// All routes require a JWT in the `Authorization` header. Match routes
/// additionally require the caller to be on the match roster; friend message
/// routes require an existing friendship.
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        // Match chat endpoints
        .route(
            "/api/chat/{match_id}",
            get(handle_get_history).delete(handle_clear_history),
        )
        .route("/api/chat/{match_id}/messages", post(handle_send_message))
        .route("/api/matches/{match_id}/events", post(handle_match_event))
        // Friend endpoints
        .route("/api/friends/messages", post(send_direct_message))
        .route("/api/friends/messages/{friend_id}", get(get_direct_messages))
        .route("/api/friends/notify", post(notify_friend_request))
}
