/**
 * WebSocket Subscription Handlers
 *
 * Upgrade endpoints for live connections:
 *
 * - `GET /ws/chat/{match_id}` - match chat room
 * - `GET /ws/direct/{friend_id}` - direct conversation with a friend
 * - `GET /ws` - lobby; receives global notifications only
 *
 * # Admission
 *
 * Every check runs before the upgrade, so a refused client gets a plain
 * HTTP error and never sees a socket:
 *
 * 1. Token (401)
 * 2. Membership guard (403)
 * 3. Sender profile, captured once for every message the connection sends (404)
 *
 * After the upgrade the connection is registered in its room, then three
 * tasks run until it closes: the writer, the heartbeat (when enabled) and the
 * inbound pump.
 */

use std::sync::Arc;

use axum::{
    extract::{
        ws::{WebSocket, WebSocketUpgrade},
        Path, State,
    },
    response::Response,
};
use futures_util::StreamExt;

use super::connection::ClientConnection;
use super::heartbeat::{run_heartbeat, HeartbeatResult};
use super::pump::{run_pump, run_writer, Session};
use crate::backend::error::BackendError;
use crate::backend::middleware::{AuthUser, AuthenticatedUser};
use crate::backend::server::state::AppState;
use crate::shared::{ConversationKey, ProfileSnapshot};

/// Handle match chat subscription (GET /ws/chat/{match_id})
pub async fn handle_match_socket(
    AuthUser(user): AuthUser,
    Path(match_id): Path<String>,
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> Result<Response, BackendError> {
    let key = ConversationKey::match_room(match_id)?;
    admit(ws, state, user, key).await
}

/// Handle direct conversation subscription (GET /ws/direct/{friend_id})
pub async fn handle_direct_socket(
    AuthUser(user): AuthUser,
    Path(friend_id): Path<String>,
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> Result<Response, BackendError> {
    let key = ConversationKey::direct(user.user_id.clone(), friend_id)?;
    admit(ws, state, user, key).await
}

/// Handle lobby subscription (GET /ws)
///
/// Lobby connections only receive global events; anything they send is
/// ignored, so no profile is looked up.
pub async fn handle_lobby_socket(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> Result<Response, BackendError> {
    let profile = ProfileSnapshot::new(user.username.clone().unwrap_or_else(|| user.user_id.clone()), None);
    Ok(upgrade(ws, state, user, ConversationKey::lobby(), profile))
}

async fn admit(
    ws: WebSocketUpgrade,
    state: AppState,
    user: AuthenticatedUser,
    key: ConversationKey,
) -> Result<Response, BackendError> {
    state.authorize(&key, &user.user_id).await?;
    let profile = state.sender_profile(&user.user_id).await?;
    Ok(upgrade(ws, state, user, key, profile))
}

fn upgrade(
    ws: WebSocketUpgrade,
    state: AppState,
    user: AuthenticatedUser,
    key: ConversationKey,
    profile: ProfileSnapshot,
) -> Response {
    tracing::info!("[Realtime] Upgrading {} into {}", user.user_id, key);
    ws.on_upgrade(move |socket| serve_socket(socket, state, user, key, profile))
}

/// Drive one admitted socket until it closes.
async fn serve_socket(
    socket: WebSocket,
    state: AppState,
    user: AuthenticatedUser,
    key: ConversationKey,
    profile: ProfileSnapshot,
) {
    let realtime = state.config.realtime.clone();
    let (sink, stream) = socket.split();
    let (connection, outbound) = ClientConnection::new(user.user_id, realtime.outbound_buffer);

    state.registry.register(key.clone(), Arc::clone(&connection));

    let writer = tokio::spawn(run_writer(sink, outbound, connection.shutdown_token()));

    if realtime.heartbeat_enabled() {
        let registry = Arc::clone(&state.registry);
        let watched = Arc::clone(&connection);
        let room = key.clone();
        tokio::spawn(async move {
            let result = run_heartbeat(
                Arc::clone(&watched),
                realtime.heartbeat_interval,
                realtime.heartbeat_timeout,
            )
            .await;
            if result == HeartbeatResult::TimedOut && !registry.evict(&room, watched.id) {
                let _ = watched.close();
            }
        });
    }

    let session = Session {
        key,
        connection,
        profile,
    };
    run_pump(stream, session, state.publisher.clone(), realtime.max_frame_bytes).await;

    if let Err(e) = writer.await {
        tracing::error!("[Realtime] Writer task failed: {}", e);
    }
}
