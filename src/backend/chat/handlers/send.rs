/**
 * HTTP Message Send
 *
 * `POST /api/chat/{match_id}/messages` for clients without a socket. The
 * message is stamped, persisted and delivered exactly like a frame read by
 * the WebSocket pump.
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::backend::chat::publish::PublishError;
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::{ChatMessage, ConversationKey, SharedError};

/// Body of an HTTP message send
#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    /// Message text
    pub message: String,
}

/// Handle message send (POST /api/chat/{match_id}/messages)
///
/// # Returns
///
/// `201 Created` with the stored message.
///
/// # Errors
///
/// * `400 Bad Request` - empty or oversized message
/// * `403 Forbidden` - caller is not on the match roster
/// * `404 Not Found` - caller has no profile
/// * `500 Internal Server Error` - message delivered live but not persisted
pub async fn handle_send_message(
    AuthUser(user): AuthUser,
    Path(match_id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<ChatMessage>), BackendError> {
    let key = ConversationKey::match_room(match_id)?;
    validate_body(&request.message, state.config.realtime.max_frame_bytes)?;
    state.authorize(&key, &user.user_id).await?;
    let profile = state.sender_profile(&user.user_id).await?;

    let message = ChatMessage::new(user.user_id, &profile, request.message);
    match state.publisher.publish(&key, &message).await {
        Ok(report) => {
            tracing::info!("[Chat] HTTP message in {} reached {} connections", key, report.delivered);
            Ok((StatusCode::CREATED, Json(message)))
        }
        Err(PublishError::NotPersisted { source, .. }) => Err(source.into()),
        Err(PublishError::Distribution(e)) => Err(e.into()),
    }
}

/// Same acceptance rules as inbound WebSocket frames.
pub(crate) fn validate_body(body: &str, max_bytes: usize) -> Result<(), SharedError> {
    if body.trim().is_empty() {
        return Err(SharedError::validation("message", "message cannot be empty"));
    }
    if body.len() > max_bytes {
        return Err(SharedError::validation(
            "message",
            format!("message exceeds {} bytes", max_bytes),
        ));
    }
    Ok(())
}
