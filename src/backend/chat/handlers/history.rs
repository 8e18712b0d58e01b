/**
 * Chat History Handlers
 *
 * `GET /api/chat/{match_id}` returns the most recent messages of a match,
 * oldest first. `DELETE /api/chat/{match_id}` clears them when the match is
 * torn down.
 */

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::{ChatMessage, ConversationKey};

/// Query parameters of a history read
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    /// Number of messages to return; defaults to the configured history limit
    pub limit: Option<usize>,
}

/// Handle history read (GET /api/chat/{match_id})
///
/// # Errors
///
/// * `400 Bad Request` - empty match id
/// * `401 Unauthorized` - missing or invalid token
/// * `403 Forbidden` - caller is not on the match roster
/// * `500 Internal Server Error` - conversation log failure
pub async fn handle_get_history(
    AuthUser(user): AuthUser,
    Path(match_id): Path<String>,
    Query(query): Query<HistoryQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<ChatMessage>>, BackendError> {
    let key = ConversationKey::match_room(match_id)?;
    state.authorize(&key, &user.user_id).await?;

    let limit = query.limit.unwrap_or(state.config.realtime.history_limit);
    let messages = state.conversation_log().read_recent(&key, limit).await?;
    tracing::debug!("[Chat] {} read {} messages from {}", user.user_id, messages.len(), key);
    Ok(Json(messages))
}

/// Handle history clear (DELETE /api/chat/{match_id})
pub async fn handle_clear_history(
    AuthUser(user): AuthUser,
    Path(match_id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, BackendError> {
    let key = ConversationKey::match_room(match_id)?;
    state.authorize(&key, &user.user_id).await?;

    state.conversation_log().clear(&key).await?;
    tracing::info!("[Chat] {} cleared history of {}", user.user_id, key);
    Ok(StatusCode::NO_CONTENT)
}
