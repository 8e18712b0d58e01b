/**
 * Structured Match Events
 *
 * `POST /api/matches/{match_id}/events` lets the match service push live
 * updates (score changes, status transitions) to everyone watching a match.
 * Events go to the match room only and are not written to the chat history.
 */

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::realtime::BroadcastReport;
use crate::backend::server::state::AppState;
use crate::shared::{ConversationKey, EventType, RealtimeEvent};

/// Body of a structured match event
#[derive(Debug, Deserialize)]
pub struct MatchEventRequest {
    /// Event type, e.g. `score_update` or `match_status`
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Event payload
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Handle match event (POST /api/matches/{match_id}/events)
///
/// # Returns
///
/// `202 Accepted` with the delivery counts.
///
/// # Errors
///
/// * `400 Bad Request` - the event type is a global notification or an error
/// * `403 Forbidden` - caller is not on the match roster
pub async fn handle_match_event(
    AuthUser(user): AuthUser,
    Path(match_id): Path<String>,
    State(state): State<AppState>,
    Json(request): Json<MatchEventRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), BackendError> {
    let key = ConversationKey::match_room(match_id)?;
    if request.event_type.is_global() || matches!(request.event_type, EventType::Error | EventType::ChatMessage) {
        return Err(BackendError::handler(
            StatusCode::BAD_REQUEST,
            format!("'{}' cannot be sent as a match event", request.event_type.as_str()),
        ));
    }
    state.authorize(&key, &user.user_id).await?;

    let event = RealtimeEvent::new(request.event_type, request.data).in_room(key.clone());
    let BroadcastReport {
        delivered,
        dropped,
        evicted,
    } = state.distributor.deliver_to_room(&key, &event)?;

    Ok((
        StatusCode::ACCEPTED,
        Json(serde_json::json!({
            "delivered": delivered,
            "dropped": dropped,
            "evicted": evicted,
        })),
    ))
}
