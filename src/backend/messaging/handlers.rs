//! Friend Messaging HTTP Handlers
//!
//! Direct messages between friends and friend-graph notifications.
//!
//! A direct message goes through the same publisher as a `/ws/direct` frame:
//! it is stored in the pair's conversation (`dm:{low}:{high}`), delivered to
//! any open direct sockets of the pair, and announced as a `direct_message`
//! event on the global feed. Friend request notifications only travel over
//! the global feed.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::backend::chat::handlers::send::validate_body;
use crate::backend::chat::handlers::HistoryQuery;
use crate::backend::chat::publish::PublishError;
use crate::backend::error::BackendError;
use crate::backend::middleware::AuthUser;
use crate::backend::server::state::AppState;
use crate::shared::{ChatMessage, ConversationKey, RealtimeEvent, SharedError};

/// Body of a direct message send
#[derive(Debug, Deserialize)]
pub struct SendDirectMessageRequest {
    pub receiver_id: String,
    pub content: String,
}

/// Kind of friend-graph notification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FriendNotificationKind {
    /// A new friend request was sent
    Request,
    /// A friend request was accepted
    Accepted,
}

/// Body of a friend notification
#[derive(Debug, Deserialize)]
pub struct FriendNotificationRequest {
    pub receiver_id: String,
    pub kind: FriendNotificationKind,
}

/// Send a direct message (POST /api/friends/messages)
pub async fn send_direct_message(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(request): Json<SendDirectMessageRequest>,
) -> Result<(StatusCode, Json<ChatMessage>), BackendError> {
    let key = ConversationKey::direct(user.user_id.clone(), request.receiver_id.clone())?;
    validate_body(&request.content, state.config.realtime.max_frame_bytes)?;
    state.authorize(&key, &user.user_id).await?;
    let profile = state.sender_profile(&user.user_id).await?;

    let message = ChatMessage::new(user.user_id, &profile, request.content).with_receiver(request.receiver_id);
    match state.publisher.publish(&key, &message).await {
        Ok(_) => {
            tracing::info!("[Messaging] Direct message in {}", key);
            Ok((StatusCode::CREATED, Json(message)))
        }
        Err(PublishError::NotPersisted { source, .. }) => Err(source.into()),
        Err(PublishError::Distribution(e)) => Err(e.into()),
    }
}

/// Read direct message history (GET /api/friends/messages/{friend_id})
pub async fn get_direct_messages(
    AuthUser(user): AuthUser,
    Path(friend_id): Path<String>,
    Query(query): Query<HistoryQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<ChatMessage>>, BackendError> {
    let key = ConversationKey::direct(user.user_id.clone(), friend_id)?;
    state.authorize(&key, &user.user_id).await?;

    let limit = query.limit.unwrap_or(state.config.realtime.history_limit);
    let messages = state.conversation_log().read_recent(&key, limit).await?;
    Ok(Json(messages))
}

/// Announce a friend request or acceptance (POST /api/friends/notify)
pub async fn notify_friend_request(
    AuthUser(user): AuthUser,
    State(state): State<AppState>,
    Json(request): Json<FriendNotificationRequest>,
) -> Result<StatusCode, BackendError> {
    if request.receiver_id.trim().is_empty() {
        return Err(SharedError::validation("receiver_id", "receiver_id cannot be empty").into());
    }
    if request.receiver_id == user.user_id {
        return Err(SharedError::validation("receiver_id", "cannot notify yourself").into());
    }
    if state.profiles.snapshot(&request.receiver_id).await?.is_none() {
        return Err(BackendError::not_found(format!("no user {}", request.receiver_id)));
    }

    let accepted = request.kind == FriendNotificationKind::Accepted;
    let event = RealtimeEvent::friend_request(&user.user_id, &request.receiver_id, accepted);
    state.global_feed.publish(event).await?;

    tracing::info!(
        "[Messaging] Friend {:?} notification from {} to {}",
        request.kind,
        user.user_id,
        request.receiver_id
    );
    Ok(StatusCode::ACCEPTED)
}
