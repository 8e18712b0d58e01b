/**
 * Real-time Event System
 *
 * Every frame the server writes to a live connection is a `RealtimeEvent`
 * serialized as JSON. Room-scoped events (chat messages, score updates)
 * carry the room they belong to; global events (friend requests, direct
 * message notifications) carry no room and are filtered client-side by
 * recipient.
 */
use serde::{Deserialize, Serialize};

use crate::shared::conversation::ConversationKey;
use crate::shared::message::{now_rfc3339, ChatMessage};

/// Type of real-time event
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum EventType {
    /// Chat message in a match room
    ChatMessage,
    /// Direct message between friends
    DirectMessage,
    /// Incoming friend request
    FriendRequest,
    /// Friend request accepted
    FriendRequestAccepted,
    /// Live score change of a match
    ScoreUpdate,
    /// Match lifecycle change (upcoming, ongoing, completed)
    MatchStatus,
    /// Generic user notification
    Notification,
    /// Error reported back to the sending connection
    Error,
    /// Any other structured event pushed by a collaborator
    Custom(String),
}

impl EventType {
    /// Wire name of the event type
    pub fn as_str(&self) -> &str {
        match self {
            Self::ChatMessage => "chat_message",
            Self::DirectMessage => "direct_message",
            Self::FriendRequest => "friend_request",
            Self::FriendRequestAccepted => "friend_request_accepted",
            Self::ScoreUpdate => "score_update",
            Self::MatchStatus => "match_status",
            Self::Notification => "notification",
            Self::Error => "error",
            Self::Custom(name) => name.as_str(),
        }
    }

    /// Whether this event type is delivered to every connection
    pub fn is_global(&self) -> bool {
        matches!(
            self,
            Self::DirectMessage | Self::FriendRequest | Self::FriendRequestAccepted | Self::Notification
        )
    }
}

impl From<String> for EventType {
    fn from(name: String) -> Self {
        match name.as_str() {
            "chat_message" => Self::ChatMessage,
            "direct_message" => Self::DirectMessage,
            "friend_request" => Self::FriendRequest,
            "friend_request_accepted" => Self::FriendRequestAccepted,
            "score_update" => Self::ScoreUpdate,
            "match_status" => Self::MatchStatus,
            "notification" => Self::Notification,
            "error" => Self::Error,
            _ => Self::Custom(name),
        }
    }
}

impl From<EventType> for String {
    fn from(event_type: EventType) -> Self {
        event_type.as_str().to_string()
    }
}

/// Real-time event written to live connections
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RealtimeEvent {
    /// Type of event
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Room the event belongs to; absent for global events
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub room: Option<ConversationKey>,
    /// Event payload (JSON-serializable data)
    pub payload: serde_json::Value,
    /// Timestamp when the event was emitted
    pub timestamp: String,
}

impl RealtimeEvent {
    /// Create a new real-time event
    pub fn new(event_type: EventType, payload: serde_json::Value) -> Self {
        Self {
            event_type,
            room: None,
            payload,
            timestamp: now_rfc3339(),
        }
    }

    /// Scope the event to a room
    pub fn in_room(mut self, room: ConversationKey) -> Self {
        self.room = Some(room);
        self
    }

    /// Chat message delivered to its room
    pub fn chat_message(room: ConversationKey, message: &ChatMessage) -> Result<Self, serde_json::Error> {
        Ok(Self::new(EventType::ChatMessage, serde_json::to_value(message)?).in_room(room))
    }

    /// Direct message notification, delivered globally
    pub fn direct_message(message: &ChatMessage) -> Result<Self, serde_json::Error> {
        Ok(Self::new(EventType::DirectMessage, serde_json::to_value(message)?))
    }

    /// Friend request notification, delivered globally
    pub fn friend_request(sender_id: &str, receiver_id: &str, accepted: bool) -> Self {
        let event_type = if accepted {
            EventType::FriendRequestAccepted
        } else {
            EventType::FriendRequest
        };
        Self::new(
            event_type,
            serde_json::json!({
                "sender_id": sender_id,
                "receiver_id": receiver_id,
            }),
        )
    }

    /// Error reported to a single connection
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(
            EventType::Error,
            serde_json::json!({ "message": message.into() }),
        )
    }
}
