/**
 * Chat Message Data Structure
 *
 * This module defines the message that flows through the realtime core:
 * built once when a frame (or an HTTP send) is received, appended to the
 * conversation log, and fanned out to live connections.
 *
 * The sender's display name and avatar are copied into the message at send
 * time. History therefore shows the profile as it was when the message was
 * written, not the sender's current profile.
 */
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Profile fields captured when a connection is admitted
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileSnapshot {
    /// Display name (the user's username)
    pub display_name: String,
    /// Avatar reference (profile photo URL), if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

impl ProfileSnapshot {
    /// Create a new snapshot
    pub fn new(display_name: impl Into<String>, avatar_url: Option<String>) -> Self {
        Self {
            display_name: display_name.into(),
            avatar_url,
        }
    }
}

/// A single chat message
///
/// Immutable once constructed. The timestamp is generated by the server
/// at receipt time, never taken from the client.
///
/// # Fields
/// * `sender_id` - Authenticated sender
/// * `display_name` / `avatar_url` - Profile snapshot at send time
/// * `body` - Message text
/// * `timestamp` - RFC3339 timestamp
/// * `receiver_id` - Recipient, for direct messages only
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatMessage {
    /// Authenticated sender id
    pub sender_id: String,
    /// Sender's display name when the message was sent
    pub display_name: String,
    /// Sender's avatar when the message was sent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
    /// Message text
    pub body: String,
    /// RFC3339 timestamp assigned by the server
    pub timestamp: String,
    /// Recipient of a direct message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub receiver_id: Option<String>,
}

impl ChatMessage {
    /// Create a message stamped with the current server time
    pub fn new(sender_id: impl Into<String>, profile: &ProfileSnapshot, body: impl Into<String>) -> Self {
        Self {
            sender_id: sender_id.into(),
            display_name: profile.display_name.clone(),
            avatar_url: profile.avatar_url.clone(),
            body: body.into(),
            timestamp: now_rfc3339(),
            receiver_id: None,
        }
    }

    /// Address the message to a single recipient
    pub fn with_receiver(mut self, receiver_id: impl Into<String>) -> Self {
        self.receiver_id = Some(receiver_id.into());
        self
    }
}

/// Current UTC time as an RFC3339 string with millisecond precision
pub fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
