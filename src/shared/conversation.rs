/**
 * Conversation Keys
 *
 * A conversation key scopes one room: a match chat, a direct-message pair,
 * or the lobby that only receives global notifications. The same key is
 * used to look up live connections in the registry and the history in the
 * conversation log.
 *
 * # Storage Layout
 *
 * - `chat:{match_id}` - match chat
 * - `dm:{low}:{high}` - direct messages, user ids sorted so both sides share one key
 * - `lobby` - notification-only connections
 */
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::shared::error::SharedError;

const MATCH_PREFIX: &str = "chat:";
const DIRECT_PREFIX: &str = "dm:";
const LOBBY_KEY: &str = "lobby";

/// Identifier of a room or direct-message pair
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ConversationKey {
    /// Chat room of one match
    Match(String),
    /// Direct conversation between two users (`low < high`)
    Direct {
        /// Lexicographically smaller user id
        low: String,
        /// Lexicographically larger user id
        high: String,
    },
    /// Notification-only room for connections that joined no conversation
    Lobby,
}

impl ConversationKey {
    /// Key of a match chat room
    pub fn match_room(match_id: impl Into<String>) -> Result<Self, SharedError> {
        let match_id = match_id.into();
        validate_id("match_id", &match_id)?;
        Ok(Self::Match(match_id))
    }

    /// Key of the direct conversation between two users
    ///
    /// The pair is unordered: `direct(a, b) == direct(b, a)`.
    pub fn direct(user_a: impl Into<String>, user_b: impl Into<String>) -> Result<Self, SharedError> {
        let user_a = user_a.into();
        let user_b = user_b.into();
        validate_id("sender_id", &user_a)?;
        validate_id("receiver_id", &user_b)?;
        if user_a == user_b {
            return Err(SharedError::validation(
                "receiver_id",
                "sender_id and receiver_id cannot be the same",
            ));
        }

        let (low, high) = if user_a < user_b {
            (user_a, user_b)
        } else {
            (user_b, user_a)
        };
        Ok(Self::Direct { low, high })
    }

    /// Key of the lobby
    pub fn lobby() -> Self {
        Self::Lobby
    }

    /// String form used by the conversation log
    pub fn storage_key(&self) -> String {
        match self {
            Self::Match(match_id) => format!("{MATCH_PREFIX}{match_id}"),
            Self::Direct { low, high } => format!("{DIRECT_PREFIX}{low}:{high}"),
            Self::Lobby => LOBBY_KEY.to_string(),
        }
    }

    /// Parse a key previously produced by [`ConversationKey::storage_key`]
    pub fn parse(raw: &str) -> Result<Self, SharedError> {
        if raw == LOBBY_KEY {
            return Ok(Self::Lobby);
        }
        if let Some(match_id) = raw.strip_prefix(MATCH_PREFIX) {
            return Self::match_room(match_id);
        }
        if let Some(pair) = raw.strip_prefix(DIRECT_PREFIX) {
            let (a, b) = pair
                .split_once(':')
                .ok_or_else(|| SharedError::validation("conversation_key", "malformed direct key"))?;
            return Self::direct(a, b);
        }
        Err(SharedError::validation(
            "conversation_key",
            format!("unknown conversation key: {raw}"),
        ))
    }

    /// Whether this is a direct conversation that includes `user_id`
    pub fn is_direct_participant(&self, user_id: &str) -> bool {
        match self {
            Self::Direct { low, high } => low == user_id || high == user_id,
            _ => false,
        }
    }

    /// Whether messages sent in this room are persisted and relayed
    pub fn accepts_chat(&self) -> bool {
        !matches!(self, Self::Lobby)
    }
}

fn validate_id(field: &str, value: &str) -> Result<(), SharedError> {
    if value.trim().is_empty() {
        return Err(SharedError::validation(field, format!("{field} cannot be empty")));
    }
    if value.contains(':') {
        return Err(SharedError::validation(field, format!("{field} cannot contain ':'")));
    }
    Ok(())
}

impl fmt::Display for ConversationKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.storage_key())
    }
}

impl From<ConversationKey> for String {
    fn from(key: ConversationKey) -> Self {
        key.storage_key()
    }
}

impl TryFrom<String> for ConversationKey {
    type Error = SharedError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(&raw)
    }
}
