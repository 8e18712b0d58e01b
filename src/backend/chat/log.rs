/**
 * Durable Conversation Log
 *
 * Append-only, per-conversation history. Entries are serialized
 * `ChatMessage`s; read order is append order. Reads return the most recent
 * `limit` entries, oldest first, so a client can render them top to bottom.
 *
 * A conversation may carry an expiry. Once it passes, the conversation reads
 * as empty and the next append starts a fresh history.
 *
 * Two backends implement the trait:
 * - `InMemoryConversationLog` (this module), used when no database is configured
 * - `PgConversationLog` (`chat::db`), backed by PostgreSQL
 */
use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;

use crate::shared::{ChatMessage, ConversationKey};

/// Conversation log errors
#[derive(Debug, Error)]
pub enum LogError {
    /// Backing store rejected the operation
    #[error("conversation log storage error: {0}")]
    Storage(String),

    /// Stored entry could not be encoded or decoded
    #[error("conversation log entry is not valid JSON: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<sqlx::Error> for LogError {
    fn from(err: sqlx::Error) -> Self {
        Self::Storage(err.to_string())
    }
}

/// Append-only per-conversation history
#[async_trait]
pub trait ConversationLog: Send + Sync {
    /// Append a message at the end of the conversation.
    async fn append(&self, key: &ConversationKey, message: &ChatMessage) -> Result<(), LogError>;

    /// The newest `limit` messages, oldest first.
    ///
    /// `limit == 0` returns nothing; a limit at or above the history length
    /// returns the whole history.
    async fn read_recent(&self, key: &ConversationKey, limit: usize) -> Result<Vec<ChatMessage>, LogError>;

    /// Remove every message of the conversation.
    async fn clear(&self, key: &ConversationKey) -> Result<(), LogError>;

    /// Expire the conversation `ttl` from now. No-op for an empty conversation.
    async fn set_expiry(&self, key: &ConversationKey, ttl: Duration) -> Result<(), LogError>;
}

#[derive(Debug, Default)]
struct Conversation {
    messages: Vec<ChatMessage>,
    expires_at: Option<Instant>,
}

impl Conversation {
    fn is_expired(&self, now: Instant) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// In-memory conversation log
#[derive(Debug, Default)]
pub struct InMemoryConversationLog {
    conversations: RwLock<HashMap<ConversationKey, Conversation>>,
}

impl InMemoryConversationLog {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationLog for InMemoryConversationLog {
    async fn append(&self, key: &ConversationKey, message: &ChatMessage) -> Result<(), LogError> {
        let mut conversations = self.conversations.write().await;
        let conversation = conversations.entry(key.clone()).or_default();
        if conversation.is_expired(Instant::now()) {
            *conversation = Conversation::default();
        }
        conversation.messages.push(message.clone());
        Ok(())
    }

    async fn read_recent(&self, key: &ConversationKey, limit: usize) -> Result<Vec<ChatMessage>, LogError> {
        let conversations = self.conversations.read().await;
        let Some(conversation) = conversations.get(key) else {
            return Ok(Vec::new());
        };
        if conversation.is_expired(Instant::now()) {
            return Ok(Vec::new());
        }
        let start = conversation.messages.len().saturating_sub(limit);
        Ok(conversation.messages[start..].to_vec())
    }

    async fn clear(&self, key: &ConversationKey) -> Result<(), LogError> {
        let _ = self.conversations.write().await.remove(key);
        Ok(())
    }

    async fn set_expiry(&self, key: &ConversationKey, ttl: Duration) -> Result<(), LogError> {
        let mut conversations = self.conversations.write().await;
        let now = Instant::now();
        if let Some(conversation) = conversations.get_mut(key) {
            if conversation.is_expired(now) {
                let _ = conversations.remove(key);
            } else {
                conversation.expires_at = Some(now + ttl);
            }
        }
        Ok(())
    }
}
