/**
 * Chat Publishing
 *
 * One path for every chat message, whether it arrived as a WebSocket frame
 * or an HTTP request: append it to the conversation log, then deliver it to
 * the live connections of the same room. Direct messages are also announced
 * as `direct_message` events on the global feed, so the recipient sees them
 * from any screen.
 *
 * Persistence and live delivery are independent. A failed append is
 * reported to the caller, but the message has already been delivered to the
 * room by then. Once the append succeeded the message counts as stored:
 * retention and global notification failures are logged, not returned.
 */
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use super::log::{ConversationLog, LogError};
use crate::backend::realtime::broadcast::{DistributionError, Distributor, GlobalFeed};
use crate::backend::realtime::registry::BroadcastReport;
use crate::shared::{ChatMessage, ConversationKey, RealtimeEvent};

/// Errors raised while publishing a chat message
#[derive(Debug, Error)]
pub enum PublishError {
    /// Message was delivered live but could not be persisted
    #[error("message delivered but not persisted: {source}")]
    NotPersisted {
        /// Live delivery result
        report: BroadcastReport,
        /// Underlying log failure
        source: LogError,
    },

    /// Message could not be turned into an event
    #[error(transparent)]
    Distribution(#[from] DistributionError),
}

/// Appends chat messages and fans them out to their room
#[derive(Clone)]
pub struct ChatPublisher {
    log: Arc<dyn ConversationLog>,
    distributor: Distributor,
    global_feed: Option<GlobalFeed>,
    history_ttl: Option<Duration>,
}

impl ChatPublisher {
    pub fn new(log: Arc<dyn ConversationLog>, distributor: Distributor, history_ttl: Option<Duration>) -> Self {
        Self {
            log,
            distributor,
            global_feed: None,
            history_ttl,
        }
    }

    /// Announce direct messages on `feed`.
    pub fn with_global_feed(mut self, feed: GlobalFeed) -> Self {
        self.global_feed = Some(feed);
        self
    }

    /// Conversation log messages are appended to
    pub fn log(&self) -> &Arc<dyn ConversationLog> {
        &self.log
    }

    /// Distributor messages are delivered through
    pub fn distributor(&self) -> &Distributor {
        &self.distributor
    }

    /// Append `message` to the log of `key` and deliver it to that room.
    pub async fn publish(
        &self,
        key: &ConversationKey,
        message: &ChatMessage,
    ) -> Result<BroadcastReport, PublishError> {
        let event = RealtimeEvent::chat_message(key.clone(), message).map_err(DistributionError::from)?;

        let persisted = self.persist(key, message).await;
        let report = self.distributor.deliver_to_room(key, &event)?;
        if matches!(key, ConversationKey::Direct { .. }) {
            self.announce_direct(key, message).await;
        }

        match persisted {
            Ok(()) => Ok(report),
            Err(source) => {
                tracing::error!("[Chat] Failed to persist message in {}: {}", key, source);
                Err(PublishError::NotPersisted { report, source })
            }
        }
    }

    async fn persist(&self, key: &ConversationKey, message: &ChatMessage) -> Result<(), LogError> {
        self.log.append(key, message).await?;
        if let Some(ttl) = self.history_ttl {
            if let Err(e) = self.log.set_expiry(key, ttl).await {
                tracing::warn!("[Chat] Stored message in {} but failed to refresh retention: {}", key, e);
            }
        }
        Ok(())
    }

    async fn announce_direct(&self, key: &ConversationKey, message: &ChatMessage) {
        let Some(feed) = &self.global_feed else {
            return;
        };
        let published = match RealtimeEvent::direct_message(message) {
            Ok(event) => feed.publish(event).await,
            Err(e) => Err(DistributionError::from(e)),
        };
        if let Err(e) = published {
            tracing::error!("[Chat] Failed to announce direct message in {}: {}", key, e);
        }
    }
}
