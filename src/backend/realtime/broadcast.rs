/**
 * Real-time Event Distribution
 *
 * Two delivery primitives sit on top of the connection registry:
 *
 * - `Distributor::deliver_to_room` writes an event to the connections of a
 *   single conversation. Room chat and structured match events go here.
 * - `Distributor::deliver_globally` writes an event to every connection in
 *   every room. Friend requests and direct-message notifications go here.
 *
 * Global events may also be queued on the `GlobalFeed`, a bounded channel
 * drained by one long-lived consumer task (`run_global_consumer`). The feed
 * refuses room-scoped events, so a chat message can never leak out of its
 * room through it.
 *
 * Events are serialized once per delivery and the same buffer is shared by
 * every recipient.
 */
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc;

use super::connection::{ClientConnection, WriteOutcome};
use super::registry::{BroadcastReport, ConnectionRegistry};
use crate::shared::{ConversationKey, RealtimeEvent};

/// Errors raised while handing an event to the distribution path
#[derive(Debug, Error)]
pub enum DistributionError {
    /// Event could not be serialized
    #[error("failed to serialize event: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Room-scoped event pushed onto the global feed
    #[error("event type '{0}' is room-scoped and cannot be published globally")]
    NotGlobal(String),
    /// Global consumer is gone
    #[error("global feed is closed")]
    FeedClosed,
}

/// Delivery front-end over the connection registry
#[derive(Clone)]
pub struct Distributor {
    registry: Arc<ConnectionRegistry>,
}

impl Distributor {
    pub fn new(registry: Arc<ConnectionRegistry>) -> Self {
        Self { registry }
    }

    /// Registry this distributor writes through
    pub fn registry(&self) -> &Arc<ConnectionRegistry> {
        &self.registry
    }

    /// Deliver an event to the connections of one room.
    pub fn deliver_to_room(
        &self,
        key: &ConversationKey,
        event: &RealtimeEvent,
    ) -> Result<BroadcastReport, DistributionError> {
        let payload = encode(event)?;
        let report = self.registry.broadcast_to_room(key, payload);
        tracing::info!(
            "[Realtime] {} delivered to room {} ({} delivered, {} dropped, {} evicted)",
            event.event_type.as_str(),
            key,
            report.delivered,
            report.dropped,
            report.evicted
        );
        Ok(report)
    }

    /// Deliver an event to every connection in every room.
    pub fn deliver_globally(&self, event: &RealtimeEvent) -> Result<BroadcastReport, DistributionError> {
        let payload = encode(event)?;
        let report = self.registry.broadcast_to_all(payload);
        tracing::info!(
            "[Realtime] {} delivered globally ({} delivered, {} dropped, {} evicted)",
            event.event_type.as_str(),
            report.delivered,
            report.dropped,
            report.evicted
        );
        Ok(report)
    }

    /// Write an event to a single connection, bypassing the registry.
    ///
    /// Used for errors reported back to the sender.
    pub fn deliver_to_connection(
        &self,
        connection: &ClientConnection,
        event: &RealtimeEvent,
    ) -> Result<WriteOutcome, DistributionError> {
        Ok(connection.send(encode(event)?))
    }
}

fn encode(event: &RealtimeEvent) -> Result<Arc<str>, DistributionError> {
    Ok(Arc::from(serde_json::to_string(event)?))
}

/// Producer side of the global notification queue
#[derive(Clone)]
pub struct GlobalFeed {
    tx: mpsc::Sender<RealtimeEvent>,
}

impl GlobalFeed {
    /// Create the feed and the receiver for `run_global_consumer`.
    pub fn channel(capacity: usize) -> (Self, mpsc::Receiver<RealtimeEvent>) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Self { tx }, rx)
    }

    /// Queue a global event.
    ///
    /// Waits for space when the queue is full. Room-scoped events are refused.
    pub async fn publish(&self, event: RealtimeEvent) -> Result<(), DistributionError> {
        if event.room.is_some() || !event.event_type.is_global() {
            return Err(DistributionError::NotGlobal(event.event_type.as_str().to_string()));
        }
        self.tx
            .send(event)
            .await
            .map_err(|_| DistributionError::FeedClosed)
    }
}

/// Drain the global feed, delivering each event to every connection.
///
/// Returns once every `GlobalFeed` handle has been dropped.
pub async fn run_global_consumer(mut rx: mpsc::Receiver<RealtimeEvent>, distributor: Distributor) {
    tracing::info!("[Realtime] Global consumer started");
    while let Some(event) = rx.recv().await {
        if let Err(e) = distributor.deliver_globally(&event) {
            tracing::error!("[Realtime] Failed to deliver global event: {}", e);
        }
    }
    tracing::info!("[Realtime] Global consumer stopped");
}
