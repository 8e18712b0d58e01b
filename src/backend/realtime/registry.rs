//! Connection registry: conversation key → live connections.
//!
//! One mutex guards the whole room map. It is held only to mutate the map
//! or to copy a recipient list out of it; writes to connections happen
//! after the lock is released. Connections whose write reports
//! [`WriteOutcome::Closed`] are evicted afterwards, and only the caller
//! whose removal succeeds closes the handle.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};
use uuid::Uuid;

use super::connection::{ClientConnection, WriteOutcome};
use crate::shared::ConversationKey;

type Room = HashMap<Uuid, Arc<ClientConnection>>;

/// Result of one broadcast.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct BroadcastReport {
    /// Connections that accepted the frame.
    pub delivered: usize,
    /// Connections whose outbound buffer was full.
    pub dropped: usize,
    /// Connections removed because their write failed.
    pub evicted: usize,
}

/// Registry of live connections grouped by conversation key.
#[derive(Default)]
pub struct ConnectionRegistry {
    rooms: Mutex<HashMap<ConversationKey, Room>>,
}

impl ConnectionRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to a room, creating the room if absent.
    pub fn register(&self, key: ConversationKey, connection: Arc<ClientConnection>) {
        let conn_id = connection.id;
        let user_id = connection.user_id().to_string();
        let room_size = {
            let mut rooms = self.rooms.lock();
            let room = rooms.entry(key.clone()).or_default();
            let _ = room.insert(conn_id, connection);
            room.len()
        };
        debug!(room = %key, %conn_id, user_id, room_size, "connection registered");
    }

    /// Remove a connection from a room.
    ///
    /// Returns the removed connection, or `None` if it was not registered.
    /// Empty rooms are dropped from the map.
    pub fn unregister(&self, key: &ConversationKey, conn_id: Uuid) -> Option<Arc<ClientConnection>> {
        let mut rooms = self.rooms.lock();
        let room = rooms.get_mut(key)?;
        let removed = room.remove(&conn_id);
        if room.is_empty() {
            let _ = rooms.remove(key);
        }
        removed
    }

    /// Remove a connection and close it.
    ///
    /// Returns `true` if this call removed (and therefore closed) it.
    pub fn evict(&self, key: &ConversationKey, conn_id: Uuid) -> bool {
        match self.unregister(key, conn_id) {
            Some(connection) => {
                let _ = connection.close();
                debug!(room = %key, %conn_id, "connection evicted");
                true
            }
            None => false,
        }
    }

    /// Write a payload to every connection in one room.
    pub fn broadcast_to_room(&self, key: &ConversationKey, payload: Arc<str>) -> BroadcastReport {
        let recipients: Vec<(ConversationKey, Arc<ClientConnection>)> = {
            let rooms = self.rooms.lock();
            rooms
                .get(key)
                .map(|room| room.values().map(|c| (key.clone(), Arc::clone(c))).collect())
                .unwrap_or_default()
        };
        let report = self.deliver(recipients, &payload);
        debug!(
            room = %key,
            delivered = report.delivered,
            dropped = report.dropped,
            evicted = report.evicted,
            "room broadcast"
        );
        report
    }

    /// Write a payload to every connection in every room.
    pub fn broadcast_to_all(&self, payload: Arc<str>) -> BroadcastReport {
        let recipients: Vec<(ConversationKey, Arc<ClientConnection>)> = {
            let rooms = self.rooms.lock();
            rooms
                .iter()
                .flat_map(|(key, room)| room.values().map(move |c| (key.clone(), Arc::clone(c))))
                .collect()
        };
        let report = self.deliver(recipients, &payload);
        debug!(
            delivered = report.delivered,
            dropped = report.dropped,
            evicted = report.evicted,
            "global broadcast"
        );
        report
    }

    fn deliver(
        &self,
        recipients: Vec<(ConversationKey, Arc<ClientConnection>)>,
        payload: &Arc<str>,
    ) -> BroadcastReport {
        let mut report = BroadcastReport::default();
        let mut failed = Vec::new();

        for (key, connection) in recipients {
            match connection.send(Arc::clone(payload)) {
                WriteOutcome::Delivered => report.delivered += 1,
                WriteOutcome::Dropped => {
                    report.dropped += 1;
                    warn!(
                        room = %key,
                        conn_id = %connection.id,
                        dropped_total = connection.drop_count(),
                        "outbound buffer full, frame dropped"
                    );
                }
                WriteOutcome::Closed => failed.push((key, connection.id)),
            }
        }

        for (key, conn_id) in failed {
            if self.evict(&key, conn_id) {
                report.evicted += 1;
            }
        }
        report
    }

    /// Number of connections in one room.
    pub fn room_size(&self, key: &ConversationKey) -> usize {
        self.rooms.lock().get(key).map_or(0, HashMap::len)
    }

    /// Whether a connection is currently registered in a room.
    pub fn contains(&self, key: &ConversationKey, conn_id: Uuid) -> bool {
        self.rooms
            .lock()
            .get(key)
            .is_some_and(|room| room.contains_key(&conn_id))
    }

    /// Total number of registered connections.
    pub fn connection_count(&self) -> usize {
        self.rooms.lock().values().map(HashMap::len).sum()
    }

    /// Number of rooms with at least one connection.
    pub fn room_count(&self) -> usize {
        self.rooms.lock().len()
    }
}
