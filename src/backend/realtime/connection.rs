//! Live connection handle.
//!
//! A `ClientConnection` is the registry's view of one WebSocket client.
//! Writes never touch the socket directly: they go into a bounded outbound
//! buffer drained by the connection's writer task, so a broadcast never
//! waits on a slow client.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

/// Frame queued for the writer task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Serialized event.
    Text(Arc<str>),
    /// Heartbeat ping.
    Ping,
    /// Close the socket.
    Close,
}

/// Outcome of a single write attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteOutcome {
    /// Frame queued for the client.
    Delivered,
    /// Outbound buffer full; this frame is lost but the connection stays.
    Dropped,
    /// Connection is gone and must be evicted.
    Closed,
}

/// A connected WebSocket client.
pub struct ClientConnection {
    /// Unique connection ID.
    pub id: Uuid,
    /// Authenticated user behind this connection.
    user_id: String,
    /// Send side of the outbound buffer.
    tx: mpsc::Sender<Frame>,
    /// Whether the client has shown activity since the last heartbeat tick.
    is_alive: AtomicBool,
    /// When the last pong (or any inbound frame) was received.
    last_seen: Mutex<Instant>,
    /// Frames lost to a full outbound buffer.
    dropped_messages: AtomicU64,
    /// Set once by the first successful `close`.
    closed: AtomicBool,
    /// Cancelled on close; stops the pump, writer and heartbeat.
    shutdown: CancellationToken,
}

impl ClientConnection {
    /// Create a connection and the receiving half of its outbound buffer.
    pub fn new(user_id: impl Into<String>, buffer: usize) -> (Arc<Self>, mpsc::Receiver<Frame>) {
        let (tx, rx) = mpsc::channel(buffer.max(1));
        let connection = Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            tx,
            is_alive: AtomicBool::new(true),
            last_seen: Mutex::new(Instant::now()),
            dropped_messages: AtomicU64::new(0),
            closed: AtomicBool::new(false),
            shutdown: CancellationToken::new(),
        };
        (Arc::new(connection), rx)
    }

    /// Authenticated user id.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Queue a serialized event for the client.
    pub fn send(&self, payload: Arc<str>) -> WriteOutcome {
        self.enqueue(Frame::Text(payload))
    }

    /// Queue a heartbeat ping.
    pub fn ping(&self) -> WriteOutcome {
        self.enqueue(Frame::Ping)
    }

    fn enqueue(&self, frame: Frame) -> WriteOutcome {
        if self.is_closed() {
            return WriteOutcome::Closed;
        }
        match self.tx.try_send(frame) {
            Ok(()) => WriteOutcome::Delivered,
            Err(mpsc::error::TrySendError::Full(_)) => {
                let _ = self.dropped_messages.fetch_add(1, Ordering::Relaxed);
                WriteOutcome::Dropped
            }
            Err(mpsc::error::TrySendError::Closed(_)) => WriteOutcome::Closed,
        }
    }

    /// Close the connection.
    ///
    /// Returns `true` only for the call that actually closed it; every
    /// later call is a no-op returning `false`.
    pub fn close(&self) -> bool {
        if self.closed.swap(true, Ordering::AcqRel) {
            return false;
        }
        // Best effort: a full buffer still ends the writer through the token.
        let _ = self.tx.try_send(Frame::Close);
        self.shutdown.cancel();
        true
    }

    /// Whether `close` has been called.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Token cancelled when the connection closes.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Record client activity (pong or any inbound frame).
    pub fn mark_alive(&self) {
        self.is_alive.store(true, Ordering::Relaxed);
        *self.last_seen.lock() = Instant::now();
    }

    /// Check and reset the alive flag for the heartbeat.
    ///
    /// Returns `true` if the client was active since the last check.
    pub fn check_alive(&self) -> bool {
        self.is_alive.swap(false, Ordering::Relaxed)
    }

    /// Time since the last recorded activity.
    pub fn last_seen_elapsed(&self) -> Duration {
        self.last_seen.lock().elapsed()
    }

    /// Total frames dropped for this connection.
    pub fn drop_count(&self) -> u64 {
        self.dropped_messages.load(Ordering::Relaxed)
    }
}

impl std::fmt::Debug for ClientConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConnection")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("closed", &self.is_closed())
            .finish()
    }
}
