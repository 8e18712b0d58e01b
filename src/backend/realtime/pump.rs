/**
 * Inbound Message Pump and Outbound Writer
 *
 * Each WebSocket is split in two halves, each driven by its own loop:
 *
 * - `run_pump` reads frames from the client, turns each accepted frame into
 *   a `ChatMessage` stamped with the authenticated sender, server time and
 *   the profile captured at admission, and publishes it to the room. The
 *   publisher also announces direct messages on the global feed.
 * - `run_writer` drains the connection's outbound buffer into the socket.
 *
 * # Frame Handling
 *
 * - Text: the raw text is the message body (no JSON envelope)
 * - Binary: accepted when valid UTF-8, skipped otherwise
 * - Empty, whitespace-only or oversized frames: skipped with a warning
 * - Ping/Pong: record liveness only
 * - Close or read error: the pump stops
 *
 * When the pump stops, the connection is unregistered from its room and
 * closed. Closing cancels the connection's shutdown token, which stops the
 * writer and the heartbeat.
 */
use std::sync::Arc;

use axum::extract::ws::Message;
use bytes::Bytes;
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::connection::{ClientConnection, Frame};
use crate::backend::chat::publish::{ChatPublisher, PublishError};
use crate::shared::{ChatMessage, ConversationKey, ProfileSnapshot, RealtimeEvent, SharedError};

/// One admitted connection, as seen by its pump
pub struct Session {
    /// Room the connection is registered in
    pub key: ConversationKey,
    /// Registered connection handle
    pub connection: Arc<ClientConnection>,
    /// Sender profile captured at admission
    pub profile: ProfileSnapshot,
}

/// Result of decoding one inbound frame
#[derive(Debug, PartialEq, Eq)]
pub enum Inbound {
    /// Message body to publish
    Body(String),
    /// Control frame; liveness only
    Control,
    /// Frame dropped
    Skipped(SharedError),
    /// Client closed the socket
    Closed,
}

/// Decode one WebSocket frame.
pub fn decode_frame(message: Message, max_frame_bytes: usize) -> Inbound {
    let text = match message {
        Message::Text(text) => text.as_str().to_string(),
        Message::Binary(data) => match String::from_utf8(data.to_vec()) {
            Ok(text) => text,
            Err(_) => return Inbound::Skipped(SharedError::decode("binary frame is not valid UTF-8")),
        },
        Message::Ping(_) | Message::Pong(_) => return Inbound::Control,
        Message::Close(_) => return Inbound::Closed,
    };

    if text.len() > max_frame_bytes {
        return Inbound::Skipped(SharedError::decode(format!(
            "frame of {} bytes exceeds limit of {} bytes",
            text.len(),
            max_frame_bytes
        )));
    }
    if text.trim().is_empty() {
        return Inbound::Skipped(SharedError::decode("empty frame"));
    }
    Inbound::Body(text)
}

/// Read frames from one client until it disconnects or the connection closes.
pub async fn run_pump<S>(mut stream: S, session: Session, publisher: ChatPublisher, max_frame_bytes: usize)
where
    S: Stream<Item = Result<Message, axum::Error>> + Unpin,
{
    let Session {
        key,
        connection,
        profile,
    } = session;
    let shutdown = connection.shutdown_token();
    tracing::info!(
        "[Realtime] Pump started for {} in {} (connection {})",
        connection.user_id(),
        key,
        connection.id
    );

    loop {
        let next = tokio::select! {
            () = shutdown.cancelled() => break,
            next = stream.next() => next,
        };

        let frame = match next {
            Some(Ok(frame)) => frame,
            Some(Err(e)) => {
                tracing::debug!("[Realtime] Read error on connection {}: {}", connection.id, e);
                break;
            }
            None => break,
        };
        connection.mark_alive();

        let body = match decode_frame(frame, max_frame_bytes) {
            Inbound::Body(body) => body,
            Inbound::Control => continue,
            Inbound::Closed => break,
            Inbound::Skipped(reason) => {
                tracing::warn!("[Realtime] Skipped frame from {} in {}: {}", connection.user_id(), key, reason);
                continue;
            }
        };

        if !key.accepts_chat() {
            tracing::debug!("[Realtime] Ignoring text from {} in {}", connection.user_id(), key);
            continue;
        }

        let mut message = ChatMessage::new(connection.user_id(), &profile, body);
        if let ConversationKey::Direct { low, high } = &key {
            let peer = if low == connection.user_id() { high } else { low };
            message = message.with_receiver(peer.clone());
        }

        if let Err(e) = publisher.publish(&key, &message).await {
            report_error(&publisher, &connection, &e);
        }
    }

    let _ = publisher.distributor().registry().unregister(&key, connection.id);
    let _ = connection.close();
    tracing::info!(
        "[Realtime] Pump stopped for {} in {} (connection {})",
        connection.user_id(),
        key,
        connection.id
    );
}

fn report_error(publisher: &ChatPublisher, connection: &ClientConnection, error: &PublishError) {
    let event = RealtimeEvent::error(error.to_string());
    if let Err(e) = publisher.distributor().deliver_to_connection(connection, &event) {
        tracing::error!("[Realtime] Failed to report error to {}: {}", connection.id, e);
    }
}

/// Drain the outbound buffer into the socket.
///
/// Stops after writing a close frame, on a write error, or when the
/// connection's shutdown token is cancelled and the buffer is empty. A write
/// error cancels the token so the pump stops too.
pub async fn run_writer<S>(mut sink: S, mut rx: mpsc::Receiver<Frame>, shutdown: CancellationToken)
where
    S: Sink<Message> + Unpin,
    S::Error: std::fmt::Display,
{
    loop {
        let frame = tokio::select! {
            biased;
            frame = rx.recv() => frame,
            () = shutdown.cancelled() => None,
        };
        let Some(frame) = frame else {
            break;
        };

        let (message, last) = match frame {
            Frame::Text(payload) => (Message::Text(payload.as_ref().into()), false),
            Frame::Ping => (Message::Ping(Bytes::new()), false),
            Frame::Close => (Message::Close(None), true),
        };

        if let Err(e) = sink.send(message).await {
            tracing::debug!("[Realtime] Write failed: {}", e);
            shutdown.cancel();
            break;
        }
        if last {
            break;
        }
    }
    let _ = sink.close().await;
}
