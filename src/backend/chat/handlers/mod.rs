//! Chat Handlers Module
//!
//! HTTP endpoints for match chat. They share the conversation log and the
//! room delivery path with the WebSocket pump, so a message sent over HTTP
//! is indistinguishable from one sent over a socket.
//!
//! # Module Structure
//!
//! ```
//! handlers/
//! ├── mod.rs      - Module exports and documentation
//! ├── history.rs  - Read and clear match history
//! ├── send.rs     - Send a chat message over HTTP
//! └── events.rs   - Structured match events (score, status)
//! ```
//!
//! # Route Handlers
//!
//! - `GET /api/chat/{match_id}?limit=N` - most recent messages, oldest first
//! - `DELETE /api/chat/{match_id}` - clear the match history
//! - `POST /api/chat/{match_id}/messages` - send a message
//! - `POST /api/matches/{match_id}/events` - push a structured event to the room
//!
//! Every route requires a token and membership of the match.

/// History read and clear
pub mod history;

/// HTTP message send
pub mod send;

/// Structured match events
pub mod events;

pub use events::{handle_match_event, MatchEventRequest};
pub use history::{handle_clear_history, handle_get_history, HistoryQuery};
pub use send::{handle_send_message, SendMessageRequest};
