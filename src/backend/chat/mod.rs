//! Chat Backend Module
//!
//! Conversation history and the publishing path shared by WebSocket frames
//! and HTTP requests.
//!
//! # Architecture
//!
//! - **`log`** - `ConversationLog` trait and the in-memory backend
//! - **`db`** - PostgreSQL conversation log
//! - **`publish`** - append to the log, then deliver to the room
//! - **`handlers`** - HTTP endpoints for history, sends and match events
//!
//! # Example
//!
//! ```rust,no_run
//! use teamup_chat::backend::chat::{ConversationLog, InMemoryConversationLog};
//! use teamup_chat::shared::{ChatMessage, ConversationKey, ProfileSnapshot};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let log = InMemoryConversationLog::new();
//! let room = ConversationKey::match_room("42")?;
//! let message = ChatMessage::new("u1", &ProfileSnapshot::new("striker9", None), "hello");
//! log.append(&room, &message).await?;
//! let recent = log.read_recent(&room, 10).await?;
//! # Ok(())
//! # }
//! ```

/// Conversation log trait and in-memory implementation
pub mod log;

/// PostgreSQL conversation log
pub mod db;

/// Append-and-deliver path
pub mod publish;

/// HTTP handlers
pub mod handlers;

pub use db::PgConversationLog;
pub use log::{ConversationLog, InMemoryConversationLog, LogError};
pub use publish::{ChatPublisher, PublishError};
