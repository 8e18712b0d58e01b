//! Shared Module
//!
//! Types shared by every part of the realtime core: conversation keys,
//! messages, the events written to live connections, configuration and
//! the shared error type.
//!
//! # Overview
//!
//! Nothing in here touches the network or the database. All types are
//! plain serializable data and can be used from tests without a server.

/// Conversation key (room identity)
pub mod conversation;

/// Chat message and profile snapshot
pub mod message;

/// Real-time event system
pub mod event;

/// Shared error types
pub mod error;

/// Realtime configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use config::{ConfigError, RealtimeConfig, RealtimeConfigBuilder};
pub use conversation::ConversationKey;
pub use error::SharedError;
pub use event::{EventType, RealtimeEvent};
pub use message::{ChatMessage, ProfileSnapshot};
