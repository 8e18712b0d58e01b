//! TeamUp Chat - Main Library
//!
//! The realtime messaging service of the TeamUp sports-match platform.
//! Players chat inside the room of a match they are rostered on, friends
//! exchange direct messages, and friend requests are pushed to whoever is
//! online, all over WebSockets backed by a persistent conversation history.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared by the server and its clients
//!   - Conversation keys, chat messages, realtime events
//!   - Realtime tunables and configuration errors
//!   - Error types
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum HTTP and WebSocket server
//!   - Connection registry and room/global delivery
//!   - Conversation log (PostgreSQL or in-memory)
//!   - Membership guard and profile directory
//!
//! # Feature Flags
//!
//! - **`ssr`** (default) - enables the backend modules and the server binary
//!
//! # Usage
//!
//! ```rust,no_run
//! use teamup_chat::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_app(ServerConfig::from_env()?).await;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Wire Format
//!
//! Every frame a client receives is a JSON `RealtimeEvent`:
//!
//! ```json
//! { "type": "chat_message", "room": "chat:42", "payload": { ... }, "timestamp": "..." }
//! ```

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
