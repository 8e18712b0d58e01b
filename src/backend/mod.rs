//! Backend Module
//!
//! This module contains all server-side code of the TeamUp chat service: the
//! realtime fan-out of match chat, direct messages and friend notifications
//! over WebSockets, and the conversation history behind it.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! The backend is organized into focused submodules:
//!
//! - **`server`** - Server initialization, application state, configuration
//! - **`routes`** - HTTP route configuration and router assembly
//! - **`realtime`** - Connection registry, room and global delivery, socket pumps
//! - **`chat`** - Conversation log, publishing path and match chat handlers
//! - **`messaging`** - Direct messages and friend notifications
//! - **`membership`** - Who may join which conversation
//! - **`auth`** - JWT tokens and profile snapshots
//! - **`middleware`** - Request authentication
//! - **`error`** - Backend-specific error types
//!
//! # Module Structure
//!
//! ```
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── realtime/       - WebSocket delivery
//! ├── chat/           - Conversation history and match chat
//! ├── messaging/      - Friend messaging
//! ├── membership/     - Membership guard
//! ├── auth/           - Tokens and profiles
//! ├── middleware/     - Request middleware
//! └── error/          - Error types
//! ```
//!
//! # Delivery Model
//!
//! Each WebSocket connection is registered under exactly one conversation
//! key: a match room, a direct pair, or the lobby. Chat messages and match
//! events are delivered to the connections of their own key only. Friend
//! requests and direct-message notifications travel through a bounded global
//! queue and reach every connection.
//!
//! # Thread Safety
//!
//! - `parking_lot` locks guard the registry; no lock is held across a write
//! - Each connection owns a bounded `mpsc` buffer drained by its writer task
//! - The database pool is thread-safe
//!
//! # Error Handling
//!
//! Handlers return `Result<_, BackendError>`; `BackendError` renders as a JSON
//! body with the matching HTTP status code.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Real-time delivery
pub mod realtime;

/// Conversation history and match chat
pub mod chat;

/// Direct messages and friend notifications
pub mod messaging;

/// Conversation membership
pub mod membership;

/// Tokens and profile snapshots
pub mod auth;

/// Middleware for request processing
pub mod middleware;

/// Backend error types
pub mod error;

/// Re-export commonly used types
pub use error::BackendError;
pub use server::{create_app, AppState, Backends, ServerConfig};
