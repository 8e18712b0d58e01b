//! Real-time Delivery Module
//!
//! Live WebSocket connections, grouped by conversation, and the paths that
//! write events to them.
//!
//! # Architecture
//!
//! The realtime module is organized into focused submodules:
//!
//! - **`connection`** - `ClientConnection` handle with a bounded outbound buffer
//! - **`registry`** - `ConnectionRegistry`: conversation key → live connections
//! - **`broadcast`** - `Distributor` (room and global delivery) and the `GlobalFeed`
//! - **`pump`** - inbound read loop and outbound writer of one socket
//! - **`heartbeat`** - ping/pong liveness watchdog
//! - **`subscription`** - WebSocket upgrade handlers
//!
//! # Module Structure
//!
//! ```
//! realtime/
//! ├── mod.rs          - Module exports and documentation
//! ├── connection.rs   - Connection handle and write outcomes
//! ├── registry.rs     - Room registry with inline eviction
//! ├── broadcast.rs    - Distribution engine and global feed
//! ├── pump.rs         - Inbound pump and outbound writer
//! ├── heartbeat.rs    - Liveness watchdog
//! └── subscription.rs - WebSocket upgrade handlers
//! ```
//!
//! # Delivery Scopes
//!
//! Room-scoped events (chat messages, score updates, match status) only
//! reach connections registered under the same conversation key. Global
//! events (friend requests, direct-message notifications) reach every
//! connection. The two scopes never share a queue: the global feed refuses
//! room-scoped events.
//!
//! # Failure Handling
//!
//! A write to a closed connection evicts it from its room; the eviction
//! closes the handle exactly once no matter how many broadcasts observe the
//! failure. A write to a full outbound buffer drops that frame only.

/// Connection handle
pub mod connection;

/// Connection registry
pub mod registry;

/// Distribution engine and global feed
pub mod broadcast;

/// Inbound pump and outbound writer
pub mod pump;

/// Heartbeat watchdog
pub mod heartbeat;

/// WebSocket upgrade handlers
pub mod subscription;

// Re-export commonly used types and functions
pub use broadcast::{run_global_consumer, DistributionError, Distributor, GlobalFeed};
pub use connection::{ClientConnection, Frame, WriteOutcome};
pub use registry::{BroadcastReport, ConnectionRegistry};
pub use subscription::{handle_direct_socket, handle_lobby_socket, handle_match_socket};
