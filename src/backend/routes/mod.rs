//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//! Routes are organized by functionality into focused submodules.
//!
//! # Architecture
//!
//! - **`router`** - Main router creation, health check and layers
//! - **`chat_routes`** - WebSocket upgrade routes
//! - **`api_routes`** - HTTP API endpoints
//!
//! # Module Structure
//!
//! ```
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router creation
//! ├── chat_routes.rs  - WebSocket routes
//! └── api_routes.rs   - API endpoint routes
//! ```
//!
//! # Layers
//!
//! - `TraceLayer` logs every request through `tracing`
//! - `CorsLayer::permissive()` lets the web and mobile clients call the API

/// Main router creation
pub mod router;

/// WebSocket routes
pub mod chat_routes;

/// API endpoint routes
pub mod api_routes;

// Re-export commonly used functions
pub use router::create_router;
