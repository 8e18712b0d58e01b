//! Server Module
//!
//! This module contains all server-side code for initializing and configuring
//! the Axum HTTP server.
//!
//! # Architecture
//!
//! The server module is organized into focused submodules:
//!
//! - **`state`** - Application state structure and storage backends
//! - **`config`** - Configuration loading and validation
//! - **`init`** - Server initialization and app creation
//!
//! # Module Structure
//!
//! ```
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState and Backends
//! ├── config.rs       - Environment configuration and database loading
//! └── init.rs         - Server initialization and app creation
//! ```
//!
//! # State Management
//!
//! `AppState` is the central state container. It holds the connection
//! registry, the distributor, the global notification feed, the chat
//! publisher and the membership and profile backends. Everything inside is
//! behind `Arc` so the state is cheap to clone into every handler.
//!
//! # Initialization Flow
//!
//! 1. **Configuration Loading**: `ServerConfig::from_env`
//! 2. **Backends**: PostgreSQL when `DATABASE_URL` is reachable, in-memory otherwise
//! 3. **State Creation**: registry, distributor, global feed, publisher
//! 4. **Background Tasks**: the global feed consumer
//! 5. **Router Creation**: routes, tracing and CORS layers
//!
//! # Example
//!
//! ```rust,no_run
//! use teamup_chat::backend::server::{create_app, ServerConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ServerConfig::from_env()?;
//! let app = create_app(config).await;
//! # Ok(())
//! # }
//! ```

/// Application state management
pub mod state;

/// Server configuration loading
pub mod config;

/// Server initialization
pub mod init;

// Re-export commonly used types
pub use config::{load_database, ServerConfig};
pub use init::{build_app, build_router, create_app};
pub use state::{AppState, Backends};
