//! Authentication Module
//!
//! This module resolves who is calling and what they look like to other
//! players. Accounts themselves are owned by the profile service; this
//! server only verifies the tokens it issues and reads profile snapshots.
//!
//! # Architecture
//!
//! - **`sessions`** - JWT token generation and validation
//! - **`users`** - `ProfileDirectory` trait with PostgreSQL and in-memory backends
//!
//! # Module Structure
//!
//! ```
//! auth/
//! ├── mod.rs          - Module exports and documentation
//! ├── sessions.rs     - JWT token management
//! └── users.rs        - Profile snapshot lookups
//! ```
//!
//! # Security
//!
//! - Tokens are HS256 JWTs signed with `JWT_SECRET`
//! - Tokens expire after 30 days
//! - The `sub` claim is the user id every membership check runs against

/// JWT token generation and validation
pub mod sessions;

/// Profile snapshot lookups
pub mod users;

pub use sessions::{create_token, verify_token, Claims};
pub use users::{InMemoryProfileDirectory, PgProfileDirectory, ProfileDirectory, ProfileError};
