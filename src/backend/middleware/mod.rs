//! Middleware Module
//!
//! Request processing shared by every protected route.
//!
//! # Architecture
//!
//! - **`auth`** - `AuthUser` extractor resolving the caller from a JWT in the
//!   `Authorization` header or the `token` query parameter

pub mod auth;

pub use auth::{AuthUser, AuthenticatedUser};
