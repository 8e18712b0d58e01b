//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - A test application over in-memory backends
//! - Authentication test helpers
//! - HTTP request helpers
//! - PostgreSQL fixtures for tests that run when `DATABASE_URL` is set

#[cfg(feature = "ssr")]
pub mod app;
#[cfg(feature = "ssr")]
pub mod auth_helpers;
#[cfg(feature = "ssr")]
pub mod database;
#[cfg(feature = "ssr")]
pub mod http;

// Re-export commonly used utilities
#[cfg(feature = "ssr")]
pub use app::*;
#[cfg(feature = "ssr")]
pub use auth_helpers::*;
#[cfg(feature = "ssr")]
pub use http::*;
