//! Messaging Module
//!
//! This module handles direct messages between friends and friend request
//! notifications.

pub mod handlers;

pub use handlers::*;
