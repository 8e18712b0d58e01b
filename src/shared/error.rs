//! Shared Error Types
//!
//! Errors raised by the shared data types: building conversation keys and
//! decoding inbound frames.
//!
//! # Error Categories
//!
//! - `ValidationError` - Invalid identifiers or request fields
//! - `DecodeError` - Inbound frame that cannot be turned into a message
//!
//! # Usage
//!
//! ```rust,ignore
//! use teamup_chat::shared::error::SharedError;
//!
//! let error = SharedError::validation("match_id", "match_id cannot be empty");
//! ```
use thiserror::Error;

/// Errors raised by the shared types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SharedError {
    /// Data validation error
    #[error("Validation error in field '{field}': {message}")]
    ValidationError {
        /// The field that failed validation
        field: String,
        /// Human-readable error message
        message: String,
    },

    /// Inbound frame could not be decoded into a message
    #[error("Decode error: {message}")]
    DecodeError {
        /// Human-readable error message
        message: String,
    },
}

impl SharedError {
    /// Create a new validation error
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a new decode error
    pub fn decode(message: impl Into<String>) -> Self {
        Self::DecodeError {
            message: message.into(),
        }
    }
}
