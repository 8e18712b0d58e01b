/**
 * Backend Error Types
 *
 * Errors raised by HTTP handlers and WebSocket upgrade handlers. Every
 * variant maps to one HTTP status code and can be returned directly from a
 * handler.
 *
 * # Error Categories
 *
 * ## Authorization
 *
 * - `Unauthorized` - missing or invalid token (401)
 * - `Forbidden` - membership guard refused the user (403)
 *
 * ## Lookup
 *
 * - `NotFound` - sender has no profile (404)
 *
 * ## Persistence
 *
 * - `Persistence` - conversation log, membership or profile store failed (500)
 *
 * Transport failures never reach this type: a failed write to a connection
 * only evicts that connection.
 */

use thiserror::Error;
use axum::http::StatusCode;

use crate::backend::auth::users::ProfileError;
use crate::backend::chat::log::LogError;
use crate::backend::membership::MembershipError;
use crate::backend::realtime::broadcast::DistributionError;
use crate::shared::SharedError;

/// Backend-specific error types
#[derive(Debug, Error)]
pub enum BackendError {
    /// Handler error with an explicit status code
    #[error("Handler error: {message}")]
    HandlerError {
        /// HTTP status code for this error
        status: StatusCode,
        /// Human-readable error message
        message: String,
    },

    /// Caller is not authenticated
    #[error("Unauthorized: {message}")]
    Unauthorized {
        /// Human-readable error message
        message: String,
    },

    /// Caller is authenticated but not a member of the conversation
    #[error("Forbidden: {message}")]
    Forbidden {
        /// Human-readable error message
        message: String,
    },

    /// Requested resource does not exist
    #[error("Not found: {message}")]
    NotFound {
        /// Human-readable error message
        message: String,
    },

    /// A backing store failed
    #[error("Persistence error: {message}")]
    Persistence {
        /// Human-readable error message
        message: String,
    },

    /// Shared error (validation, decoding)
    #[error(transparent)]
    SharedError(#[from] SharedError),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

impl BackendError {
    /// Create a new handler error with a status code
    pub fn handler(status: StatusCode, message: impl Into<String>) -> Self {
        Self::HandlerError {
            status,
            message: message.into(),
        }
    }

    /// Create a new unauthorized error
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    /// Create a new forbidden error
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new persistence error
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence {
            message: message.into(),
        }
    }

    /// Get the HTTP status code for this error
    ///
    /// # Status Code Mapping
    ///
    /// - `HandlerError` - Uses the status code from the error
    /// - `Unauthorized` - 401
    /// - `Forbidden` - 403
    /// - `NotFound` - 404
    /// - `Persistence` - 500
    /// - `SharedError` - 400
    /// - `SerializationError` - 500
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::HandlerError { status, .. } => *status,
            Self::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
            Self::Forbidden { .. } => StatusCode::FORBIDDEN,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::SharedError(err) => match err {
                SharedError::ValidationError { .. } | SharedError::DecodeError { .. } => StatusCode::BAD_REQUEST,
            },
            Self::SerializationError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error message
    pub fn message(&self) -> String {
        match self {
            Self::HandlerError { message, .. }
            | Self::Unauthorized { message }
            | Self::Forbidden { message }
            | Self::NotFound { message }
            | Self::Persistence { message } => message.clone(),
            Self::SharedError(err) => err.to_string(),
            Self::SerializationError(err) => err.to_string(),
        }
    }
}

impl From<LogError> for BackendError {
    fn from(err: LogError) -> Self {
        tracing::error!("[Chat] Conversation log failure: {}", err);
        Self::persistence(err.to_string())
    }
}

impl From<MembershipError> for BackendError {
    fn from(err: MembershipError) -> Self {
        tracing::error!("[Membership] Lookup failure: {}", err);
        Self::persistence(err.to_string())
    }
}

impl From<ProfileError> for BackendError {
    fn from(err: ProfileError) -> Self {
        tracing::error!("[Auth] Profile lookup failure: {}", err);
        Self::persistence(err.to_string())
    }
}

impl From<DistributionError> for BackendError {
    fn from(err: DistributionError) -> Self {
        match err {
            DistributionError::Serialization(e) => Self::SerializationError(e),
            DistributionError::NotGlobal(_) => Self::handler(StatusCode::BAD_REQUEST, err.to_string()),
            DistributionError::FeedClosed => {
                Self::handler(StatusCode::SERVICE_UNAVAILABLE, err.to_string())
            }
        }
    }
}
