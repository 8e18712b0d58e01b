/**
 * Authentication Extractor
 *
 * Resolves the caller of an HTTP request or WebSocket upgrade from a JWT.
 * The token is read from the `Authorization: Bearer <token>` header, or from
 * a `token` query parameter for clients that cannot set headers on a
 * WebSocket handshake (browsers).
 */

use axum::{
    extract::{FromRequestParts, Query},
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::Deserialize;

use crate::backend::auth::sessions::verify_token;
use crate::backend::error::BackendError;
use crate::backend::server::state::AppState;

/// Authenticated user data extracted from JWT token
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedUser {
    pub user_id: String,
    pub username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TokenQuery {
    token: Option<String>,
}

/// Token carried by the request, header first
pub fn extract_token(parts: &Parts) -> Option<String> {
    let from_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());

    from_header.or_else(|| {
        Query::<TokenQuery>::try_from_uri(&parts.uri)
            .ok()
            .and_then(|Query(q)| q.token)
            .filter(|t| !t.is_empty())
    })
}

/// Axum extractor for the authenticated user
///
/// Rejects with 401 when the token is missing or invalid.
#[derive(Clone, Debug)]
pub struct AuthUser(pub AuthenticatedUser);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = BackendError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts).ok_or_else(|| {
            tracing::warn!("[Auth] Missing token on {}", parts.uri.path());
            BackendError::unauthorized("missing token")
        })?;

        let claims = verify_token(&state.config.jwt_secret, &token).map_err(|e| {
            tracing::warn!("[Auth] Invalid token: {}", e);
            BackendError::unauthorized("invalid token")
        })?;

        if claims.sub.trim().is_empty() {
            return Err(BackendError::unauthorized("token has no subject"));
        }

        Ok(AuthUser(AuthenticatedUser {
            user_id: claims.sub,
            username: claims.username,
        }))
    }
}
