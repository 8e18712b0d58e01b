/**
 * Error Conversion
 * 
 * This module provides conversion implementations for backend errors,
 * allowing them to be converted to HTTP responses and other formats.
 * 
 * # HTTP Response Conversion
 * 
 * `BackendError` implements `IntoResponse`, so handlers and WebSocket
 * upgrade handlers can return it directly. A refused upgrade therefore
 * answers with a plain HTTP error before any socket exists.
 * 
 * # Response Format
 * 
 * Error responses are returned as JSON with the following structure:
 * ```json
 * {
 *   "error": "Error message",
 *   "status": 400
 * }
 * ```
 */

use axum::{
    response::{Response, IntoResponse},
    Json,
};
use crate::backend::error::types::BackendError;

impl IntoResponse for BackendError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = self.message();

        if status.is_server_error() {
            tracing::error!("[Server] {} {}", status.as_u16(), message);
        } else {
            tracing::debug!("[Server] {} {}", status.as_u16(), message);
        }

        // Create a JSON error response
        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });
        
        (status, Json(body)).into_response()
    }
}
