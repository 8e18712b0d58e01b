//! Authentication test helpers
//!
//! Provides utilities for generating tokens and authorization headers.

use teamup_chat::backend::auth::sessions::create_token;

use super::app::TEST_SECRET;

/// Generate a test JWT token for `user_id`
pub fn token_for(user_id: &str) -> String {
    create_token(TEST_SECRET, user_id, None).expect("Failed to create test token")
}

/// `Authorization` header value for `user_id`
pub fn bearer(user_id: &str) -> String {
    format!("Bearer {}", token_for(user_id))
}
