/**
 * Profile Directory
 *
 * Looks up the display name and avatar captured into every message a user
 * sends. Profiles are owned by the profile service; this module only reads
 * `users.username` and `users.profile_photo`.
 */
use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use sqlx::{PgPool, Row};
use thiserror::Error;

use crate::shared::ProfileSnapshot;

/// Profile lookup errors
#[derive(Debug, Error)]
pub enum ProfileError {
    /// Profile store could not be read
    #[error("profile lookup failed: {0}")]
    Lookup(String),
}

impl From<sqlx::Error> for ProfileError {
    fn from(err: sqlx::Error) -> Self {
        Self::Lookup(err.to_string())
    }
}

/// Source of profile snapshots
#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    /// Current profile of `user_id`, or `None` if the user has no profile.
    async fn snapshot(&self, user_id: &str) -> Result<Option<ProfileSnapshot>, ProfileError>;
}

/// Profile directory backed by the `users` table
#[derive(Debug, Clone)]
pub struct PgProfileDirectory {
    pool: PgPool,
}

impl PgProfileDirectory {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProfileDirectory for PgProfileDirectory {
    async fn snapshot(&self, user_id: &str) -> Result<Option<ProfileSnapshot>, ProfileError> {
        let row = sqlx::query(
            r#"
            SELECT username, profile_photo
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| ProfileSnapshot::new(r.get::<String, _>("username"), r.get("profile_photo"))))
    }
}

/// In-memory profile directory
#[derive(Debug, Default)]
pub struct InMemoryProfileDirectory {
    profiles: RwLock<HashMap<String, ProfileSnapshot>>,
}

impl InMemoryProfileDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a profile.
    pub fn insert(&self, user_id: impl Into<String>, profile: ProfileSnapshot) {
        let _ = self.profiles.write().insert(user_id.into(), profile);
    }
}

#[async_trait]
impl ProfileDirectory for InMemoryProfileDirectory {
    async fn snapshot(&self, user_id: &str) -> Result<Option<ProfileSnapshot>, ProfileError> {
        Ok(self.profiles.read().get(user_id).cloned())
    }
}
