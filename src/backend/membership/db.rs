//! Database-backed membership checks
//!
//! Reads the match roster (`match_players`) and the friend graph
//! (`friendships`). Friendships may be stored in either direction and only
//! `accepted` rows count.

use async_trait::async_trait;
use sqlx::PgPool;

use super::guard::{MembershipError, MembershipGuard};
use crate::shared::ConversationKey;

/// Membership guard backed by PostgreSQL
#[derive(Debug, Clone)]
pub struct PgMembershipGuard {
    pool: PgPool,
}

impl PgMembershipGuard {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn on_roster(&self, match_id: &str, user_id: &str) -> Result<bool, MembershipError> {
        let found: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM match_players WHERE match_id = $1 AND player_id = $2
            )
            "#,
        )
        .bind(match_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(found)
    }

    async fn are_friends(&self, user_a: &str, user_b: &str) -> Result<bool, MembershipError> {
        let found: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM friendships
                WHERE status = 'accepted'
                  AND ((user_id = $1 AND friend_id = $2) OR (user_id = $2 AND friend_id = $1))
            )
            "#,
        )
        .bind(user_a)
        .bind(user_b)
        .fetch_one(&self.pool)
        .await?;
        Ok(found)
    }
}

#[async_trait]
impl MembershipGuard for PgMembershipGuard {
    async fn is_member(&self, key: &ConversationKey, user_id: &str) -> Result<bool, MembershipError> {
        match key {
            ConversationKey::Match(match_id) => self.on_roster(match_id, user_id).await,
            ConversationKey::Direct { low, high } => {
                if !key.is_direct_participant(user_id) {
                    return Ok(false);
                }
                self.are_friends(low, high).await
            }
            ConversationKey::Lobby => Ok(true),
        }
    }
}
