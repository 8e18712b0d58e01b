/**
 * Membership Guard
 *
 * Predicate consulted before a connection is admitted to a room and before
 * a message is written to it:
 *
 * - `Match(id)`: the user is on the match roster
 * - `Direct(a, b)`: the user is `a` or `b`, and `a` and `b` are friends
 * - `Lobby`: any authenticated user
 *
 * A `false` answer or an error is an authorization failure for the caller.
 */
use std::collections::HashSet;

use async_trait::async_trait;
use parking_lot::RwLock;
use thiserror::Error;

use crate::shared::ConversationKey;

/// Membership lookup errors
#[derive(Debug, Error)]
pub enum MembershipError {
    /// Roster or friend graph could not be read
    #[error("membership lookup failed: {0}")]
    Lookup(String),
}

impl From<sqlx::Error> for MembershipError {
    fn from(err: sqlx::Error) -> Self {
        Self::Lookup(err.to_string())
    }
}

/// Authorization predicate for conversations
#[async_trait]
pub trait MembershipGuard: Send + Sync {
    /// Whether `user_id` may join and write to `key`.
    async fn is_member(&self, key: &ConversationKey, user_id: &str) -> Result<bool, MembershipError>;
}

/// In-memory membership: explicit rosters and friendships
#[derive(Debug, Default)]
pub struct StaticMembership {
    rosters: RwLock<HashSet<(String, String)>>,
    friendships: RwLock<HashSet<(String, String)>>,
}

impl StaticMembership {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a player on a match roster.
    pub fn add_player(&self, match_id: impl Into<String>, player_id: impl Into<String>) {
        let _ = self.rosters.write().insert((match_id.into(), player_id.into()));
    }

    /// Take a player off a match roster.
    pub fn remove_player(&self, match_id: &str, player_id: &str) {
        let _ = self
            .rosters
            .write()
            .remove(&(match_id.to_string(), player_id.to_string()));
    }

    /// Record an accepted friendship (symmetric).
    pub fn add_friendship(&self, user_a: impl Into<String>, user_b: impl Into<String>) {
        let (low, high) = ordered(user_a.into(), user_b.into());
        let _ = self.friendships.write().insert((low, high));
    }

    fn are_friends(&self, low: &str, high: &str) -> bool {
        self.friendships
            .read()
            .contains(&(low.to_string(), high.to_string()))
    }
}

fn ordered(a: String, b: String) -> (String, String) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[async_trait]
impl MembershipGuard for StaticMembership {
    async fn is_member(&self, key: &ConversationKey, user_id: &str) -> Result<bool, MembershipError> {
        let allowed = match key {
            ConversationKey::Match(match_id) => self
                .rosters
                .read()
                .contains(&(match_id.clone(), user_id.to_string())),
            ConversationKey::Direct { low, high } => {
                key.is_direct_participant(user_id) && self.are_friends(low, high)
            }
            ConversationKey::Lobby => true,
        };
        Ok(allowed)
    }
}
