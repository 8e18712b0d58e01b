/**
 * Application State Management
 *
 * This module defines the application state shared by every HTTP and
 * WebSocket handler.
 *
 * # Architecture
 *
 * `AppState` holds:
 * - The server configuration
 * - The connection registry and the distributor writing through it
 * - The global notification feed
 * - The chat publisher (conversation log + room delivery)
 * - The membership guard and profile directory
 *
 * The log, guard and directory are trait objects, so the same handlers run
 * against PostgreSQL in production and in-memory backends in tests.
 */

use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::mpsc;

use crate::backend::auth::users::{InMemoryProfileDirectory, PgProfileDirectory, ProfileDirectory};
use crate::backend::chat::db::PgConversationLog;
use crate::backend::chat::log::{ConversationLog, InMemoryConversationLog};
use crate::backend::chat::publish::ChatPublisher;
use crate::backend::error::BackendError;
use crate::backend::membership::{MembershipGuard, PgMembershipGuard, StaticMembership};
use crate::backend::realtime::broadcast::{Distributor, GlobalFeed};
use crate::backend::realtime::registry::ConnectionRegistry;
use crate::backend::server::config::ServerConfig;
use crate::shared::{ConversationKey, ProfileSnapshot, RealtimeEvent};

/// Storage-facing collaborators of the realtime core
#[derive(Clone)]
pub struct Backends {
    /// Conversation history
    pub conversation_log: Arc<dyn ConversationLog>,
    /// Room membership predicate
    pub membership: Arc<dyn MembershipGuard>,
    /// Profile snapshots for outgoing messages
    pub profiles: Arc<dyn ProfileDirectory>,
}

impl Backends {
    /// PostgreSQL-backed collaborators
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            conversation_log: Arc::new(PgConversationLog::new(pool.clone())),
            membership: Arc::new(PgMembershipGuard::new(pool.clone())),
            profiles: Arc::new(PgProfileDirectory::new(pool)),
        }
    }

    /// In-memory collaborators with no members and no profiles
    pub fn in_memory() -> Self {
        Self {
            conversation_log: Arc::new(InMemoryConversationLog::new()),
            membership: Arc::new(StaticMembership::new()),
            profiles: Arc::new(InMemoryProfileDirectory::new()),
        }
    }
}

/// Application state shared by all handlers
#[derive(Clone)]
pub struct AppState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Live connections grouped by conversation
    pub registry: Arc<ConnectionRegistry>,

    /// Room and global delivery
    pub distributor: Distributor,

    /// Producer side of the global notification queue
    pub global_feed: GlobalFeed,

    /// Append-and-deliver path for chat messages
    pub publisher: ChatPublisher,

    /// Room membership predicate
    pub membership: Arc<dyn MembershipGuard>,

    /// Profile snapshots for outgoing messages
    pub profiles: Arc<dyn ProfileDirectory>,
}

impl AppState {
    /// Build the state and the receiving end of the global feed.
    ///
    /// The receiver must be handed to `run_global_consumer`.
    pub fn new(config: ServerConfig, backends: Backends) -> (Self, mpsc::Receiver<RealtimeEvent>) {
        let registry = Arc::new(ConnectionRegistry::new());
        let distributor = Distributor::new(Arc::clone(&registry));
        let (global_feed, global_rx) = GlobalFeed::channel(config.realtime.global_queue_capacity);
        let publisher = ChatPublisher::new(
            backends.conversation_log,
            distributor.clone(),
            config.realtime.history_ttl,
        )
        .with_global_feed(global_feed.clone());

        let state = Self {
            config: Arc::new(config),
            registry,
            distributor,
            global_feed,
            publisher,
            membership: backends.membership,
            profiles: backends.profiles,
        };
        (state, global_rx)
    }

    /// Conversation log shared with the publisher
    pub fn conversation_log(&self) -> &Arc<dyn ConversationLog> {
        self.publisher.log()
    }

    /// Reject users the membership guard does not admit to `key`.
    pub async fn authorize(&self, key: &ConversationKey, user_id: &str) -> Result<(), BackendError> {
        if self.membership.is_member(key, user_id).await? {
            Ok(())
        } else {
            tracing::warn!("[Membership] {} denied access to {}", user_id, key);
            Err(BackendError::forbidden(format!("not a member of {}", key)))
        }
    }

    /// Profile snapshot of `user_id`, or 404.
    pub async fn sender_profile(&self, user_id: &str) -> Result<ProfileSnapshot, BackendError> {
        self.profiles
            .snapshot(user_id)
            .await?
            .ok_or_else(|| BackendError::not_found(format!("no profile for user {}", user_id)))
    }
}
