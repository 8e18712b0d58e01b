//! Test application
//!
//! Builds the full router over in-memory backends and keeps handles on the
//! roster, the profiles and the state so tests can arrange and inspect.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use teamup_chat::backend::auth::users::InMemoryProfileDirectory;
use teamup_chat::backend::chat::log::InMemoryConversationLog;
use teamup_chat::backend::membership::StaticMembership;
use teamup_chat::backend::routes::create_router;
use teamup_chat::backend::server::{build_router, AppState, Backends, ServerConfig};
use teamup_chat::shared::{ConversationKey, ProfileSnapshot, RealtimeConfig};

/// Signing secret shared by the test app and the token helpers
pub const TEST_SECRET: &str = "test-secret";

/// Running application plus the handles used to arrange a scenario
pub struct TestApp {
    pub state: AppState,
    pub membership: Arc<StaticMembership>,
    pub profiles: Arc<InMemoryProfileDirectory>,
    router: Router,
}

impl TestApp {
    /// Application with default tunables and the heartbeat disabled.
    pub fn new() -> Self {
        let realtime = RealtimeConfig::builder()
            .heartbeat(Duration::ZERO, Duration::ZERO)
            .build()
            .expect("valid realtime config");
        Self::with_realtime(realtime)
    }

    pub fn with_realtime(realtime: RealtimeConfig) -> Self {
        Self::build(realtime, true)
    }

    /// Application whose global feed has no consumer, so every global
    /// publish fails with a closed feed.
    pub fn without_global_consumer() -> Self {
        let realtime = RealtimeConfig::builder()
            .heartbeat(Duration::ZERO, Duration::ZERO)
            .build()
            .expect("valid realtime config");
        Self::build(realtime, false)
    }

    fn build(realtime: RealtimeConfig, consume_global: bool) -> Self {
        let membership = Arc::new(StaticMembership::new());
        let profiles = Arc::new(InMemoryProfileDirectory::new());
        let backends = Backends {
            conversation_log: Arc::new(InMemoryConversationLog::new()),
            membership: membership.clone(),
            profiles: profiles.clone(),
        };

        let mut config = ServerConfig::new(TEST_SECRET);
        config.realtime = realtime;

        let (state, global_rx) = AppState::new(config, backends);
        let router = if consume_global {
            build_router(state.clone(), global_rx)
        } else {
            drop(global_rx);
            create_router(state.clone())
        };
        Self {
            state,
            membership,
            profiles,
            router,
        }
    }

    /// Router sharing this app's state
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Give `user_id` a profile named after it.
    pub fn with_profile(&self, user_id: &str) -> &Self {
        self.profiles
            .insert(user_id, ProfileSnapshot::new(format!("{user_id}-name"), None));
        self
    }

    /// Roster `user_id` on `match_id` and give them a profile.
    pub fn with_player(&self, match_id: &str, user_id: &str) -> &Self {
        self.membership.add_player(match_id, user_id);
        self.with_profile(user_id)
    }

    /// Make two users friends and give both a profile.
    pub fn with_friends(&self, user_a: &str, user_b: &str) -> &Self {
        self.membership.add_friendship(user_a, user_b);
        self.with_profile(user_a).with_profile(user_b)
    }

    /// Serve the router on an ephemeral local port.
    pub async fn spawn(&self) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("local addr");
        let router = self.router();
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("test server");
        });
        addr
    }

    /// Wait until `key` has exactly `n` registered connections.
    pub async fn wait_for_room_size(&self, key: &ConversationKey, n: usize) {
        let registry = self.state.registry.clone();
        tokio::time::timeout(Duration::from_secs(5), async move {
            while registry.room_size(key) != n {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("room {key} never reached {n} connections"));
    }
}
