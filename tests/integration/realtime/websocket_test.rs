//! WebSocket integration tests
//!
//! Real clients (tokio-tungstenite) against the server on a local port.

use std::net::SocketAddr;
use std::time::Duration;

use assert_matches::assert_matches;
use futures_util::{SinkExt, StreamExt};
use pretty_assertions::assert_eq;
use serde_json::json;
use teamup_chat::shared::{ConversationKey, EventType, RealtimeEvent};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use crate::common::{post, token_for, TestApp};

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn connect(addr: SocketAddr, path: &str, user_id: &str) -> Client {
    let url = format!("ws://{}{}?token={}", addr, path, token_for(user_id));
    let (client, _) = connect_async(url).await.expect("upgrade accepted");
    client
}

/// Next event on the socket, skipping control frames.
async fn next_event(client: &mut Client) -> RealtimeEvent {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match client.next().await {
                Some(Ok(Message::Text(text))) => {
                    return serde_json::from_str(text.as_str()).expect("event JSON");
                }
                Some(Ok(_)) => continue,
                other => panic!("socket ended: {:?}", other),
            }
        }
    })
    .await
    .expect("event within timeout")
}

/// Assert nothing but control frames arrive for a short while.
async fn assert_silent(client: &mut Client) {
    let result = tokio::time::timeout(Duration::from_millis(300), async {
        loop {
            match client.next().await {
                Some(Ok(Message::Text(text))) => return text.as_str().to_string(),
                Some(Ok(_)) => continue,
                other => panic!("socket ended: {:?}", other),
            }
        }
    })
    .await;
    assert!(result.is_err(), "unexpected frame: {:?}", result);
}

#[tokio::test]
async fn test_room_chat_reaches_room_only() {
    let app = TestApp::new();
    app.with_player("m1", "u1")
        .with_player("m1", "u2")
        .with_player("m2", "u3");
    let addr = app.spawn().await;

    let mut u1 = connect(addr, "/ws/chat/m1", "u1").await;
    let mut u2 = connect(addr, "/ws/chat/m1", "u2").await;
    let mut u3 = connect(addr, "/ws/chat/m2", "u3").await;
    app.wait_for_room_size(&ConversationKey::match_room("m1").unwrap(), 2).await;
    app.wait_for_room_size(&ConversationKey::match_room("m2").unwrap(), 1).await;

    u1.send(Message::text("hello")).await.unwrap();

    for client in [&mut u1, &mut u2] {
        let event = next_event(client).await;
        assert_eq!(event.event_type, EventType::ChatMessage);
        assert_eq!(event.room, Some(ConversationKey::match_room("m1").unwrap()));
        assert_eq!(event.payload["sender_id"], "u1");
        assert_eq!(event.payload["display_name"], "u1-name");
        assert_eq!(event.payload["body"], "hello");
    }
    assert_silent(&mut u3).await;

    let history = app
        .state
        .conversation_log()
        .read_recent(&ConversationKey::match_room("m1").unwrap(), 10)
        .await
        .unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].body, "hello");
}

#[tokio::test]
async fn test_non_member_refused_before_upgrade() {
    let app = TestApp::new();
    app.with_player("m1", "u1").with_profile("u4");
    let addr = app.spawn().await;

    let url = format!("ws://{}/ws/chat/m1?token={}", addr, token_for("u4"));
    assert_matches!(
        connect_async(url).await.map(|_| ()),
        Err(tungstenite::Error::Http(response)) if response.status() == 403
    );
    assert_eq!(app.state.registry.connection_count(), 0);
}

#[tokio::test]
async fn test_missing_token_refused_before_upgrade() {
    let app = TestApp::new();
    let addr = app.spawn().await;

    assert_matches!(
        connect_async(format!("ws://{}/ws", addr)).await.map(|_| ()),
        Err(tungstenite::Error::Http(response)) if response.status() == 401
    );
}

#[tokio::test]
async fn test_blank_and_oversized_frames_are_skipped() {
    let app = TestApp::new();
    app.with_player("m1", "u1");
    let addr = app.spawn().await;

    let mut u1 = connect(addr, "/ws/chat/m1", "u1").await;
    app.wait_for_room_size(&ConversationKey::match_room("m1").unwrap(), 1).await;

    u1.send(Message::text("   ")).await.unwrap();
    u1.send(Message::text("x".repeat(10_000))).await.unwrap();
    u1.send(Message::text("still here")).await.unwrap();

    let event = next_event(&mut u1).await;
    assert_eq!(event.payload["body"], "still here");
}

#[tokio::test]
async fn test_friend_notification_reaches_every_connection() {
    let app = TestApp::new();
    app.with_player("m1", "u1").with_profile("bob");
    let addr = app.spawn().await;

    let mut lobby = connect(addr, "/ws", "bob").await;
    let mut in_match = connect(addr, "/ws/chat/m1", "u1").await;
    app.wait_for_room_size(&ConversationKey::lobby(), 1).await;
    app.wait_for_room_size(&ConversationKey::match_room("m1").unwrap(), 1).await;

    let (status, _) = post(
        app.router(),
        "/api/friends/notify",
        "alice",
        json!({"receiver_id": "bob", "kind": "request"}),
    )
    .await;
    assert_eq!(status, 202);

    for client in [&mut lobby, &mut in_match] {
        let event = next_event(client).await;
        assert_eq!(event.event_type, EventType::FriendRequest);
        assert_eq!(event.room, None);
        assert_eq!(event.payload["sender_id"], "alice");
        assert_eq!(event.payload["receiver_id"], "bob");
    }
}

#[tokio::test]
async fn test_lobby_text_is_ignored() {
    let app = TestApp::new();
    let addr = app.spawn().await;

    let mut lobby = connect(addr, "/ws", "bob").await;
    app.wait_for_room_size(&ConversationKey::lobby(), 1).await;

    lobby.send(Message::text("anyone?")).await.unwrap();
    assert_silent(&mut lobby).await;
}

#[tokio::test]
async fn test_direct_socket_and_global_notification() {
    let app = TestApp::new();
    app.with_friends("alice", "bob");
    let addr = app.spawn().await;
    let pair = ConversationKey::direct("alice", "bob").unwrap();

    let mut alice = connect(addr, "/ws/direct/bob", "alice").await;
    let mut bob = connect(addr, "/ws/direct/alice", "bob").await;
    app.wait_for_room_size(&pair, 2).await;

    alice.send(Message::text("see you at the pitch")).await.unwrap();
    for client in [&mut alice, &mut bob] {
        let event = next_event(client).await;
        assert_eq!(event.event_type, EventType::ChatMessage);
        assert_eq!(event.room, Some(pair.clone()));
        assert_eq!(event.payload["receiver_id"], "bob");
        let notice = next_event(client).await;
        assert_eq!(notice.event_type, EventType::DirectMessage);
        assert_eq!(notice.payload["body"], "see you at the pitch");
    }

    // HTTP sends reach the pair's room and then the global feed.
    let (status, _) = post(
        app.router(),
        "/api/friends/messages",
        "bob",
        json!({"receiver_id": "alice", "content": "on my way"}),
    )
    .await;
    assert_eq!(status, 201);

    let room_event = next_event(&mut alice).await;
    assert_eq!(room_event.event_type, EventType::ChatMessage);
    let global_event = next_event(&mut alice).await;
    assert_eq!(global_event.event_type, EventType::DirectMessage);
    assert_eq!(global_event.payload["body"], "on my way");

    let history = app.state.conversation_log().read_recent(&pair, 10).await.unwrap();
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn test_direct_socket_message_notifies_recipient_elsewhere() {
    let app = TestApp::new();
    app.with_friends("alice", "bob");
    let addr = app.spawn().await;

    let mut alice = connect(addr, "/ws/direct/bob", "alice").await;
    let mut bob = connect(addr, "/ws", "bob").await;
    app.wait_for_room_size(&ConversationKey::direct("alice", "bob").unwrap(), 1).await;
    app.wait_for_room_size(&ConversationKey::lobby(), 1).await;

    alice.send(Message::text("ws dm")).await.unwrap();

    let event = next_event(&mut bob).await;
    assert_eq!(event.event_type, EventType::DirectMessage);
    assert_eq!(event.room, None);
    assert_eq!(event.payload["sender_id"], "alice");
    assert_eq!(event.payload["receiver_id"], "bob");
    assert_eq!(event.payload["body"], "ws dm");
}

#[tokio::test]
async fn test_disconnect_unregisters_connection() {
    let app = TestApp::new();
    app.with_player("m1", "u1");
    let addr = app.spawn().await;
    let room = ConversationKey::match_room("m1").unwrap();

    let mut u1 = connect(addr, "/ws/chat/m1", "u1").await;
    app.wait_for_room_size(&room, 1).await;

    u1.close(None).await.unwrap();
    app.wait_for_room_size(&room, 0).await;
    assert_eq!(app.state.registry.connection_count(), 0);
}
