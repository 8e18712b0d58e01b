//! Chat API integration tests
//!
//! Tests for match history, HTTP sends and structured match events

use axum::http::{Method, StatusCode};
use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{call, get, post, TestApp};

#[tokio::test]
async fn test_send_then_read_history() {
    let app = TestApp::new();
    app.with_player("m1", "u1").with_player("m1", "u2");

    let (status, sent) = post(app.router(), "/api/chat/m1/messages", "u1", json!({"message": "kick-off at 7"})).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(sent["sender_id"], "u1");
    assert_eq!(sent["display_name"], "u1-name");
    assert_eq!(sent["body"], "kick-off at 7");
    assert!(sent.get("receiver_id").is_none());

    let (status, history) = get(app.router(), "/api/chat/m1", "u2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history, json!([sent]));
}

#[tokio::test]
async fn test_history_limit_returns_newest_oldest_first() {
    let app = TestApp::new();
    app.with_player("m1", "u1");
    for body in ["one", "two", "three", "four"] {
        let (status, _) = post(app.router(), "/api/chat/m1/messages", "u1", json!({"message": body})).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, history) = get(app.router(), "/api/chat/m1?limit=2", "u1").await;
    let bodies: Vec<&str> = history
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["body"].as_str().unwrap())
        .collect();
    assert_eq!(bodies, vec!["three", "four"]);

    let (_, history) = get(app.router(), "/api/chat/m1?limit=0", "u1").await;
    assert_eq!(history, json!([]));
}

#[tokio::test]
async fn test_history_of_unknown_match_is_empty_for_member() {
    let app = TestApp::new();
    app.with_player("fresh", "u1");

    let (status, history) = get(app.router(), "/api/chat/fresh", "u1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history, json!([]));
}

#[tokio::test]
async fn test_rooms_do_not_share_history() {
    let app = TestApp::new();
    app.with_player("m1", "u1").with_player("m2", "u1");

    post(app.router(), "/api/chat/m1/messages", "u1", json!({"message": "only in m1"})).await;

    let (_, history) = get(app.router(), "/api/chat/m2", "u1").await;
    assert_eq!(history, json!([]));
}

#[tokio::test]
async fn test_missing_token_is_unauthorized() {
    let app = TestApp::new();
    app.with_player("m1", "u1");

    let (status, body) = call(app.router(), Method::GET, "/api/chat/m1", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], 401);
}

#[tokio::test]
async fn test_non_member_is_forbidden() {
    let app = TestApp::new();
    app.with_player("m1", "u1").with_profile("u4");

    let (status, _) = get(app.router(), "/api/chat/m1", "u4").await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = post(app.router(), "/api/chat/m1/messages", "u4", json!({"message": "let me in"})).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (_, history) = get(app.router(), "/api/chat/m1", "u1").await;
    assert_eq!(history, json!([]));
}

#[tokio::test]
async fn test_member_without_profile_cannot_send() {
    let app = TestApp::new();
    app.membership.add_player("m1", "ghost");

    let (status, _) = post(app.router(), "/api/chat/m1/messages", "ghost", json!({"message": "boo"})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blank_message_is_rejected() {
    let app = TestApp::new();
    app.with_player("m1", "u1");

    let (status, body) = post(app.router(), "/api/chat/m1/messages", "u1", json!({"message": "   "})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
}

#[tokio::test]
async fn test_clear_history() {
    let app = TestApp::new();
    app.with_player("m1", "u1");
    post(app.router(), "/api/chat/m1/messages", "u1", json!({"message": "gg"})).await;

    let (status, body) = call(app.router(), Method::DELETE, "/api/chat/m1", Some("u1"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, serde_json::Value::Null);

    let (_, history) = get(app.router(), "/api/chat/m1", "u1").await;
    assert_eq!(history, json!([]));
}

#[tokio::test]
async fn test_match_event_is_accepted_and_not_stored() {
    let app = TestApp::new();
    app.with_player("m1", "u1");

    let (status, report) = post(
        app.router(),
        "/api/matches/m1/events",
        "u1",
        json!({"type": "score_update", "data": {"home": 2, "away": 1}}),
    )
    .await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(report["delivered"], 0);

    let (_, history) = get(app.router(), "/api/chat/m1", "u1").await;
    assert_eq!(history, json!([]));
}

#[tokio::test]
async fn test_global_event_type_rejected_as_match_event() {
    let app = TestApp::new();
    app.with_player("m1", "u1");

    for event_type in ["friend_request", "direct_message", "chat_message", "error"] {
        let (status, _) = post(
            app.router(),
            "/api/matches/m1/events",
            "u1",
            json!({"type": event_type, "data": {}}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{event_type}");
    }
}
