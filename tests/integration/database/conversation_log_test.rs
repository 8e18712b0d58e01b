//! PostgreSQL conversation log tests

use std::time::Duration;

use pretty_assertions::assert_eq;
use teamup_chat::backend::chat::db::PgConversationLog;
use teamup_chat::backend::chat::log::ConversationLog;
use teamup_chat::shared::{ChatMessage, ConversationKey, ProfileSnapshot};

use crate::common::database::{unique_id, TestDatabase};

fn message(body: &str) -> ChatMessage {
    ChatMessage::new("u1", &ProfileSnapshot::new("one", None), body)
}

fn bodies(messages: &[ChatMessage]) -> Vec<&str> {
    messages.iter().map(|m| m.body.as_str()).collect()
}

#[tokio::test]
async fn test_read_recent_returns_newest_oldest_first() {
    let Some(db) = TestDatabase::new().await else {
        return;
    };
    let log = PgConversationLog::new(db.pool().clone());
    let key = ConversationKey::match_room(unique_id("match")).unwrap();

    for body in ["A", "B", "C", "D"] {
        log.append(&key, &message(body)).await.unwrap();
    }

    assert_eq!(bodies(&log.read_recent(&key, 2).await.unwrap()), vec!["C", "D"]);
    assert_eq!(bodies(&log.read_recent(&key, 10).await.unwrap()), vec!["A", "B", "C", "D"]);
    assert!(log.read_recent(&key, 0).await.unwrap().is_empty());

    db.clear_conversation(&key).await.unwrap();
}

#[tokio::test]
async fn test_round_trip_keeps_every_field() {
    let Some(db) = TestDatabase::new().await else {
        return;
    };
    let log = PgConversationLog::new(db.pool().clone());
    let alice = unique_id("alice");
    let bob = unique_id("bob");
    let key = ConversationKey::direct(alice.clone(), bob.clone()).unwrap();
    let sent = ChatMessage::new(
        alice.as_str(),
        &ProfileSnapshot::new("Alice", Some("https://img/a.png".into())),
        "kickoff at 7",
    )
    .with_receiver(bob.as_str());

    log.append(&key, &sent).await.unwrap();

    assert_eq!(log.read_recent(&key, 10).await.unwrap(), vec![sent]);
    db.clear_conversation(&key).await.unwrap();
}

#[tokio::test]
async fn test_conversations_are_isolated() {
    let Some(db) = TestDatabase::new().await else {
        return;
    };
    let log = PgConversationLog::new(db.pool().clone());
    let first = ConversationKey::match_room(unique_id("match")).unwrap();
    let second = ConversationKey::match_room(unique_id("match")).unwrap();

    log.append(&first, &message("only here")).await.unwrap();

    assert_eq!(log.read_recent(&first, 10).await.unwrap().len(), 1);
    assert!(log.read_recent(&second, 10).await.unwrap().is_empty());
    db.clear_conversation(&first).await.unwrap();
}

#[tokio::test]
async fn test_clear_empties_conversation() {
    let Some(db) = TestDatabase::new().await else {
        return;
    };
    let log = PgConversationLog::new(db.pool().clone());
    let key = ConversationKey::match_room(unique_id("match")).unwrap();

    log.append(&key, &message("A")).await.unwrap();
    log.set_expiry(&key, Duration::from_secs(3600)).await.unwrap();
    log.clear(&key).await.unwrap();

    assert!(log.read_recent(&key, 10).await.unwrap().is_empty());
    let expiry_rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM conversation_expiry WHERE conversation_key = $1")
        .bind(key.storage_key())
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(expiry_rows, 0);
}

#[tokio::test]
async fn test_expired_conversation_reads_empty_and_restarts_on_append() {
    let Some(db) = TestDatabase::new().await else {
        return;
    };
    let log = PgConversationLog::new(db.pool().clone());
    let key = ConversationKey::match_room(unique_id("match")).unwrap();

    log.append(&key, &message("old")).await.unwrap();
    log.set_expiry(&key, Duration::ZERO).await.unwrap();
    assert!(log.read_recent(&key, 10).await.unwrap().is_empty());

    log.append(&key, &message("new")).await.unwrap();
    assert_eq!(bodies(&log.read_recent(&key, 10).await.unwrap()), vec!["new"]);

    let stored_rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM conversation_log WHERE conversation_key = $1")
        .bind(key.storage_key())
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert_eq!(stored_rows, 1);
    db.clear_conversation(&key).await.unwrap();
}

#[tokio::test]
async fn test_expiry_needs_an_existing_conversation() {
    let Some(db) = TestDatabase::new().await else {
        return;
    };
    let log = PgConversationLog::new(db.pool().clone());
    let key = ConversationKey::match_room(unique_id("match")).unwrap();

    log.set_expiry(&key, Duration::ZERO).await.unwrap();
    log.append(&key, &message("first")).await.unwrap();

    assert_eq!(bodies(&log.read_recent(&key, 10).await.unwrap()), vec!["first"]);
    db.clear_conversation(&key).await.unwrap();
}
