//! Migration tests

use crate::common::database::TestDatabase;

#[tokio::test]
async fn test_tables_exist_after_migrations() {
    let Some(db) = TestDatabase::new().await else {
        return;
    };

    for table in ["conversation_log", "conversation_expiry", "users", "match_players", "friendships"] {
        let result = sqlx::query(&format!("SELECT 1 FROM {table} LIMIT 1"))
            .execute(db.pool())
            .await;
        assert!(result.is_ok(), "{table} table should exist");
    }
}

#[tokio::test]
async fn test_migrations_are_idempotent() {
    let Some(db) = TestDatabase::new().await else {
        return;
    };
    assert!(crate::common::database::run_migrations(db.pool()).await.is_ok());
}
