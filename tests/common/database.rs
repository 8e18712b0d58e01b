//! Database test fixtures
//!
//! Tests that need PostgreSQL run only when `DATABASE_URL` is set; without
//! it `TestDatabase::new` returns `None` and the test returns early.
//! Every test works on fresh random ids, so runs can share one database.

use sqlx::PgPool;
use teamup_chat::shared::ConversationKey;
use uuid::Uuid;

/// Connect to the database named by `DATABASE_URL`, if any.
pub async fn create_test_pool() -> Option<PgPool> {
    let database_url = std::env::var("DATABASE_URL").ok().filter(|url| !url.is_empty())?;
    let pool = PgPool::connect(&database_url)
        .await
        .expect("Failed to create test database pool");
    Some(pool)
}

/// Run the crate's migrations against `pool`.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Migrated database for one test
pub struct TestDatabase {
    pool: PgPool,
}

impl TestDatabase {
    /// Connect and migrate, or `None` when no database is configured.
    pub async fn new() -> Option<Self> {
        let Some(pool) = create_test_pool().await else {
            eprintln!("DATABASE_URL not set; skipping database test");
            return None;
        };
        run_migrations(&pool).await.expect("Failed to run migrations");
        Some(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Remove everything stored under `key`.
    pub async fn clear_conversation(&self, key: &ConversationKey) -> Result<(), sqlx::Error> {
        for table in ["conversation_log", "conversation_expiry"] {
            sqlx::query(&format!("DELETE FROM {table} WHERE conversation_key = $1"))
                .bind(key.storage_key())
                .execute(&self.pool)
                .await?;
        }
        Ok(())
    }
}

/// Random id that no other test run will use
pub fn unique_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}
