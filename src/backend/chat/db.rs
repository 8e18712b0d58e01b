/**
 * PostgreSQL Conversation Log
 *
 * Stores each conversation as rows of `conversation_log` keyed by the
 * conversation's storage key (`chat:{match_id}`, `dm:{low}:{high}`). The
 * serial `id` column fixes append order. Retention lives in
 * `conversation_expiry`; an expired conversation reads as empty and is
 * purged by the next append.
 */
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{PgPool, Row};

use super::log::{ConversationLog, LogError};
use crate::shared::{ChatMessage, ConversationKey};

/// Conversation log backed by PostgreSQL
#[derive(Debug, Clone)]
pub struct PgConversationLog {
    pool: PgPool,
}

impl PgConversationLog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationLog for PgConversationLog {
    async fn append(&self, key: &ConversationKey, message: &ChatMessage) -> Result<(), LogError> {
        let storage_key = key.storage_key();
        let payload = serde_json::to_string(message)?;
        let mut tx = self.pool.begin().await?;

        // Expired history is dropped before the conversation starts over.
        let expired = sqlx::query(
            r#"
            DELETE FROM conversation_expiry
            WHERE conversation_key = $1 AND expires_at <= NOW()
            "#,
        )
        .bind(&storage_key)
        .execute(&mut *tx)
        .await?;

        if expired.rows_affected() > 0 {
            sqlx::query("DELETE FROM conversation_log WHERE conversation_key = $1")
                .bind(&storage_key)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query(
            r#"
            INSERT INTO conversation_log (conversation_key, payload, created_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(&storage_key)
        .bind(&payload)
        .bind(Utc::now())
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn read_recent(&self, key: &ConversationKey, limit: usize) -> Result<Vec<ChatMessage>, LogError> {
        if limit == 0 {
            return Ok(Vec::new());
        }
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        let rows = sqlx::query(
            r#"
            SELECT payload FROM (
                SELECT id, payload
                FROM conversation_log
                WHERE conversation_key = $1
                  AND NOT EXISTS (
                      SELECT 1 FROM conversation_expiry
                      WHERE conversation_key = $1 AND expires_at <= NOW()
                  )
                ORDER BY id DESC
                LIMIT $2
            ) recent
            ORDER BY id ASC
            "#,
        )
        .bind(key.storage_key())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                let payload: String = row.get("payload");
                serde_json::from_str(&payload).map_err(LogError::from)
            })
            .collect()
    }

    async fn clear(&self, key: &ConversationKey) -> Result<(), LogError> {
        let storage_key = key.storage_key();
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM conversation_log WHERE conversation_key = $1")
            .bind(&storage_key)
            .execute(&mut *tx)
            .await?;
        sqlx::query("DELETE FROM conversation_expiry WHERE conversation_key = $1")
            .bind(&storage_key)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::info!("[Chat] Cleared conversation log {}", storage_key);
        Ok(())
    }

    async fn set_expiry(&self, key: &ConversationKey, ttl: Duration) -> Result<(), LogError> {
        let ttl = chrono::Duration::from_std(ttl)
            .map_err(|e| LogError::Storage(format!("retention out of range: {}", e)))?;
        let expires_at = Utc::now()
            .checked_add_signed(ttl)
            .ok_or_else(|| LogError::Storage("retention out of range".into()))?;

        sqlx::query(
            r#"
            INSERT INTO conversation_expiry (conversation_key, expires_at)
            SELECT $1, $2
            WHERE EXISTS (SELECT 1 FROM conversation_log WHERE conversation_key = $1)
            ON CONFLICT (conversation_key) DO UPDATE SET expires_at = EXCLUDED.expires_at
            "#,
        )
        .bind(key.storage_key())
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
