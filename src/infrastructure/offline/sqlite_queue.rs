use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use tracing::debug;

use crate::application::ports::MutationStore;
use crate::domain::entities::{MutationDraft, QueuedMutation};
use crate::domain::value_objects::{HttpMethod, MutationId};
use crate::shared::error::{AppError, Result};

/// Durable mutation queue backed by sqlite. Row ids are monotonically
/// increasing, so `ORDER BY id` is enqueue order.
pub struct SqliteMutationStore {
    pool: SqlitePool,
}

impl SqliteMutationStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn ensure_schema(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS pending_mutations (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                local_id TEXT NOT NULL UNIQUE,
                url TEXT NOT NULL,
                method TEXT NOT NULL,
                headers TEXT NOT NULL,
                body TEXT,
                attempts INTEGER NOT NULL DEFAULT 0,
                enqueued_at INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[derive(sqlx::FromRow)]
struct MutationRow {
    id: i64,
    local_id: String,
    url: String,
    method: String,
    headers: String,
    body: Option<String>,
    attempts: i64,
    enqueued_at: i64,
}

fn to_entity(row: MutationRow) -> Result<QueuedMutation> {
    let headers: Vec<(String, String)> = serde_json::from_str(&row.headers)
        .map_err(|err| AppError::DeserializationError(err.to_string()))?;
    Ok(QueuedMutation {
        id: MutationId::new(row.id),
        local_id: row.local_id,
        url: row.url,
        method: HttpMethod::from(row.method.as_str()),
        headers,
        body: row.body,
        attempts: row.attempts as u32,
        enqueued_at: DateTime::from_timestamp_millis(row.enqueued_at).unwrap_or_else(Utc::now),
    })
}

#[async_trait]
impl MutationStore for SqliteMutationStore {
    async fn enqueue(&self, draft: MutationDraft) -> std::result::Result<QueuedMutation, AppError> {
        let headers = serde_json::to_string(&draft.headers)
            .map_err(|err| AppError::SerializationError(err.to_string()))?;

        let mut tx = self.pool.begin().await?;
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO pending_mutations (local_id, url, method, headers, body, attempts, enqueued_at)
            VALUES (?, ?, ?, ?, ?, 0, ?)
            RETURNING id
            "#,
        )
        .bind(&draft.local_id)
        .bind(&draft.url)
        .bind(draft.method.as_str())
        .bind(&headers)
        .bind(&draft.body)
        .bind(draft.enqueued_at.timestamp_millis())
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;

        debug!(id, url = %draft.url, "mutation appended to queue");
        Ok(QueuedMutation {
            id: MutationId::new(id),
            local_id: draft.local_id,
            url: draft.url,
            method: draft.method,
            headers: draft.headers,
            body: draft.body,
            attempts: 0,
            enqueued_at: draft.enqueued_at,
        })
    }

    async fn pending(&self) -> std::result::Result<Vec<QueuedMutation>, AppError> {
        let rows: Vec<MutationRow> = sqlx::query_as(
            r#"
            SELECT id, local_id, url, method, headers, body, attempts, enqueued_at
            FROM pending_mutations
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(to_entity).collect()
    }

    async fn remove(&self, id: MutationId) -> std::result::Result<(), AppError> {
        sqlx::query("DELETE FROM pending_mutations WHERE id = ?")
            .bind(id.raw())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn record_failure(&self, id: MutationId) -> std::result::Result<u32, AppError> {
        let attempts: Option<i64> = sqlx::query_scalar(
            "UPDATE pending_mutations SET attempts = attempts + 1 WHERE id = ? RETURNING attempts",
        )
        .bind(id.raw())
        .fetch_optional(&self.pool)
        .await?;

        attempts
            .map(|value| value as u32)
            .ok_or_else(|| AppError::NotFound(format!("mutation {}", id)))
    }

    async fn queue_len(&self) -> std::result::Result<u64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pending_mutations")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }
}
