use crate::models::device_token::DeviceToken;
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{RepositoryError, RepositoryResult};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Inserts a device token. Registering an active token deactivates the
    /// user's previously active tokens in the same transaction, so at most one
    /// token per user is active at a time.
    async fn create_token(
        &self,
        id: &str,
        user_id: &str,
        token: &str,
        active: bool,
    ) -> RepositoryResult<DeviceToken>;

    /// Most recently created active token for the user, if any.
    async fn find_active_for_user(&self, user_id: &str) -> RepositoryResult<Option<DeviceToken>>;
}

pub struct SqliteTokenRepository {
    pool: SqlitePool,
}

impl SqliteTokenRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<DeviceToken>> {
        let row = sqlx::query(
            "SELECT id, user_id, token, active, created_at FROM device_tokens WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_token))
    }
}

fn row_to_token(row: &SqliteRow) -> DeviceToken {
    DeviceToken {
        id: row.get("id"),
        user_id: row.get("user_id"),
        token: row.get("token"),
        active: row.get("active"),
        created_at: chrono::DateTime::from_timestamp(row.get::<i64, _>("created_at"), 0)
            .map(|dt| dt.naive_utc())
            .unwrap_or_default(),
    }
}

#[async_trait]
impl TokenRepository for SqliteTokenRepository {
    async fn create_token(
        &self,
        id: &str,
        user_id: &str,
        token: &str,
        active: bool,
    ) -> RepositoryResult<DeviceToken> {
        let created_at = chrono::Utc::now().timestamp();
        let mut tx = self.pool.begin().await?;

        if active {
            sqlx::query("UPDATE device_tokens SET active = 0 WHERE user_id = ? AND active = 1")
                .bind(user_id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query(
            "INSERT INTO device_tokens (id, user_id, token, active, created_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(user_id)
        .bind(token)
        .bind(active)
        .bind(created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.find_by_id(id).await?.ok_or(RepositoryError::NotFound)
    }

    async fn find_active_for_user(&self, user_id: &str) -> RepositoryResult<Option<DeviceToken>> {
        // Recency tie-break keeps the result deterministic for rows that
        // predate the single-active-token transaction.
        let row = sqlx::query(
            r#"
            SELECT id, user_id, token, active, created_at
            FROM device_tokens
            WHERE user_id = ? AND active = 1
            ORDER BY created_at DESC, rowid DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.as_ref().map(row_to_token))
    }
}
