use crate::models::notification::{DeliveryStatus, Notification};
use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{RepositoryError, RepositoryResult};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: &Notification) -> RepositoryResult<Notification>;

    /// All notifications for a user, oldest first. Insertion order is the
    /// tie-break within a second, so listings are stable across calls.
    async fn list_for_user(&self, user_id: &str) -> RepositoryResult<Vec<Notification>>;
}

pub struct SqliteNotificationRepository {
    pool: SqlitePool,
}

impl SqliteNotificationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<Notification>> {
        let row = sqlx::query(
            r#"
            SELECT id, user_id, message, status, failure_reason, receipt_id, created_at
            FROM notifications
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_notification).transpose()
    }
}

fn row_to_notification(row: &SqliteRow) -> RepositoryResult<Notification> {
    let status: String = row.get("status");
    let status = DeliveryStatus::parse(&status)
        .ok_or_else(|| RepositoryError::Corrupt(format!("unknown delivery status: {status}")))?;

    Ok(Notification {
        id: row.get("id"),
        user_id: row.get("user_id"),
        message: row.get("message"),
        status,
        failure_reason: row.get("failure_reason"),
        receipt_id: row.get("receipt_id"),
        created_at: chrono::DateTime::from_timestamp(row.get::<i64, _>("created_at"), 0)
            .map(|dt| dt.naive_utc())
            .unwrap_or_default(),
    })
}

#[async_trait]
impl NotificationRepository for SqliteNotificationRepository {
    async fn create(&self, notification: &Notification) -> RepositoryResult<Notification> {
        sqlx::query(
            r#"
            INSERT INTO notifications (id, user_id, message, status, failure_reason, receipt_id, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&notification.id)
        .bind(&notification.user_id)
        .bind(&notification.message)
        .bind(notification.status.as_str())
        .bind(&notification.failure_reason)
        .bind(&notification.receipt_id)
        .bind(notification.created_at.and_utc().timestamp())
        .execute(&self.pool)
        .await?;

        self.find_by_id(&notification.id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn list_for_user(&self, user_id: &str) -> RepositoryResult<Vec<Notification>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, message, status, failure_reason, receipt_id, created_at
            FROM notifications
            WHERE user_id = ?
            ORDER BY created_at ASC, rowid ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_notification).collect()
    }
}
