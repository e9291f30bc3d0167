//! Notification dispatch and persistence workflow.
//!
//! One request runs exactly four steps: validate the input before any I/O,
//! resolve the user's active device token, attempt best-effort delivery
//! through the push gateway, and persist the outcome. A missing token and a
//! failed gateway call are ordinary outcomes recorded on the notification;
//! only a failed persistence write fails the request, and nothing on this
//! path may take down the process.

use crate::models::is_canonical_id;
use crate::models::notification::{CreateNotificationRequest, DeliveryStatus, Notification};
use crate::repositories::{NotificationRepository, RepositoryError, TokenRepository};
use crate::services::push_gateway::{PushGateway, PushPayload};
use std::sync::Arc;
use uuid::Uuid;

const NO_ACTIVE_TOKEN_REASON: &str = "no active device token";

#[derive(Debug, thiserror::Error)]
pub enum NotificationServiceError {
    #[error("Message must not be empty")]
    EmptyMessage,
    #[error("Invalid user id")]
    InvalidUserId,
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct NotificationService {
    tokens: Arc<dyn TokenRepository>,
    notifications: Arc<dyn NotificationRepository>,
    gateway: Arc<dyn PushGateway>,
}

impl NotificationService {
    pub fn new(
        tokens: Arc<dyn TokenRepository>,
        notifications: Arc<dyn NotificationRepository>,
        gateway: Arc<dyn PushGateway>,
    ) -> Self {
        Self {
            tokens,
            notifications,
            gateway,
        }
    }

    /// Side effects per run: one token-store read, zero-or-one gateway call,
    /// one notification-store write.
    pub async fn create_notification(
        &self,
        request: CreateNotificationRequest,
    ) -> Result<Notification, NotificationServiceError> {
        if request.message.is_empty() {
            return Err(NotificationServiceError::EmptyMessage);
        }
        if !is_canonical_id(&request.user_id) {
            return Err(NotificationServiceError::InvalidUserId);
        }

        let active_token = self.tokens.find_active_for_user(&request.user_id).await?;

        let (status, failure_reason, receipt_id) = match active_token {
            None => {
                tracing::debug!(user_id = %request.user_id, "no active token, skipping delivery");
                (
                    DeliveryStatus::Skipped,
                    Some(NO_ACTIVE_TOKEN_REASON.to_string()),
                    None,
                )
            }
            Some(token) => {
                let payload = PushPayload::from_message(&request.message);
                match self.gateway.send(&token.token, &payload).await {
                    Ok(receipt) => {
                        tracing::debug!(
                            user_id = %request.user_id,
                            receipt = ?receipt.id,
                            "push accepted by gateway"
                        );
                        (DeliveryStatus::Delivered, None, receipt.id)
                    }
                    Err(err) => {
                        // Delivery is best-effort, never transactional with
                        // persistence: record the failure and keep going.
                        tracing::warn!(user_id = %request.user_id, error = %err, "push delivery failed");
                        (DeliveryStatus::Failed, Some(err.to_string()), None)
                    }
                }
            }
        };

        let notification = Notification {
            id: Uuid::new_v4().to_string(),
            user_id: request.user_id,
            message: request.message,
            status,
            failure_reason,
            receipt_id,
            created_at: chrono::Utc::now().naive_utc(),
        };

        Ok(self.notifications.create(&notification).await?)
    }

    /// Oldest first; an unknown user or a user with no notifications yields an
    /// empty list, never an error.
    pub async fn list_notifications(
        &self,
        user_id: &str,
    ) -> Result<Vec<Notification>, NotificationServiceError> {
        if !is_canonical_id(user_id) {
            return Err(NotificationServiceError::InvalidUserId);
        }

        Ok(self.notifications.list_for_user(user_id).await?)
    }
}
