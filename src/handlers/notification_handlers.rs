use crate::error::AppError;
use crate::models::notification::{CreateNotificationRequest, NotificationResponse};
use crate::AppState;
use axum::{
    extract::{Path, State},
    response::Json,
};

/// POST /notifications — dispatch and persist one notification.
pub async fn create_notification_handler(
    State(state): State<AppState>,
    Json(request): Json<CreateNotificationRequest>,
) -> Result<Json<NotificationResponse>, AppError> {
    let service = state.notification_service.clone();

    // Detached task: a client disconnect must not cancel delivery or
    // persistence once the request has been accepted.
    let notification = tokio::spawn(async move { service.create_notification(request).await })
        .await
        .map_err(|_| AppError::InternalError)??;

    Ok(Json(NotificationResponse::from(notification)))
}

/// GET /users/{id}/notifications — all notifications for a user, oldest first.
pub async fn list_user_notifications_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<NotificationResponse>>, AppError> {
    let notifications = state.notification_service.list_notifications(&id).await?;

    Ok(Json(
        notifications
            .into_iter()
            .map(NotificationResponse::from)
            .collect(),
    ))
}
