use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::repositories::RepositoryError;
use crate::services::{NotificationServiceError, TokenServiceError, UserServiceError};

// Type alias for Result with our AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Request-scoped error for the HTTP boundary. Every variant maps to a status
/// code and a JSON body; none terminates the serving process.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("User not found")]
    UserNotFound,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Internal server error")]
    InternalError,

    #[error("Validation error: {0}")]
    Validation(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "Authentication failed".to_string(),
            ),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "User not found".to_string()),
            AppError::EmailTaken => (StatusCode::CONFLICT, "Email already registered".to_string()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Database(_) | AppError::InternalError => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            ),
        };

        let body = json!({ "error": error_message });

        (status, Json(body)).into_response()
    }
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Database(e) => AppError::Database(e),
            RepositoryError::NotFound => AppError::UserNotFound,
            RepositoryError::AlreadyExists => AppError::EmailTaken,
            RepositoryError::Corrupt(_) => AppError::InternalError,
        }
    }
}

impl From<UserServiceError> for AppError {
    fn from(err: UserServiceError) -> Self {
        match err {
            UserServiceError::InvalidEmail | UserServiceError::WeakPassword => {
                AppError::Validation(err.to_string())
            }
            UserServiceError::InvalidCredentials => AppError::InvalidCredentials,
            UserServiceError::EmailTaken => AppError::EmailTaken,
            UserServiceError::HashingError(_) => AppError::InternalError,
            UserServiceError::RepositoryError(e) => e.into(),
        }
    }
}

impl From<TokenServiceError> for AppError {
    fn from(err: TokenServiceError) -> Self {
        match err {
            TokenServiceError::EmptyToken
            | TokenServiceError::InvalidUserId
            | TokenServiceError::InvalidStatus(_) => AppError::Validation(err.to_string()),
            TokenServiceError::UserNotFound => AppError::UserNotFound,
            TokenServiceError::RepositoryError(e) => e.into(),
        }
    }
}

impl From<NotificationServiceError> for AppError {
    fn from(err: NotificationServiceError) -> Self {
        match err {
            NotificationServiceError::EmptyMessage | NotificationServiceError::InvalidUserId => {
                AppError::Validation(err.to_string())
            }
            NotificationServiceError::RepositoryError(e) => e.into(),
        }
    }
}
