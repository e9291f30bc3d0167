pub mod notification_repository;
pub mod token_repository;
pub mod user_repository;

pub use notification_repository::{NotificationRepository, SqliteNotificationRepository};
pub use token_repository::{SqliteTokenRepository, TokenRepository};
pub use user_repository::{SqliteUserRepository, UserRepository};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Record not found")]
    NotFound,
    #[error("Record already exists")]
    AlreadyExists,
    #[error("Corrupt row: {0}")]
    Corrupt(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
