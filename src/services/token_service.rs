use crate::models::device_token::{DeviceToken, RegisterTokenRequest};
use crate::models::is_canonical_id;
use crate::repositories::{RepositoryError, TokenRepository, UserRepository};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum TokenServiceError {
    #[error("Device token must not be empty")]
    EmptyToken,
    #[error("Invalid user id")]
    InvalidUserId,
    #[error("Invalid token status: {0}")]
    InvalidStatus(String),
    #[error("User not found")]
    UserNotFound,
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct TokenService {
    tokens: Arc<dyn TokenRepository>,
    users: Arc<dyn UserRepository>,
}

impl TokenService {
    pub fn new(tokens: Arc<dyn TokenRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { tokens, users }
    }

    /// Registers a device token for an existing user. An active registration
    /// supersedes the user's previous active tokens (enforced at the store).
    pub async fn register_token(
        &self,
        request: RegisterTokenRequest,
    ) -> Result<DeviceToken, TokenServiceError> {
        if request.token.is_empty() {
            return Err(TokenServiceError::EmptyToken);
        }
        if !is_canonical_id(&request.user_id) {
            return Err(TokenServiceError::InvalidUserId);
        }

        let active = match request.status.as_deref() {
            None | Some("active") => true,
            Some("inactive") => false,
            Some(other) => return Err(TokenServiceError::InvalidStatus(other.to_string())),
        };

        self.users
            .find_by_id(&request.user_id)
            .await?
            .ok_or(TokenServiceError::UserNotFound)?;

        let id = Uuid::new_v4().to_string();
        Ok(self
            .tokens
            .create_token(&id, &request.user_id, &request.token, active)
            .await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::token_repository::MockTokenRepository;
    use crate::repositories::user_repository::MockUserRepository;

    #[tokio::test]
    async fn rejects_empty_token_before_any_lookup() {
        // No expectations set: any store call would panic.
        let service = TokenService::new(
            Arc::new(MockTokenRepository::new()),
            Arc::new(MockUserRepository::new()),
        );

        let result = service
            .register_token(RegisterTokenRequest {
                token: String::new(),
                user_id: "11111111-1111-1111-1111-111111111111".to_string(),
                status: None,
            })
            .await;

        assert!(matches!(result, Err(TokenServiceError::EmptyToken)));
    }

    #[tokio::test]
    async fn rejects_unknown_status() {
        let service = TokenService::new(
            Arc::new(MockTokenRepository::new()),
            Arc::new(MockUserRepository::new()),
        );

        let result = service
            .register_token(RegisterTokenRequest {
                token: "abc123".to_string(),
                user_id: "11111111-1111-1111-1111-111111111111".to_string(),
                status: Some("paused".to_string()),
            })
            .await;

        assert!(matches!(result, Err(TokenServiceError::InvalidStatus(s)) if s == "paused"));
    }

    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let mut users = MockUserRepository::new();
        users.expect_find_by_id().times(1).returning(|_| Ok(None));

        let service = TokenService::new(Arc::new(MockTokenRepository::new()), Arc::new(users));

        let result = service
            .register_token(RegisterTokenRequest {
                token: "abc123".to_string(),
                user_id: "11111111-1111-1111-1111-111111111111".to_string(),
                status: None,
            })
            .await;

        assert!(matches!(result, Err(TokenServiceError::UserNotFound)));
    }
}
