use crate::models::user::{LoginRequest, User};
use crate::repositories::{RepositoryError, UserRepository};
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, SaltString},
    Argon2, PasswordVerifier,
};
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum UserServiceError {
    #[error("Invalid email address")]
    InvalidEmail,
    #[error("Password too weak (minimum 8 characters)")]
    WeakPassword,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Email already registered")]
    EmailTaken,
    #[error("Password hashing failed: {0}")]
    HashingError(String),
    #[error("Repository error: {0}")]
    RepositoryError(#[from] RepositoryError),
}

pub struct UserService {
    repository: Arc<dyn UserRepository>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepository>) -> Self {
        Self { repository }
    }

    /// Unified login-or-register: an unknown email creates the account, a
    /// known email must present the matching password. Credentials are stored
    /// as argon2 hashes, never plaintext.
    pub async fn login_or_register(&self, request: LoginRequest) -> Result<User, UserServiceError> {
        self.validate_email(&request.email)?;
        self.validate_password(&request.password)?;

        if let Some(user) = self.repository.find_by_email(&request.email).await? {
            if self.verify_password(&request.password, &user.password_hash) {
                return Ok(user);
            }
            return Err(UserServiceError::InvalidCredentials);
        }

        let password_hash = self.hash_password(&request.password)?;
        let id = Uuid::new_v4().to_string();

        match self
            .repository
            .create_user(&id, &request.email, &password_hash)
            .await
        {
            Ok(user) => Ok(user),
            Err(RepositoryError::AlreadyExists) => Err(UserServiceError::EmailTaken),
            Err(e) => Err(UserServiceError::RepositoryError(e)),
        }
    }

    pub async fn find_user_by_id(&self, id: &str) -> Result<Option<User>, UserServiceError> {
        Ok(self.repository.find_by_id(id).await?)
    }

    fn validate_email(&self, email: &str) -> Result<(), UserServiceError> {
        if !email.contains('@') || email.len() > 255 || email.is_empty() {
            return Err(UserServiceError::InvalidEmail);
        }
        Ok(())
    }

    fn validate_password(&self, password: &str) -> Result<(), UserServiceError> {
        if password.len() < 8 {
            return Err(UserServiceError::WeakPassword);
        }
        Ok(())
    }

    fn hash_password(&self, password: &str) -> Result<String, UserServiceError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();
        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| UserServiceError::HashingError(e.to_string()))
    }

    pub fn verify_password(&self, password: &str, password_hash: &str) -> bool {
        if let Ok(parsed_hash) = PasswordHash::new(password_hash) {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed_hash)
                .is_ok()
        } else {
            false
        }
    }
}
