use crate::error::AppError;
use crate::models::user::{LoginRequest, UserResponse};
use crate::AppState;
use axum::{extract::State, response::Json};

/// POST /login — unified login-or-register.
pub async fn login_handler(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state.user_service.login_or_register(request).await?;
    Ok(Json(UserResponse::from(user)))
}
