use crate::error::AppError;
use crate::models::device_token::{RegisterTokenRequest, TokenResponse};
use crate::AppState;
use axum::{extract::State, response::Json};

/// POST /tokens — register a device push-token for a user.
pub async fn register_token_handler(
    State(state): State<AppState>,
    Json(request): Json<RegisterTokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let token = state.token_service.register_token(request).await?;
    Ok(Json(TokenResponse::from(token)))
}
