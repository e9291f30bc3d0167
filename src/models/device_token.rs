use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceToken {
    pub id: String,
    pub user_id: String,
    pub token: String,
    pub active: bool,
    pub created_at: chrono::NaiveDateTime,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterTokenRequest {
    pub token: String,
    pub user_id: String,
    /// "active" (default) or "inactive".
    pub status: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub id: String,
    pub user_id: String,
    pub token: String,
    pub status: String,
    pub created_at: chrono::NaiveDateTime,
}

impl From<DeviceToken> for TokenResponse {
    fn from(token: DeviceToken) -> Self {
        let status = if token.active { "active" } else { "inactive" };
        Self {
            id: token.id,
            user_id: token.user_id,
            token: token.token,
            status: status.to_string(),
            created_at: token.created_at,
        }
    }
}
