pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod services;

// Make test_utils available for both unit tests and integration tests
pub mod test_utils;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<services::user_service::UserService>,
    pub token_service: Arc<services::token_service::TokenService>,
    pub notification_service: Arc<services::notification_service::NotificationService>,
    pub pool: sqlx::SqlitePool,
}

pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index_handler))
        .route("/login", post(handlers::login_handler))
        .route("/tokens", post(handlers::register_token_handler))
        .route("/notifications", post(handlers::create_notification_handler))
        .route(
            "/users/{id}/notifications",
            get(handlers::list_user_notifications_handler),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
