pub mod notification_handlers;
pub mod token_handlers;
pub mod user_handlers;

pub use notification_handlers::{create_notification_handler, list_user_notifications_handler};
pub use token_handlers::register_token_handler;
pub use user_handlers::login_handler;

/// Health check.
pub async fn index_handler() -> &'static str {
    "OK"
}
