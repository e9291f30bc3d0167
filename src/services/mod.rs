pub mod notification_service;
pub mod push_gateway;
pub mod token_service;
pub mod user_service;

pub use notification_service::{NotificationService, NotificationServiceError};
pub use push_gateway::{DeliveryReceipt, HttpPushGateway, PushError, PushGateway, PushPayload};
pub use token_service::{TokenService, TokenServiceError};
pub use user_service::{UserService, UserServiceError};
