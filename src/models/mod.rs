pub mod device_token;
pub mod notification;
pub mod user;

pub use device_token::{DeviceToken, RegisterTokenRequest, TokenResponse};
pub use notification::{
    CreateNotificationRequest, DeliveryStatus, Notification, NotificationResponse,
};
pub use user::{LoginRequest, User, UserResponse};

/// Checks that a caller-supplied id is a 36-character canonical UUID string.
///
/// `Uuid::parse_str` also accepts simple, braced, and URN forms; identifiers
/// minted by this service are always canonical, so anything else is rejected
/// before it reaches a store.
pub fn is_canonical_id(value: &str) -> bool {
    value.len() == 36 && uuid::Uuid::parse_str(value).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_canonical_uuid() {
        assert!(is_canonical_id("11111111-1111-1111-1111-111111111111"));
        assert!(is_canonical_id(&uuid::Uuid::new_v4().to_string()));
    }

    #[test]
    fn rejects_non_canonical_forms() {
        // Simple form parses as a UUID but is not the canonical 36-char shape.
        assert!(!is_canonical_id("11111111111111111111111111111111"));
        assert!(!is_canonical_id("{11111111-1111-1111-1111-111111111111}"));
        assert!(!is_canonical_id("not-a-uuid"));
        assert!(!is_canonical_id(""));
    }
}
