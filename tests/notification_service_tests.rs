use async_trait::async_trait;
use pushbox::{
    models::notification::{CreateNotificationRequest, DeliveryStatus},
    repositories::{SqliteNotificationRepository, SqliteTokenRepository},
    services::notification_service::{NotificationService, NotificationServiceError},
    services::push_gateway::{DeliveryReceipt, PushError, PushGateway, PushPayload},
    test_utils::test_helpers,
};
use sqlx::SqlitePool;
use std::sync::{Arc, Mutex};

/// Scriptable gateway that records every call it receives.
struct FakeGateway {
    calls: Mutex<Vec<(String, String)>>,
    fail: bool,
}

impl FakeGateway {
    fn healthy() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl PushGateway for FakeGateway {
    async fn send(
        &self,
        device_token: &str,
        payload: &PushPayload,
    ) -> Result<DeliveryReceipt, PushError> {
        self.calls
            .lock()
            .unwrap()
            .push((device_token.to_string(), payload.alert.clone()));

        if self.fail {
            Err(PushError::Rejected {
                status: 503,
                body: "gateway unavailable".to_string(),
            })
        } else {
            Ok(DeliveryReceipt {
                id: Some("rcpt-1".to_string()),
            })
        }
    }
}

fn build_service(pool: &SqlitePool, gateway: Arc<FakeGateway>) -> NotificationService {
    NotificationService::new(
        Arc::new(SqliteTokenRepository::new(pool.clone())),
        Arc::new(SqliteNotificationRepository::new(pool.clone())),
        gateway,
    )
}

#[tokio::test]
async fn delivers_and_persists_with_active_token() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let user_id = test_helpers::insert_test_user(&pool, "alice@example.com", "password123")
        .await
        .unwrap();
    test_helpers::insert_test_device_token(&pool, &user_id, "abc123", true)
        .await
        .unwrap();

    let gateway = Arc::new(FakeGateway::healthy());
    let service = build_service(&pool, gateway.clone());

    let notification = service
        .create_notification(CreateNotificationRequest {
            message: "Hello".to_string(),
            user_id: user_id.clone(),
        })
        .await
        .unwrap();

    assert_eq!(notification.status, DeliveryStatus::Delivered);
    assert_eq!(notification.receipt_id.as_deref(), Some("rcpt-1"));
    assert_eq!(notification.id.len(), 36);
    assert_eq!(gateway.call_count(), 1);

    let listed = service.list_notifications(&user_id).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, notification.id);
}

#[tokio::test]
async fn missing_active_token_is_an_ordinary_outcome() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let user_id = test_helpers::insert_test_user(&pool, "bob@example.com", "password123")
        .await
        .unwrap();
    // Only an inactive token on record.
    test_helpers::insert_test_device_token(&pool, &user_id, "stale", false)
        .await
        .unwrap();

    let gateway = Arc::new(FakeGateway::healthy());
    let service = build_service(&pool, gateway.clone());

    let notification = service
        .create_notification(CreateNotificationRequest {
            message: "Hello".to_string(),
            user_id: user_id.clone(),
        })
        .await
        .unwrap();

    assert_eq!(notification.status, DeliveryStatus::Skipped);
    assert!(notification.failure_reason.is_some());
    assert_eq!(gateway.call_count(), 0);

    // The record is persisted like any other.
    let listed = service.list_notifications(&user_id).await.unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn gateway_failure_does_not_fail_the_request() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let user_id = test_helpers::insert_test_user(&pool, "carol@example.com", "password123")
        .await
        .unwrap();
    test_helpers::insert_test_device_token(&pool, &user_id, "abc123", true)
        .await
        .unwrap();

    let gateway = Arc::new(FakeGateway::failing());
    let service = build_service(&pool, gateway.clone());

    let notification = service
        .create_notification(CreateNotificationRequest {
            message: "Hello".to_string(),
            user_id: user_id.clone(),
        })
        .await
        .unwrap();

    assert_eq!(notification.status, DeliveryStatus::Failed);
    assert!(notification
        .failure_reason
        .as_deref()
        .unwrap()
        .contains("503"));
    assert_eq!(gateway.call_count(), 1);

    let listed = service.list_notifications(&user_id).await.unwrap();
    assert_eq!(listed.len(), 1);
}

#[tokio::test]
async fn invalid_input_writes_nothing() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let gateway = Arc::new(FakeGateway::healthy());
    let service = build_service(&pool, gateway.clone());

    let empty_message = service
        .create_notification(CreateNotificationRequest {
            message: String::new(),
            user_id: "11111111-1111-1111-1111-111111111111".to_string(),
        })
        .await;
    assert!(matches!(
        empty_message,
        Err(NotificationServiceError::EmptyMessage)
    ));

    let malformed_id = service
        .create_notification(CreateNotificationRequest {
            message: "Hello".to_string(),
            user_id: "42".to_string(),
        })
        .await;
    assert!(matches!(
        malformed_id,
        Err(NotificationServiceError::InvalidUserId)
    ));

    // Simple-form UUIDs are not the canonical 36-char shape.
    let simple_form = service
        .create_notification(CreateNotificationRequest {
            message: "Hello".to_string(),
            user_id: "11111111111111111111111111111111".to_string(),
        })
        .await;
    assert!(matches!(
        simple_form,
        Err(NotificationServiceError::InvalidUserId)
    ));

    assert_eq!(
        test_helpers::count_rows(&pool, "notifications").await.unwrap(),
        0
    );
    assert_eq!(gateway.call_count(), 0);
}

#[tokio::test]
async fn listing_unknown_user_is_empty_not_an_error() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let service = build_service(&pool, Arc::new(FakeGateway::healthy()));

    let listed = service
        .list_notifications("99999999-9999-9999-9999-999999999999")
        .await
        .unwrap();
    assert!(listed.is_empty());
}

#[tokio::test]
async fn listing_is_stable_and_insertion_ordered() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let user_id = test_helpers::insert_test_user(&pool, "dave@example.com", "password123")
        .await
        .unwrap();

    let service = build_service(&pool, Arc::new(FakeGateway::healthy()));

    for message in ["first", "second", "third"] {
        service
            .create_notification(CreateNotificationRequest {
                message: message.to_string(),
                user_id: user_id.clone(),
            })
            .await
            .unwrap();
    }

    let first = service.list_notifications(&user_id).await.unwrap();
    let messages: Vec<_> = first.iter().map(|n| n.message.as_str()).collect();
    assert_eq!(messages, vec!["first", "second", "third"]);

    // Idempotent: no intervening writes, identical sequence.
    let second = service.list_notifications(&user_id).await.unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn hello_world_scenario() {
    let pool = test_helpers::create_test_db().await.unwrap();
    let user_id = "11111111-1111-1111-1111-111111111111";
    test_helpers::insert_test_user_with_id(&pool, user_id, "eve@example.com", "password123")
        .await
        .unwrap();
    test_helpers::insert_test_device_token(&pool, user_id, "abc123", true)
        .await
        .unwrap();

    let gateway = Arc::new(FakeGateway::healthy());
    let service = build_service(&pool, gateway.clone());

    let notification = service
        .create_notification(CreateNotificationRequest {
            message: "Hello World!".to_string(),
            user_id: user_id.to_string(),
        })
        .await
        .unwrap();

    assert_eq!(notification.message, "Hello World!");
    assert_eq!(notification.user_id, user_id);
    assert_eq!(notification.status, DeliveryStatus::Delivered);
    assert!(uuid::Uuid::parse_str(&notification.id).is_ok());

    let calls = gateway.calls.lock().unwrap();
    assert_eq!(calls.as_slice(), &[("abc123".to_string(), "Hello World!".to_string())]);
}
