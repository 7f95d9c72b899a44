//! Integration tests for the push endpoints.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use common::{
    create_test_app, create_test_app_with_connector, get_json, post_json, push_body, APP_NAME,
    DEVICES, EMPTY_APP_NAME,
};
use domain::models::{
    AckMap, DeliveryState, MessageRecord, MessageType, NewMessageRecord, PushState, ReadState,
};
use domain::services::{InMemoryPushStore, MessageStore, MockPushConnector, StoreResult};
use domain::StoreError;
use push_platform_api::app::{create_app_with, Stores};
use push_platform_api::services::DisabledPushConnector;
use serde_json::json;
use shared::pagination::{Page, PageRequest};

fn scripted_acks() -> AckMap {
    [("d1", true), ("d2", false), ("d3", true)]
        .into_iter()
        .collect()
}

#[tokio::test]
async fn test_admin_push_records_acknowledgments() {
    let app = create_test_app(MockPushConnector::scripted(scripted_acks())).await;

    let (status, body) = post_json(&app.router, "/api/v1/push/admin", push_body(APP_NAME)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["remark"], "push succeeded");
    assert_eq!(body["total_count"], 3);
    assert_eq!(body["success_count"], 2);
    assert_eq!(body["fail_count"], 1);

    let messages = app.store.messages().await;
    assert_eq!(messages.len(), 1);
    let message = &messages[0];
    assert_eq!(body["message_id"], message.id);
    assert_eq!(message.push_state, PushState::Sent);
    assert_eq!(message.message_title, "Maintenance");

    let deliveries = app.store.deliveries().await;
    assert_eq!(deliveries.len(), 3);
    let d2 = deliveries
        .iter()
        .find(|d| d.device_id == "d2")
        .expect("d2 delivery missing");
    assert_eq!(d2.delivery_state, DeliveryState::Failed);
    assert!(deliveries.iter().all(|d| d.message_id == message.id));
    assert!(deliveries.iter().all(|d| d.read_state == ReadState::Unread));
}

#[tokio::test]
async fn test_admin_push_sends_delivery_message_to_devices() {
    let app = create_test_app(MockPushConnector::new()).await;

    let (status, _) = post_json(&app.router, "/api/v1/push/admin", push_body(APP_NAME)).await;
    assert_eq!(status, StatusCode::OK);

    let sent = app.connector.sent_messages().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].msg_type, MessageType::Delivery);
    assert_eq!(sent[0].from_id.as_deref(), Some("admin"));
    assert_eq!(sent[0].app_key.as_deref(), Some(APP_NAME));
    assert_eq!(sent[0].to_id, DEVICES.map(String::from).to_vec());
}

#[tokio::test]
async fn test_admin_push_without_devices() {
    let app = create_test_app(MockPushConnector::new()).await;

    let (status, body) =
        post_json(&app.router, "/api/v1/push/admin", push_body(EMPTY_APP_NAME)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["remark"], "no devices to push to under this application");
    assert_eq!(body["total_count"], 0);
    assert_eq!(body["success_count"], 0);

    let messages = app.store.messages().await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].push_state, PushState::NotSent);
    assert!(app.store.deliveries().await.is_empty());
    assert!(app.connector.sent_messages().await.is_empty());
}

#[tokio::test]
async fn test_admin_push_gateway_unavailable() {
    let app = create_test_app(MockPushConnector::unavailable()).await;

    let (status, body) = post_json(&app.router, "/api/v1/push/admin", push_body(APP_NAME)).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["error"], "service_unavailable");
    assert_eq!(body["message"], "push service not started");
    assert!(app.store.messages().await.is_empty());
    assert!(app.store.deliveries().await.is_empty());
}

#[tokio::test]
async fn test_admin_push_disabled_connector() {
    let app = create_test_app_with_connector(Arc::new(DisabledPushConnector)).await;

    let (status, body) = post_json(&app.router, "/api/v1/push/admin", push_body(APP_NAME)).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["message"], "push service not started");
    assert!(app.store.messages().await.is_empty());
}

#[tokio::test]
async fn test_admin_push_unknown_application() {
    let app = create_test_app(MockPushConnector::new()).await;

    let (status, body) = post_json(&app.router, "/api/v1/push/admin", push_body("nope")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
    assert!(body["message"].as_str().unwrap().contains("nope"));
    assert!(app.store.messages().await.is_empty());
}

#[tokio::test]
async fn test_admin_push_validation() {
    let app = create_test_app(MockPushConnector::new()).await;

    let (status, body) = post_json(
        &app.router,
        "/api/v1/push/admin",
        json!({
            "app_name": APP_NAME,
            "message_content": "",
            "platform": "android"
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert!(app.connector.sent_messages().await.is_empty());
}

#[tokio::test]
async fn test_admin_push_keeps_message_when_batch_fails() {
    let app = create_test_app(MockPushConnector::scripted(scripted_acks())).await;
    app.store.fail_delivery_batches(true).await;

    let (status, body) = post_json(&app.router, "/api/v1/push/admin", push_body(APP_NAME)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "internal_error");

    let messages = app.store.messages().await;
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].success_count, 2);
    assert!(app.store.deliveries().await.is_empty());
}

#[tokio::test]
async fn test_server_push_targets_users() {
    let app = create_test_app(MockPushConnector::new()).await;
    let mut body = push_body(APP_NAME);
    body["sender"] = json!("billing");

    let (status, json) = post_json(&app.router, "/api/v1/push/server", body).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "success": true }));

    let sent = app.connector.sent_messages().await;
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].msg_type, MessageType::Notification);
    assert_eq!(sent[0].to_id, vec!["101".to_string(), "102".to_string()]);
    assert_eq!(sent[0].from_id.as_deref(), Some("billing"));
    assert!(sent[0].app_key.is_none());

    // Server pushes leave no records behind.
    assert!(app.store.messages().await.is_empty());
}

#[tokio::test]
async fn test_server_push_succeeds_when_gateway_down() {
    let app = create_test_app(MockPushConnector::unavailable()).await;

    let (status, json) = post_json(&app.router, "/api/v1/push/server", push_body(APP_NAME)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
}

#[tokio::test]
async fn test_server_push_without_users() {
    let app = create_test_app(MockPushConnector::new()).await;

    let (status, json) =
        post_json(&app.router, "/api/v1/push/server", push_body(EMPTY_APP_NAME)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert!(app.connector.sent_messages().await.is_empty());
}

#[tokio::test]
async fn test_server_push_unknown_application() {
    let app = create_test_app(MockPushConnector::new()).await;

    let (status, _) = post_json(&app.router, "/api/v1/push/server", push_body("nope")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = create_test_app(MockPushConnector::new()).await;

    let (status, body) = get_json(&app.router, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "memory");
    assert!(body.get("database").is_none());
    assert_eq!(body["connector"]["enabled"], false);

    let (status, body) = get_json(&app.router, "/api/health/live").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "alive");

    let (status, body) = get_json(&app.router, "/api/health/ready").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

/// Message store whose every call fails.
struct UnreachableMessageStore;

#[async_trait::async_trait]
impl MessageStore for UnreachableMessageStore {
    async fn create(&self, _record: NewMessageRecord) -> StoreResult<MessageRecord> {
        Err(StoreError::Backend("unreachable".to_string()))
    }

    async fn find_created_between(
        &self,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> StoreResult<Vec<MessageRecord>> {
        Err(StoreError::Backend("unreachable".to_string()))
    }

    async fn find_page(
        &self,
        _search: Option<&str>,
        _page: PageRequest,
    ) -> StoreResult<Page<MessageRecord>> {
        Err(StoreError::Backend("unreachable".to_string()))
    }
}

#[tokio::test]
async fn test_health_does_not_query_message_records() {
    let store = Arc::new(InMemoryPushStore::new());
    let stores = Stores {
        messages: Arc::new(UnreachableMessageStore),
        ..Stores::in_memory(store)
    };
    let router = create_app_with(
        common::test_config(),
        stores,
        Arc::new(MockPushConnector::new()),
    );

    let (status, body) = get_json(&router, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["store"], "memory");

    let (status, _) = get_json(&router, "/api/health/ready").await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = get_json(&router, "/api/v1/push/admin/messages").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}
