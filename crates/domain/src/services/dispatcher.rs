//! Push dispatch in notify-only and notify-and-collect modes.

use std::sync::Arc;

use crate::error::PushError;
use crate::models::{AckMap, MessageType, PushMessage, PushRequest};
use crate::services::connector::PushConnector;
use crate::services::recipient::ResolvedRecipients;

/// Sender id stamped on admin-initiated pushes.
pub const ADMIN_SENDER: &str = "admin";

/// Builds transport messages and hands them to the connector.
#[derive(Clone)]
pub struct PushDispatcher {
    connector: Arc<dyn PushConnector>,
}

impl PushDispatcher {
    pub fn new(connector: Arc<dyn PushConnector>) -> Self {
        Self { connector }
    }

    /// Generic notification for the server path. The caller's sender, if
    /// any, is forwarded; there is no routing key.
    pub fn notification_message(request: &PushRequest, recipients: Vec<String>) -> PushMessage {
        PushMessage {
            msg_type: MessageType::Notification,
            msg_content: request.message_content.clone(),
            from_id: request.sender.clone(),
            to_id: recipients,
            platform: request.platform.clone(),
            app_key: None,
        }
    }

    /// Delivery notification for the admin path, routed by application name.
    pub fn delivery_message(request: &PushRequest, recipients: Vec<String>) -> PushMessage {
        PushMessage {
            msg_type: MessageType::Delivery,
            msg_content: request.message_content.clone(),
            from_id: Some(ADMIN_SENDER.to_string()),
            to_id: recipients,
            platform: request.platform.clone(),
            app_key: Some(request.app_name.clone()),
        }
    }

    /// Fire-and-forget dispatch.
    ///
    /// Returns whether the message reached the connector. An empty recipient
    /// set skips dispatch; connector failures are logged and swallowed.
    pub async fn send_only(&self, request: &PushRequest, resolved: &ResolvedRecipients) -> bool {
        if resolved.is_empty() {
            tracing::debug!(
                app_name = %resolved.application.app_name,
                "No recipients, skipping notify-only dispatch"
            );
            return false;
        }

        let message = Self::notification_message(request, resolved.to_vec());
        match self.connector.send_only(&message).await {
            Ok(()) => {
                tracing::info!(
                    app_name = %resolved.application.app_name,
                    recipients = message.to_id.len(),
                    platform = %message.platform,
                    "Push notification dispatched"
                );
                true
            }
            Err(e) => {
                tracing::warn!(
                    app_name = %resolved.application.app_name,
                    recipients = message.to_id.len(),
                    error = %e,
                    "Notify-only dispatch failed"
                );
                false
            }
        }
    }

    /// Dispatches and waits for per-recipient acknowledgments.
    ///
    /// Any connector failure is reported as [`PushError::Unavailable`]; an
    /// empty acknowledgment map is a valid reply.
    pub async fn send_and_await(
        &self,
        request: &PushRequest,
        resolved: &ResolvedRecipients,
    ) -> Result<AckMap, PushError> {
        let message = Self::delivery_message(request, resolved.to_vec());

        let acks = self.connector.send_and_await(&message).await.map_err(|e| {
            tracing::error!(
                app_name = %resolved.application.app_name,
                recipients = message.to_id.len(),
                error = %e,
                "Push gateway did not respond"
            );
            PushError::from(e)
        })?;

        tracing::info!(
            app_name = %resolved.application.app_name,
            recipients = message.to_id.len(),
            acknowledged = acks.len(),
            delivered = acks.delivered_count(),
            "Delivery push acknowledged"
        );

        Ok(acks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Application;
    use crate::services::connector::MockPushConnector;
    use chrono::Utc;
    use std::collections::BTreeSet;

    fn request(sender: Option<&str>) -> PushRequest {
        PushRequest {
            app_name: "foo".to_string(),
            message_title: "title".to_string(),
            message_content: "body".to_string(),
            platform: "android".to_string(),
            sender: sender.map(str::to_string),
        }
    }

    fn resolved(ids: &[&str]) -> ResolvedRecipients {
        ResolvedRecipients {
            application: Application {
                id: 1,
                app_name: "foo".to_string(),
                created_at: Utc::now(),
            },
            recipient_ids: ids.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
        }
    }

    #[test]
    fn test_notification_message_shape() {
        let message =
            PushDispatcher::notification_message(&request(Some("svc")), vec!["1".to_string()]);
        assert_eq!(message.msg_type, MessageType::Notification);
        assert_eq!(message.from_id.as_deref(), Some("svc"));
        assert_eq!(message.app_key, None);
        assert_eq!(message.to_id, vec!["1"]);
    }

    #[test]
    fn test_delivery_message_shape() {
        let message = PushDispatcher::delivery_message(&request(Some("svc")), vec![]);
        assert_eq!(message.msg_type, MessageType::Delivery);
        assert_eq!(message.from_id.as_deref(), Some(ADMIN_SENDER));
        assert_eq!(message.app_key.as_deref(), Some("foo"));
        assert_eq!(message.msg_content, "body");
        assert_eq!(message.platform, "android");
    }

    #[tokio::test]
    async fn test_send_only_skips_empty_recipients() {
        let connector = Arc::new(MockPushConnector::new());
        let dispatcher = PushDispatcher::new(connector.clone());
        assert!(!dispatcher.send_only(&request(None), &resolved(&[])).await);
        assert!(connector.sent_messages().await.is_empty());
    }

    #[tokio::test]
    async fn test_send_only_swallows_connector_failure() {
        let connector = Arc::new(MockPushConnector::unavailable());
        let dispatcher = PushDispatcher::new(connector.clone());
        assert!(!dispatcher.send_only(&request(None), &resolved(&["1"])).await);
        assert_eq!(connector.sent_messages().await.len(), 1);
    }

    #[tokio::test]
    async fn test_send_and_await_returns_acks() {
        let connector = Arc::new(MockPushConnector::new());
        let dispatcher = PushDispatcher::new(connector.clone());
        let acks = dispatcher
            .send_and_await(&request(None), &resolved(&["d1", "d2"]))
            .await
            .unwrap();
        assert_eq!(acks.delivered_count(), 2);

        let sent = connector.sent_messages().await;
        assert_eq!(sent[0].to_id, vec!["d1", "d2"]);
        assert_eq!(sent[0].msg_type, MessageType::Delivery);
    }

    #[tokio::test]
    async fn test_send_and_await_maps_unavailable() {
        let dispatcher = PushDispatcher::new(Arc::new(MockPushConnector::unavailable()));
        let err = dispatcher
            .send_and_await(&request(None), &resolved(&["d1"]))
            .await
            .unwrap_err();
        assert!(err.is_unavailable());
    }

    #[tokio::test]
    async fn test_send_and_await_empty_reply_is_not_unavailable() {
        let dispatcher = PushDispatcher::new(Arc::new(MockPushConnector::scripted(AckMap::new())));
        let acks = dispatcher
            .send_and_await(&request(None), &resolved(&["d1"]))
            .await
            .unwrap();
        assert!(acks.is_empty());
    }
}
