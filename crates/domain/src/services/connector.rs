//! Push connector abstraction.
//!
//! A connector hands transport messages to the external push gateway. It
//! supports a notify-only mode and a notify-and-collect mode that waits for
//! per-recipient acknowledgments.

use tokio::sync::Mutex;

use crate::error::ConnectorError;
use crate::models::{AckMap, PushMessage};

/// Trait for push gateway connectors.
#[async_trait::async_trait]
pub trait PushConnector: Send + Sync {
    /// Sends a message without waiting for acknowledgments.
    async fn send_only(&self, message: &PushMessage) -> Result<(), ConnectorError>;

    /// Sends a message and waits for the gateway's acknowledgment map.
    async fn send_and_await(&self, message: &PushMessage) -> Result<AckMap, ConnectorError>;
}

/// How a [`MockPushConnector`] answers notify-and-collect calls.
#[derive(Debug, Clone)]
pub enum AckPolicy {
    /// Every recipient of the message is acknowledged as delivered.
    DeliverAll,
    /// Replies with a fixed acknowledgment map.
    Scripted(AckMap),
    /// Every call fails as if the gateway were down.
    Unavailable,
}

/// Mock connector for development and testing.
///
/// Logs and records every message it is handed but doesn't contact a gateway.
#[derive(Debug)]
pub struct MockPushConnector {
    policy: AckPolicy,
    sent: Mutex<Vec<PushMessage>>,
}

impl Default for MockPushConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl MockPushConnector {
    /// Create a connector that acknowledges every recipient as delivered.
    pub fn new() -> Self {
        Self::with_policy(AckPolicy::DeliverAll)
    }

    /// Create a connector that replies with the given acknowledgments.
    pub fn scripted(acks: AckMap) -> Self {
        Self::with_policy(AckPolicy::Scripted(acks))
    }

    /// Create a connector that simulates an unreachable gateway.
    pub fn unavailable() -> Self {
        Self::with_policy(AckPolicy::Unavailable)
    }

    pub fn with_policy(policy: AckPolicy) -> Self {
        Self {
            policy,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// Messages handed to this connector so far, in call order.
    pub async fn sent_messages(&self) -> Vec<PushMessage> {
        self.sent.lock().await.clone()
    }

    async fn record(&self, message: &PushMessage) {
        self.sent.lock().await.push(message.clone());
    }
}

#[async_trait::async_trait]
impl PushConnector for MockPushConnector {
    async fn send_only(&self, message: &PushMessage) -> Result<(), ConnectorError> {
        self.record(message).await;

        if matches!(self.policy, AckPolicy::Unavailable) {
            tracing::warn!(
                recipients = message.to_id.len(),
                "Mock push connector simulating unavailable gateway"
            );
            return Err(ConnectorError::Unavailable("Simulated failure".to_string()));
        }

        tracing::info!(
            msg_type = ?message.msg_type,
            recipients = message.to_id.len(),
            platform = %message.platform,
            "Mock: Would send push message"
        );
        Ok(())
    }

    async fn send_and_await(&self, message: &PushMessage) -> Result<AckMap, ConnectorError> {
        self.record(message).await;

        match &self.policy {
            AckPolicy::DeliverAll => Ok(message
                .to_id
                .iter()
                .map(|id| (id.as_str(), true))
                .collect()),
            AckPolicy::Scripted(acks) => Ok(acks.clone()),
            AckPolicy::Unavailable => {
                tracing::warn!(
                    recipients = message.to_id.len(),
                    "Mock push connector simulating unavailable gateway"
                );
                Err(ConnectorError::Unavailable("Simulated failure".to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::MessageType;

    fn message(ids: &[&str]) -> PushMessage {
        PushMessage {
            msg_type: MessageType::Delivery,
            msg_content: "hello".to_string(),
            from_id: Some("admin".to_string()),
            to_id: ids.iter().map(|s| s.to_string()).collect(),
            platform: "android".to_string(),
            app_key: Some("foo".to_string()),
        }
    }

    #[tokio::test]
    async fn test_deliver_all_acknowledges_every_recipient() {
        let connector = MockPushConnector::new();
        let acks = connector
            .send_and_await(&message(&["d1", "d2"]))
            .await
            .unwrap();
        assert_eq!(acks.len(), 2);
        assert_eq!(acks.delivered_count(), 2);
        assert_eq!(connector.sent_messages().await.len(), 1);
    }

    #[tokio::test]
    async fn test_scripted_replies_with_given_map() {
        let scripted: AckMap = [("d1", true), ("d2", false)].into_iter().collect();
        let connector = MockPushConnector::scripted(scripted.clone());
        let acks = connector.send_and_await(&message(&["x"])).await.unwrap();
        assert_eq!(acks, scripted);
    }

    #[tokio::test]
    async fn test_unavailable_fails_both_modes() {
        let connector = MockPushConnector::unavailable();
        assert!(connector.send_only(&message(&["d1"])).await.is_err());
        assert!(matches!(
            connector.send_and_await(&message(&["d1"])).await,
            Err(ConnectorError::Unavailable(_))
        ));
        assert_eq!(connector.sent_messages().await.len(), 2);
    }
}
