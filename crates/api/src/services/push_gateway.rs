//! HTTP push gateway connector.
//!
//! Implements the PushConnector trait against the push gateway's HTTP API:
//! `POST {base_url}/push/send` for notify-only messages and
//! `POST {base_url}/push/send-and-get` for messages whose per-recipient
//! acknowledgments are collected.

use std::time::Duration;

use domain::models::{AckMap, PushMessage};
use domain::services::PushConnector;
use domain::ConnectorError;
use reqwest::Client;
use serde::Deserialize;

use crate::config::ConnectorConfig;

const SEND_PATH: &str = "/push/send";
const SEND_AND_GET_PATH: &str = "/push/send-and-get";

/// Gateway reply to a send-and-get call.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GatewayReply {
    #[serde(default)]
    extra_data: Option<AckMap>,
}

/// Error type for building the gateway connector.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("Push connector is not enabled")]
    NotEnabled,
}

/// Push connector talking to the gateway over HTTP.
pub struct HttpPushConnector {
    client: Client,
    base_url: String,
}

impl HttpPushConnector {
    /// Create a connector from configuration.
    ///
    /// # Errors
    /// Returns [`GatewayError::NotEnabled`] when the connector is disabled.
    pub fn new(config: &ConnectorConfig) -> Result<Self, GatewayError> {
        if !config.enabled {
            return Err(GatewayError::NotEnabled);
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post(
        &self,
        path: &str,
        message: &PushMessage,
    ) -> Result<reqwest::Response, ConnectorError> {
        let response = self
            .client
            .post(self.url(path))
            .json(message)
            .send()
            .await
            .map_err(|e| ConnectorError::Unavailable(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ConnectorError::Unavailable(format!(
                "gateway returned {}: {}",
                status, error_text
            )));
        }

        Ok(response)
    }
}

#[async_trait::async_trait]
impl PushConnector for HttpPushConnector {
    async fn send_only(&self, message: &PushMessage) -> Result<(), ConnectorError> {
        self.post(SEND_PATH, message).await?;
        tracing::debug!(
            recipients = message.to_id.len(),
            "Push gateway accepted notify-only message"
        );
        Ok(())
    }

    async fn send_and_await(&self, message: &PushMessage) -> Result<AckMap, ConnectorError> {
        let response = self.post(SEND_AND_GET_PATH, message).await?;

        let reply: GatewayReply = response
            .json()
            .await
            .map_err(|e| ConnectorError::Unavailable(format!("undecodable reply: {}", e)))?;

        reply
            .extra_data
            .ok_or_else(|| ConnectorError::Unavailable("reply carried no acknowledgments".into()))
    }
}

/// Connector used when no gateway is configured.
///
/// Every call fails with [`ConnectorError::Disabled`].
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledPushConnector;

#[async_trait::async_trait]
impl PushConnector for DisabledPushConnector {
    async fn send_only(&self, _message: &PushMessage) -> Result<(), ConnectorError> {
        Err(ConnectorError::Disabled)
    }

    async fn send_and_await(&self, _message: &PushMessage) -> Result<AckMap, ConnectorError> {
        Err(ConnectorError::Disabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{http::StatusCode, routing::post, Json, Router};
    use domain::models::MessageType;
    use serde_json::{json, Value};

    fn message() -> PushMessage {
        PushMessage {
            msg_type: MessageType::Delivery,
            msg_content: "hello".to_string(),
            from_id: Some("admin".to_string()),
            to_id: vec!["d1".to_string(), "d2".to_string()],
            platform: "android".to_string(),
            app_key: Some("foo".to_string()),
        }
    }

    fn config(base_url: String) -> ConnectorConfig {
        ConnectorConfig {
            enabled: true,
            base_url,
            timeout_ms: 2_000,
        }
    }

    async fn spawn_gateway(router: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_disabled_config_is_rejected() {
        let result = HttpPushConnector::new(&ConnectorConfig::default());
        assert!(matches!(result, Err(GatewayError::NotEnabled)));
    }

    #[test]
    fn test_url_strips_trailing_slash() {
        let connector = HttpPushConnector::new(&config("http://gateway/".to_string())).unwrap();
        assert_eq!(connector.url(SEND_PATH), "http://gateway/push/send");
    }

    #[tokio::test]
    async fn test_send_and_await_decodes_acknowledgments() {
        let router = Router::new().route(
            SEND_AND_GET_PATH,
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["msgType"], 2);
                assert_eq!(body["appKey"], "foo");
                Json(json!({ "extraData": [{ "d1": true }, { "d2": false }] }))
            }),
        );
        let connector = HttpPushConnector::new(&config(spawn_gateway(router).await)).unwrap();

        let acks = connector.send_and_await(&message()).await.unwrap();

        assert_eq!(acks.get("d1"), Some(true));
        assert_eq!(acks.get("d2"), Some(false));
        assert_eq!(acks.len(), 2);
    }

    #[tokio::test]
    async fn test_send_and_await_without_extra_data_is_unavailable() {
        let router = Router::new().route(SEND_AND_GET_PATH, post(|| async { Json(json!({})) }));
        let connector = HttpPushConnector::new(&config(spawn_gateway(router).await)).unwrap();

        let result = connector.send_and_await(&message()).await;
        assert!(matches!(result, Err(ConnectorError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_server_error_is_unavailable() {
        let router = Router::new().route(
            SEND_AND_GET_PATH,
            post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        );
        let connector = HttpPushConnector::new(&config(spawn_gateway(router).await)).unwrap();

        let result = connector.send_and_await(&message()).await;
        assert!(matches!(result, Err(ConnectorError::Unavailable(msg)) if msg.contains("500")));
    }

    #[tokio::test]
    async fn test_send_only_accepts_any_success() {
        let router = Router::new().route(SEND_PATH, post(|| async { StatusCode::NO_CONTENT }));
        let connector = HttpPushConnector::new(&config(spawn_gateway(router).await)).unwrap();

        assert!(connector.send_only(&message()).await.is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_gateway_is_unavailable() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);
        let connector = HttpPushConnector::new(&config(format!("http://{}", addr))).unwrap();

        let result = connector.send_and_await(&message()).await;
        assert!(matches!(result, Err(ConnectorError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_disabled_connector_fails_both_modes() {
        let connector = DisabledPushConnector;
        assert_eq!(
            connector.send_only(&message()).await,
            Err(ConnectorError::Disabled)
        );
        assert_eq!(
            connector.send_and_await(&message()).await,
            Err(ConnectorError::Disabled)
        );
    }
}
