//! Server and admin push flows.
//!
//! Server push fans a generic notification out to an application's users
//! and returns without waiting. Admin push targets the application's
//! devices, waits for acknowledgments and records the outcome.

use std::sync::Arc;

use crate::error::PushError;
use crate::models::{MessageRecord, PushRequest, RecipientPool};
use crate::services::connector::PushConnector;
use crate::services::dispatcher::PushDispatcher;
use crate::services::reconciler::DeliveryReconciler;
use crate::services::recipient::RecipientResolver;
use crate::services::store::{ApplicationStore, DeliveryStore, MessageStore};

/// Result of a server push.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerPushOutcome {
    pub recipients: usize,
    /// Whether the message reached the connector.
    pub dispatched: bool,
}

/// Result of an admin push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminPushOutcome {
    /// Dispatched and acknowledged; delivery records were written.
    Sent(MessageRecord),
    /// The application has no devices; only a zero-count record was written.
    NoRecipients(MessageRecord),
}

impl AdminPushOutcome {
    pub fn record(&self) -> &MessageRecord {
        match self {
            AdminPushOutcome::Sent(record) | AdminPushOutcome::NoRecipients(record) => record,
        }
    }
}

/// Entry point for push requests.
#[derive(Clone)]
pub struct PushService {
    resolver: RecipientResolver,
    dispatcher: PushDispatcher,
    reconciler: DeliveryReconciler,
}

impl PushService {
    pub fn new(
        applications: Arc<dyn ApplicationStore>,
        messages: Arc<dyn MessageStore>,
        deliveries: Arc<dyn DeliveryStore>,
        connector: Arc<dyn PushConnector>,
    ) -> Self {
        Self {
            resolver: RecipientResolver::new(applications),
            dispatcher: PushDispatcher::new(connector),
            reconciler: DeliveryReconciler::new(messages, deliveries),
        }
    }

    /// Notifies the application's users without waiting for acknowledgments.
    ///
    /// Succeeds whenever the application exists, even if the connector fails.
    pub async fn server_push(&self, request: &PushRequest) -> Result<ServerPushOutcome, PushError> {
        let resolved = self
            .resolver
            .resolve(&request.app_name, RecipientPool::Users)
            .await?;

        let dispatched = self.dispatcher.send_only(request, &resolved).await;

        Ok(ServerPushOutcome {
            recipients: resolved.len(),
            dispatched,
        })
    }

    /// Notifies the application's devices and records per-device outcomes.
    ///
    /// Nothing is persisted when the connector is unavailable.
    pub async fn admin_push(&self, request: &PushRequest) -> Result<AdminPushOutcome, PushError> {
        let resolved = self
            .resolver
            .resolve(&request.app_name, RecipientPool::Devices)
            .await?;

        if resolved.is_empty() {
            let record = self
                .reconciler
                .record_no_recipients(&resolved.application, request)
                .await?;
            return Ok(AdminPushOutcome::NoRecipients(record));
        }

        let acks = self.dispatcher.send_and_await(request, &resolved).await?;

        let record = self
            .reconciler
            .record_delivery(&resolved.application, request, resolved.len(), &acks)
            .await?;

        Ok(AdminPushOutcome::Sent(record))
    }
}
