//! Reconciliation of gateway acknowledgments into message and delivery records.

use std::sync::Arc;

use chrono::Utc;

use crate::error::PushError;
use crate::models::{
    AckMap, Application, DeliveryState, MessageRecord, NewDeliveryRecord, NewMessageRecord,
    PushRequest, PushState, ReadState,
};
use crate::services::store::{DeliveryStore, MessageStore};

/// Remark stored on a record whose push was dispatched and acknowledged.
pub const PUSH_SUCCEEDED_REMARK: &str = "push succeeded";

/// Remark stored when the application has no registered devices.
pub const NO_DEVICES_REMARK: &str = "no devices to push to under this application";

/// A delivery outcome waiting for its message id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelivery {
    pub device_id: String,
    pub delivery_state: DeliveryState,
}

impl PendingDelivery {
    /// Binds the outcome to the persisted message it belongs to.
    pub fn into_new_record(self, message: &MessageRecord) -> NewDeliveryRecord {
        NewDeliveryRecord {
            message_id: message.id,
            device_id: self.device_id,
            app_id: message.app_id,
            app_name: message.app_name.clone(),
            delivery_state: self.delivery_state,
            read_state: ReadState::Unread,
            created_at: message.created_at,
        }
    }
}

/// Records derived from one acknowledged push, before persistence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciliation {
    pub message: NewMessageRecord,
    /// In acknowledgment order.
    pub deliveries: Vec<PendingDelivery>,
}

fn count(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}

/// Derives the aggregate record and per-device outcomes from an ack map.
///
/// The total is the resolved recipient count; it is not checked against
/// the number of acknowledgments.
pub fn reconcile(
    application: &Application,
    request: &PushRequest,
    recipient_count: usize,
    acks: &AckMap,
) -> Reconciliation {
    let message = NewMessageRecord {
        app_id: application.id,
        app_name: application.app_name.clone(),
        message_title: request.message_title.clone(),
        message_content: request.message_content.clone(),
        total_count: count(recipient_count),
        success_count: count(acks.delivered_count()),
        fail_count: count(acks.failed_count()),
        platform: request.platform.clone(),
        push_state: PushState::Sent,
        remark: PUSH_SUCCEEDED_REMARK.to_string(),
        created_at: Utc::now(),
    };

    let deliveries = acks
        .iter()
        .map(|ack| PendingDelivery {
            device_id: ack.recipient_id.clone(),
            delivery_state: DeliveryState::from_ack(ack.delivered),
        })
        .collect();

    Reconciliation {
        message,
        deliveries,
    }
}

/// The zero-count record written when an application has no devices.
pub fn no_recipient_record(application: &Application, request: &PushRequest) -> NewMessageRecord {
    NewMessageRecord {
        app_id: application.id,
        app_name: application.app_name.clone(),
        message_title: request.message_title.clone(),
        message_content: request.message_content.clone(),
        total_count: 0,
        success_count: 0,
        fail_count: 0,
        platform: request.platform.clone(),
        push_state: PushState::NotSent,
        remark: NO_DEVICES_REMARK.to_string(),
        created_at: Utc::now(),
    }
}

/// Persists reconciled records.
///
/// The message record is written first and the delivery batch second. The
/// two writes are not transactional: if the batch fails, the message record
/// stays.
#[derive(Clone)]
pub struct DeliveryReconciler {
    messages: Arc<dyn MessageStore>,
    deliveries: Arc<dyn DeliveryStore>,
}

impl DeliveryReconciler {
    pub fn new(messages: Arc<dyn MessageStore>, deliveries: Arc<dyn DeliveryStore>) -> Self {
        Self {
            messages,
            deliveries,
        }
    }

    /// Reconciles an acknowledged push and persists its records.
    pub async fn record_delivery(
        &self,
        application: &Application,
        request: &PushRequest,
        recipient_count: usize,
        acks: &AckMap,
    ) -> Result<MessageRecord, PushError> {
        let reconciliation = reconcile(application, request, recipient_count, acks);
        let message = self.messages.create(reconciliation.message).await?;

        if reconciliation.deliveries.is_empty() {
            return Ok(message);
        }

        let batch: Vec<NewDeliveryRecord> = reconciliation
            .deliveries
            .into_iter()
            .map(|pending| pending.into_new_record(&message))
            .collect();

        match self.deliveries.create_batch(batch).await {
            Ok(written) => {
                tracing::debug!(
                    message_id = message.id,
                    written = written,
                    "Delivery records persisted"
                );
                Ok(message)
            }
            Err(e) => {
                tracing::error!(
                    message_id = message.id,
                    app_name = %message.app_name,
                    error = %e,
                    "Failed to persist delivery records; message record kept"
                );
                Err(e.into())
            }
        }
    }

    /// Persists the zero-count record for an application without devices.
    pub async fn record_no_recipients(
        &self,
        application: &Application,
        request: &PushRequest,
    ) -> Result<MessageRecord, PushError> {
        let message = self
            .messages
            .create(no_recipient_record(application, request))
            .await?;

        tracing::info!(
            message_id = message.id,
            app_name = %message.app_name,
            "No devices registered, recorded empty push"
        );

        Ok(message)
    }
}
