//! Record store abstractions consumed by the push services.
//!
//! The PostgreSQL repositories in the persistence crate implement these
//! traits; [`super::memory::InMemoryPushStore`] implements them for
//! development and tests.

use chrono::{DateTime, Utc};
use shared::pagination::{Page, PageRequest};

use crate::error::StoreError;
use crate::models::{
    Application, DeliveryState, DeviceDeliveryRecord, MessageRecord, NewDeliveryRecord,
    NewMessageRecord, RecipientPool,
};

pub type StoreResult<T> = Result<T, StoreError>;

/// Read-only lookup of registered applications and their recipient pools.
#[async_trait::async_trait]
pub trait ApplicationStore: Send + Sync {
    /// Finds an application by its unique name.
    async fn find_by_name(&self, app_name: &str) -> StoreResult<Option<Application>>;

    /// Returns the identifiers registered in one pool of an application.
    ///
    /// User ids are returned in their string form.
    async fn recipient_ids(&self, app_id: i64, pool: RecipientPool) -> StoreResult<Vec<String>>;
}

/// Storage for aggregate message records.
#[async_trait::async_trait]
pub trait MessageStore: Send + Sync {
    /// Persists a record and returns it with its assigned id.
    async fn create(&self, record: NewMessageRecord) -> StoreResult<MessageRecord>;

    /// Records created in `[start, end]`, oldest first.
    async fn find_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<MessageRecord>>;

    /// Newest-first page, optionally filtered by a case-insensitive substring
    /// of application name, content or title.
    async fn find_page(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> StoreResult<Page<MessageRecord>>;
}

/// Storage for per-device delivery records.
#[async_trait::async_trait]
pub trait DeliveryStore: Send + Sync {
    /// Persists all records as one batch and returns the number written.
    async fn create_batch(&self, records: Vec<NewDeliveryRecord>) -> StoreResult<u64>;

    /// Newest-first page of the deliveries of one message.
    async fn find_page(
        &self,
        message_id: i64,
        state: Option<DeliveryState>,
        page: PageRequest,
    ) -> StoreResult<Page<DeviceDeliveryRecord>>;
}
