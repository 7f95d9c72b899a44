//! In-memory record store.
//!
//! Used when running without a database and by tests. Implements all three
//! store traits over one shared state.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use shared::pagination::{Page, PageRequest};
use tokio::sync::RwLock;

use crate::error::StoreError;
use crate::models::{
    Application, DeliveryState, DeviceDeliveryRecord, MessageRecord, NewDeliveryRecord,
    NewMessageRecord, RecipientPool,
};
use crate::services::store::{ApplicationStore, DeliveryStore, MessageStore, StoreResult};

#[derive(Debug, Default)]
struct State {
    applications: Vec<Application>,
    users: HashMap<i64, Vec<i64>>,
    devices: HashMap<i64, Vec<String>>,
    messages: Vec<MessageRecord>,
    deliveries: Vec<DeviceDeliveryRecord>,
    next_application_id: i64,
    next_message_id: i64,
    next_delivery_id: i64,
    fail_delivery_batches: bool,
}

/// Record store backed by process memory.
#[derive(Debug, Default)]
pub struct InMemoryPushStore {
    state: RwLock<State>,
}

impl InMemoryPushStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an application with its user and device pools.
    pub async fn add_application(
        &self,
        app_name: &str,
        user_ids: &[i64],
        device_ids: &[&str],
    ) -> Application {
        let mut state = self.state.write().await;
        state.next_application_id += 1;
        let application = Application {
            id: state.next_application_id,
            app_name: app_name.to_string(),
            created_at: Utc::now(),
        };
        state.users.insert(application.id, user_ids.to_vec());
        state.devices.insert(
            application.id,
            device_ids.iter().map(|d| d.to_string()).collect(),
        );
        state.applications.push(application.clone());
        application
    }

    /// Makes every subsequent delivery batch fail.
    pub async fn fail_delivery_batches(&self, fail: bool) {
        self.state.write().await.fail_delivery_batches = fail;
    }

    /// All message records in insertion order.
    pub async fn messages(&self) -> Vec<MessageRecord> {
        self.state.read().await.messages.clone()
    }

    /// All delivery records in insertion order.
    pub async fn deliveries(&self) -> Vec<DeviceDeliveryRecord> {
        self.state.read().await.deliveries.clone()
    }
}

fn newest_first<T: Clone>(
    mut rows: Vec<&T>,
    created_at: impl Fn(&T) -> (DateTime<Utc>, i64),
    page: PageRequest,
) -> Page<T> {
    rows.sort_by(|a, b| created_at(*b).cmp(&created_at(*a)));
    let total = rows.len() as i64;
    let items = rows
        .into_iter()
        .skip(page.offset as usize)
        .take(page.limit as usize)
        .cloned()
        .collect();
    Page::new(items, total)
}

#[async_trait::async_trait]
impl ApplicationStore for InMemoryPushStore {
    async fn find_by_name(&self, app_name: &str) -> StoreResult<Option<Application>> {
        let state = self.state.read().await;
        Ok(state
            .applications
            .iter()
            .find(|a| a.app_name == app_name)
            .cloned())
    }

    async fn recipient_ids(&self, app_id: i64, pool: RecipientPool) -> StoreResult<Vec<String>> {
        let state = self.state.read().await;
        let ids = match pool {
            RecipientPool::Users => state
                .users
                .get(&app_id)
                .map(|ids| ids.iter().map(|id| id.to_string()).collect())
                .unwrap_or_default(),
            RecipientPool::Devices => state.devices.get(&app_id).cloned().unwrap_or_default(),
        };
        Ok(ids)
    }
}

#[async_trait::async_trait]
impl MessageStore for InMemoryPushStore {
    async fn create(&self, record: NewMessageRecord) -> StoreResult<MessageRecord> {
        let mut state = self.state.write().await;
        state.next_message_id += 1;
        let record = record.into_record(state.next_message_id);
        state.messages.push(record.clone());
        Ok(record)
    }

    async fn find_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<MessageRecord>> {
        let state = self.state.read().await;
        let mut records: Vec<MessageRecord> = state
            .messages
            .iter()
            .filter(|m| m.created_at >= start && m.created_at <= end)
            .cloned()
            .collect();
        records.sort_by_key(|m| (m.created_at, m.id));
        Ok(records)
    }

    async fn find_page(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> StoreResult<Page<MessageRecord>> {
        let state = self.state.read().await;
        let needle = search.map(str::to_lowercase);
        let rows: Vec<&MessageRecord> = state
            .messages
            .iter()
            .filter(|m| match &needle {
                Some(needle) => {
                    m.app_name.to_lowercase().contains(needle)
                        || m.message_content.to_lowercase().contains(needle)
                        || m.message_title.to_lowercase().contains(needle)
                }
                None => true,
            })
            .collect();
        Ok(newest_first(rows, |m| (m.created_at, m.id), page))
    }
}

#[async_trait::async_trait]
impl DeliveryStore for InMemoryPushStore {
    async fn create_batch(&self, records: Vec<NewDeliveryRecord>) -> StoreResult<u64> {
        let mut state = self.state.write().await;
        if state.fail_delivery_batches {
            return Err(StoreError::Backend("delivery batch rejected".to_string()));
        }

        let written = records.len() as u64;
        for record in records {
            state.next_delivery_id += 1;
            let id = state.next_delivery_id;
            state.deliveries.push(record.into_record(id));
        }
        Ok(written)
    }

    async fn find_page(
        &self,
        message_id: i64,
        delivery_state: Option<DeliveryState>,
        page: PageRequest,
    ) -> StoreResult<Page<DeviceDeliveryRecord>> {
        let state = self.state.read().await;
        let rows: Vec<&DeviceDeliveryRecord> = state
            .deliveries
            .iter()
            .filter(|d| d.message_id == message_id)
            .filter(|d| delivery_state.map_or(true, |s| d.delivery_state == s))
            .collect();
        Ok(newest_first(rows, |d| (d.created_at, d.id), page))
    }
}
