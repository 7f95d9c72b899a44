//! Device message entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{DeliveryState, DeviceDeliveryRecord, ReadState};
use sqlx::FromRow;

/// Database row mapping for the device_messages table.
#[derive(Debug, Clone, FromRow)]
pub struct DeviceMessageEntity {
    pub id: i64,
    pub message_id: i64,
    pub device_id: String,
    pub app_id: i64,
    pub app_name: String,
    pub delivery_state: i16,
    pub read_state: i16,
    pub created_at: DateTime<Utc>,
}

impl From<DeviceMessageEntity> for DeviceDeliveryRecord {
    fn from(entity: DeviceMessageEntity) -> Self {
        Self {
            id: entity.id,
            message_id: entity.message_id,
            device_id: entity.device_id,
            app_id: entity.app_id,
            app_name: entity.app_name,
            delivery_state: DeliveryState::from_db(entity.delivery_state),
            read_state: ReadState::from_db(entity.read_state),
            created_at: entity.created_at,
        }
    }
}
