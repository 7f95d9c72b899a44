//! Per-recipient delivery record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Delivery outcome for one device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i16", try_from = "i16")]
pub enum DeliveryState {
    Failed = 0,
    Delivered = 1,
}

impl DeliveryState {
    pub fn from_ack(delivered: bool) -> Self {
        if delivered {
            DeliveryState::Delivered
        } else {
            DeliveryState::Failed
        }
    }

    /// Maps a stored column value; anything other than 1 reads as failed.
    pub fn from_db(value: i16) -> Self {
        Self::from_ack(value == 1)
    }

    pub fn as_db(self) -> i16 {
        self as i16
    }
}

impl From<DeliveryState> for i16 {
    fn from(value: DeliveryState) -> Self {
        value.as_db()
    }
}

impl TryFrom<i16> for DeliveryState {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(DeliveryState::Failed),
            1 => Ok(DeliveryState::Delivered),
            other => Err(format!("unknown delivery state {}", other)),
        }
    }
}

/// Read tracking for a delivered message. Always unread at creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i16", try_from = "i16")]
pub enum ReadState {
    Unread = 0,
    Read = 1,
}

impl ReadState {
    pub fn from_db(value: i16) -> Self {
        if value == 1 {
            ReadState::Read
        } else {
            ReadState::Unread
        }
    }

    pub fn as_db(self) -> i16 {
        self as i16
    }
}

impl From<ReadState> for i16 {
    fn from(value: ReadState) -> Self {
        value.as_db()
    }
}

impl TryFrom<i16> for ReadState {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(ReadState::Unread),
            1 => Ok(ReadState::Read),
            other => Err(format!("unknown read state {}", other)),
        }
    }
}

/// Outcome of one push for one device, as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DeviceDeliveryRecord {
    pub id: i64,
    pub message_id: i64,
    pub device_id: String,
    pub app_id: i64,
    pub app_name: String,
    pub delivery_state: DeliveryState,
    pub read_state: ReadState,
    pub created_at: DateTime<Utc>,
}

/// A delivery record that has not been written yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDeliveryRecord {
    pub message_id: i64,
    pub device_id: String,
    pub app_id: i64,
    pub app_name: String,
    pub delivery_state: DeliveryState,
    pub read_state: ReadState,
    pub created_at: DateTime<Utc>,
}

impl NewDeliveryRecord {
    pub fn into_record(self, id: i64) -> DeviceDeliveryRecord {
        DeviceDeliveryRecord {
            id,
            message_id: self.message_id,
            device_id: self.device_id,
            app_id: self.app_id,
            app_name: self.app_name,
            delivery_state: self.delivery_state,
            read_state: self.read_state,
            created_at: self.created_at,
        }
    }
}

/// Query parameters for listing the deliveries of one message.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct ListDeliveriesQuery {
    /// 0 = failed, 1 = delivered; absent lists both.
    #[validate(range(min = 0, max = 1, message = "Delivery state must be 0 or 1"))]
    pub delivery_state: Option<i16>,
    pub start: Option<u32>,
    pub length: Option<u32>,
}

impl ListDeliveriesQuery {
    pub fn state_filter(&self) -> Option<DeliveryState> {
        self.delivery_state.map(DeliveryState::from_db)
    }
}

/// Response for listing delivery records.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListDeliveriesResponse {
    pub data: Vec<DeviceDeliveryRecord>,
    pub records_total: i64,
    pub records_filtered: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_state_from_ack() {
        assert_eq!(DeliveryState::from_ack(true), DeliveryState::Delivered);
        assert_eq!(DeliveryState::from_ack(false), DeliveryState::Failed);
        assert_eq!(DeliveryState::Delivered.as_db(), 1);
        assert_eq!(DeliveryState::Failed.as_db(), 0);
    }

    #[test]
    fn test_read_state_db_mapping() {
        assert_eq!(ReadState::from_db(0), ReadState::Unread);
        assert_eq!(ReadState::from_db(1), ReadState::Read);
        assert_eq!(ReadState::Unread.as_db(), 0);
    }

    #[test]
    fn test_delivery_record_serialization() {
        let record = DeviceDeliveryRecord {
            id: 1,
            message_id: 10,
            device_id: "d1".to_string(),
            app_id: 3,
            app_name: "foo".to_string(),
            delivery_state: DeliveryState::Delivered,
            read_state: ReadState::Unread,
            created_at: Utc::now(),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["message_id"], 10);
        assert_eq!(json["device_id"], "d1");
        assert_eq!(json["delivery_state"], 1);
        assert_eq!(json["read_state"], 0);
    }

    #[test]
    fn test_list_deliveries_query_state_filter() {
        let query = ListDeliveriesQuery {
            delivery_state: Some(0),
            ..Default::default()
        };
        assert!(query.validate().is_ok());
        assert_eq!(query.state_filter(), Some(DeliveryState::Failed));
        assert_eq!(ListDeliveriesQuery::default().state_filter(), None);
    }

    #[test]
    fn test_list_deliveries_query_rejects_unknown_state() {
        let query = ListDeliveriesQuery {
            delivery_state: Some(2),
            ..Default::default()
        };
        assert!(query.validate().is_err());
    }
}
