//! Domain models for the push platform.

pub mod application;
pub mod delivery_record;
pub mod message_record;
pub mod push;
pub mod statistics;

pub use application::{Application, RecipientPool};
pub use delivery_record::{
    DeliveryState, DeviceDeliveryRecord, ListDeliveriesQuery, ListDeliveriesResponse,
    NewDeliveryRecord, ReadState,
};
pub use message_record::{
    ListMessagesQuery, ListMessagesResponse, MessageRecord, NewMessageRecord, PushState,
};
pub use push::{AckMap, Acknowledgment, MessageType, PushMessage, PushRequest};
pub use statistics::{ChartInfo, ChartQuery};
