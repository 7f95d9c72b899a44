//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod application;
pub mod device_message;
pub mod push_message;

pub use application::ApplicationEntity;
pub use device_message::DeviceMessageEntity;
pub use push_message::PushMessageEntity;
