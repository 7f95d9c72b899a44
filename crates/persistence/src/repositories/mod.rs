//! Repository implementations.
//!
//! Repositories handle database operations and implement the domain store
//! traits.

pub mod application;
pub mod device_message;
pub mod push_message;

pub use application::ApplicationRepository;
pub use device_message::DeviceMessageRepository;
pub use push_message::PushMessageRepository;
