//! External service integrations.

pub mod push_gateway;

pub use push_gateway::{DisabledPushConnector, GatewayError, HttpPushConnector};
