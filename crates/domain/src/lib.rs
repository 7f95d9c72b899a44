//! Domain layer for the push platform.
//!
//! This crate contains:
//! - Domain models (Application, PushMessage, MessageRecord, DeviceDeliveryRecord)
//! - The dispatch and reconciliation services
//! - Collaborator traits for stores and the push connector
//! - Domain error types

pub mod error;
pub mod models;
pub mod services;

pub use error::{ConnectorError, PushError, StoreError};
