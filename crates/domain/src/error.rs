//! Domain error types.

use thiserror::Error;

/// Failure reported by a record store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Store error: {0}")]
    Backend(String),
}

/// Failure reported by a push connector.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConnectorError {
    /// The gateway did not produce a usable reply.
    #[error("Push gateway unavailable: {0}")]
    Unavailable(String),

    /// No gateway is configured.
    #[error("Push connector is disabled")]
    Disabled,
}

/// Outcome taxonomy of the push operations.
#[derive(Debug, Error)]
pub enum PushError {
    #[error("Application not found: {0}")]
    ApplicationNotFound(String),

    #[error("push service not started")]
    Unavailable,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl PushError {
    pub fn is_unavailable(&self) -> bool {
        matches!(self, PushError::Unavailable)
    }
}

/// Any connector failure on the collect path counts as unavailability.
impl From<ConnectorError> for PushError {
    fn from(_: ConnectorError) -> Self {
        PushError::Unavailable
    }
}
