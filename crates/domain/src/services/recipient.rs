//! Recipient resolution.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::error::PushError;
use crate::models::{Application, RecipientPool};
use crate::services::store::ApplicationStore;

/// An application together with the recipients selected from one of its pools.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRecipients {
    pub application: Application,
    pub recipient_ids: BTreeSet<String>,
}

impl ResolvedRecipients {
    pub fn is_empty(&self) -> bool {
        self.recipient_ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.recipient_ids.len()
    }

    /// Recipient ids in their deterministic order.
    pub fn to_vec(&self) -> Vec<String> {
        self.recipient_ids.iter().cloned().collect()
    }
}

/// Resolves an application name to its current recipient set.
#[derive(Clone)]
pub struct RecipientResolver {
    applications: Arc<dyn ApplicationStore>,
}

impl RecipientResolver {
    pub fn new(applications: Arc<dyn ApplicationStore>) -> Self {
        Self { applications }
    }

    /// Looks up the application and returns the de-duplicated ids of the
    /// selected pool. An empty pool is not an error.
    pub async fn resolve(
        &self,
        app_name: &str,
        pool: RecipientPool,
    ) -> Result<ResolvedRecipients, PushError> {
        let application = self
            .applications
            .find_by_name(app_name)
            .await?
            .ok_or_else(|| PushError::ApplicationNotFound(app_name.to_string()))?;

        let recipient_ids: BTreeSet<String> = self
            .applications
            .recipient_ids(application.id, pool)
            .await?
            .into_iter()
            .collect();

        tracing::debug!(
            app_id = application.id,
            app_name = %application.app_name,
            pool = %pool,
            recipients = recipient_ids.len(),
            "Resolved recipients"
        );

        Ok(ResolvedRecipients {
            application,
            recipient_ids,
        })
    }
}
