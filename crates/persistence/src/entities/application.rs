//! Application entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the applications table.
#[derive(Debug, Clone, FromRow)]
pub struct ApplicationEntity {
    pub id: i64,
    pub app_name: String,
    pub created_at: DateTime<Utc>,
}

impl From<ApplicationEntity> for domain::models::Application {
    fn from(entity: ApplicationEntity) -> Self {
        Self {
            id: entity.id,
            app_name: entity.app_name,
            created_at: entity.created_at,
        }
    }
}
