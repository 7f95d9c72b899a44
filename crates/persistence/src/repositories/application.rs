//! Application repository for database operations.

use domain::models::{Application, RecipientPool};
use domain::services::{ApplicationStore, StoreResult};
use sqlx::PgPool;

use crate::entities::ApplicationEntity;
use crate::metrics::QueryTimer;

/// Repository for application and recipient pool lookups.
#[derive(Clone)]
pub struct ApplicationRepository {
    pool: PgPool,
}

impl ApplicationRepository {
    /// Creates a new ApplicationRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Find an application by its unique name.
    pub async fn find_by_name(
        &self,
        app_name: &str,
    ) -> Result<Option<ApplicationEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_application_by_name");
        let result = sqlx::query_as::<_, ApplicationEntity>(
            r#"
            SELECT id, app_name, created_at
            FROM applications
            WHERE app_name = $1
            "#,
        )
        .bind(app_name)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Registered user ids of an application.
    pub async fn find_user_ids(&self, app_id: i64) -> Result<Vec<i64>, sqlx::Error> {
        let timer = QueryTimer::new("find_application_user_ids");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT user_id
            FROM application_users
            WHERE app_id = $1
            ORDER BY user_id
            "#,
        )
        .bind(app_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Registered device ids of an application.
    pub async fn find_device_ids(&self, app_id: i64) -> Result<Vec<String>, sqlx::Error> {
        let timer = QueryTimer::new("find_application_device_ids");
        let result = sqlx::query_scalar::<_, String>(
            r#"
            SELECT device_id
            FROM application_devices
            WHERE app_id = $1
            ORDER BY device_id
            "#,
        )
        .bind(app_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[async_trait::async_trait]
impl ApplicationStore for ApplicationRepository {
    async fn find_by_name(&self, app_name: &str) -> StoreResult<Option<Application>> {
        let entity = ApplicationRepository::find_by_name(self, app_name).await?;
        Ok(entity.map(Into::into))
    }

    async fn recipient_ids(&self, app_id: i64, pool: RecipientPool) -> StoreResult<Vec<String>> {
        let ids = match pool {
            RecipientPool::Users => self
                .find_user_ids(app_id)
                .await?
                .into_iter()
                .map(|id| id.to_string())
                .collect(),
            RecipientPool::Devices => self.find_device_ids(app_id).await?,
        };
        Ok(ids)
    }
}
