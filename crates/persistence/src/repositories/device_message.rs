//! Device message repository for database operations.

use domain::models::{DeliveryState, DeviceDeliveryRecord, NewDeliveryRecord};
use domain::services::{DeliveryStore, StoreResult};
use shared::pagination::{Page, PageRequest};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::entities::DeviceMessageEntity;
use crate::metrics::QueryTimer;

/// Rows per multi-row INSERT; keeps each statement under the bind limit.
const INSERT_CHUNK_SIZE: usize = 1000;

/// Repository for per-device delivery records.
#[derive(Clone)]
pub struct DeviceMessageRepository {
    pool: PgPool,
}

impl DeviceMessageRepository {
    /// Creates a new DeviceMessageRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert delivery records in one transaction.
    /// Returns the number of rows written.
    pub async fn insert_batch(&self, records: &[NewDeliveryRecord]) -> Result<u64, sqlx::Error> {
        if records.is_empty() {
            return Ok(0);
        }

        let timer = QueryTimer::new("insert_device_messages_batch");
        let mut tx = self.pool.begin().await?;
        let mut written = 0;

        for chunk in records.chunks(INSERT_CHUNK_SIZE) {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO device_messages (message_id, device_id, app_id, app_name, \
                 delivery_state, read_state, created_at) ",
            );
            builder.push_values(chunk, |mut row, record| {
                row.push_bind(record.message_id)
                    .push_bind(record.device_id.clone())
                    .push_bind(record.app_id)
                    .push_bind(record.app_name.clone())
                    .push_bind(record.delivery_state.as_db())
                    .push_bind(record.read_state.as_db())
                    .push_bind(record.created_at);
            });

            let result = builder.build().execute(&mut *tx).await?;
            written += result.rows_affected();
        }

        tx.commit().await?;
        timer.record();
        Ok(written)
    }

    /// Count delivery records of a message, optionally by state.
    pub async fn count_for_message(
        &self,
        message_id: i64,
        delivery_state: Option<i16>,
    ) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_device_messages");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM device_messages
            WHERE message_id = $1
              AND ($2::smallint IS NULL OR delivery_state = $2)
            "#,
        )
        .bind(message_id)
        .bind(delivery_state)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List delivery records of a message, newest first.
    pub async fn list_for_message(
        &self,
        message_id: i64,
        delivery_state: Option<i16>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<DeviceMessageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_device_messages");
        let result = sqlx::query_as::<_, DeviceMessageEntity>(
            r#"
            SELECT id, message_id, device_id, app_id, app_name, delivery_state,
                   read_state, created_at
            FROM device_messages
            WHERE message_id = $1
              AND ($2::smallint IS NULL OR delivery_state = $2)
            ORDER BY created_at DESC, id DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(message_id)
        .bind(delivery_state)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[async_trait::async_trait]
impl DeliveryStore for DeviceMessageRepository {
    async fn create_batch(&self, records: Vec<NewDeliveryRecord>) -> StoreResult<u64> {
        Ok(self.insert_batch(&records).await?)
    }

    async fn find_page(
        &self,
        message_id: i64,
        state: Option<DeliveryState>,
        page: PageRequest,
    ) -> StoreResult<Page<DeviceDeliveryRecord>> {
        let state = state.map(DeliveryState::as_db);
        let total = self.count_for_message(message_id, state).await?;
        if total == 0 {
            return Ok(Page::empty());
        }

        let entities = self
            .list_for_message(message_id, state, page.limit_i64(), page.offset_i64())
            .await?;
        Ok(Page::new(entities, total).map(Into::into))
    }
}
