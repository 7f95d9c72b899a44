//! Push message repository for database operations.

use chrono::{DateTime, Utc};
use domain::models::{MessageRecord, NewMessageRecord};
use domain::services::{MessageStore, StoreResult};
use shared::pagination::{Page, PageRequest};
use sqlx::PgPool;

use crate::entities::PushMessageEntity;
use crate::metrics::QueryTimer;

/// Builds an ILIKE pattern matching `search` as a literal substring.
pub(crate) fn contains_pattern(search: &str) -> String {
    let mut pattern = String::with_capacity(search.len() + 2);
    pattern.push('%');
    for c in search.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Repository for push message records.
#[derive(Clone)]
pub struct PushMessageRepository {
    pool: PgPool,
}

impl PushMessageRepository {
    /// Creates a new PushMessageRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Insert a message record.
    pub async fn insert(
        &self,
        record: &NewMessageRecord,
    ) -> Result<PushMessageEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_push_message");
        let result = sqlx::query_as::<_, PushMessageEntity>(
            r#"
            INSERT INTO push_messages (app_id, app_name, message_title, message_content,
                                       total_count, success_count, fail_count, platform,
                                       push_state, remark, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING id, app_id, app_name, message_title, message_content, total_count,
                      success_count, fail_count, platform, push_state, remark, created_at
            "#,
        )
        .bind(record.app_id)
        .bind(&record.app_name)
        .bind(&record.message_title)
        .bind(&record.message_content)
        .bind(record.total_count)
        .bind(record.success_count)
        .bind(record.fail_count)
        .bind(&record.platform)
        .bind(record.push_state.as_db())
        .bind(&record.remark)
        .bind(record.created_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find records created within `[start, end]`, oldest first.
    pub async fn find_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<PushMessageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_push_messages_created_between");
        let result = sqlx::query_as::<_, PushMessageEntity>(
            r#"
            SELECT id, app_id, app_name, message_title, message_content, total_count,
                   success_count, fail_count, platform, push_state, remark, created_at
            FROM push_messages
            WHERE created_at >= $1 AND created_at <= $2
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Count records matching the optional search pattern.
    pub async fn count_matching(&self, pattern: Option<&str>) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_push_messages");
        let result = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM push_messages
            WHERE $1::text IS NULL
               OR app_name ILIKE $1
               OR message_content ILIKE $1
               OR message_title ILIKE $1
            "#,
        )
        .bind(pattern)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List records matching the optional search pattern, newest first.
    pub async fn list_matching(
        &self,
        pattern: Option<&str>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<PushMessageEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_push_messages");
        let result = sqlx::query_as::<_, PushMessageEntity>(
            r#"
            SELECT id, app_id, app_name, message_title, message_content, total_count,
                   success_count, fail_count, platform, push_state, remark, created_at
            FROM push_messages
            WHERE $1::text IS NULL
               OR app_name ILIKE $1
               OR message_content ILIKE $1
               OR message_title ILIKE $1
            ORDER BY created_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(pattern)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}

#[async_trait::async_trait]
impl MessageStore for PushMessageRepository {
    async fn create(&self, record: NewMessageRecord) -> StoreResult<MessageRecord> {
        let entity = self.insert(&record).await?;
        Ok(entity.into())
    }

    async fn find_created_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<MessageRecord>> {
        let entities = PushMessageRepository::find_created_between(self, start, end).await?;
        Ok(entities.into_iter().map(Into::into).collect())
    }

    async fn find_page(
        &self,
        search: Option<&str>,
        page: PageRequest,
    ) -> StoreResult<Page<MessageRecord>> {
        let pattern = search.map(contains_pattern);
        let total = self.count_matching(pattern.as_deref()).await?;
        if total == 0 {
            return Ok(Page::empty());
        }

        let entities = self
            .list_matching(pattern.as_deref(), page.limit_i64(), page.offset_i64())
            .await?;
        Ok(Page::new(entities, total).map(Into::into))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_pattern_wraps_search() {
        assert_eq!(contains_pattern("storm"), "%storm%");
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(contains_pattern("a\\b"), "%a\\\\b%");
    }
}
