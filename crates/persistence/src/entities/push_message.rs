//! Push message entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::{MessageRecord, PushState};
use sqlx::FromRow;

/// Database row mapping for the push_messages table.
#[derive(Debug, Clone, FromRow)]
pub struct PushMessageEntity {
    pub id: i64,
    pub app_id: i64,
    pub app_name: String,
    pub message_title: String,
    pub message_content: String,
    pub total_count: i32,
    pub success_count: i32,
    pub fail_count: i32,
    pub platform: String,
    pub push_state: i16,
    pub remark: String,
    pub created_at: DateTime<Utc>,
}

impl From<PushMessageEntity> for MessageRecord {
    fn from(entity: PushMessageEntity) -> Self {
        Self {
            id: entity.id,
            app_id: entity.app_id,
            app_name: entity.app_name,
            message_title: entity.message_title,
            message_content: entity.message_content,
            total_count: entity.total_count,
            success_count: entity.success_count,
            fail_count: entity.fail_count,
            platform: entity.platform,
            push_state: PushState::from_db(entity.push_state),
            remark: entity.remark,
            created_at: entity.created_at,
        }
    }
}
