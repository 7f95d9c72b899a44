//! Aggregate push message record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Whether a push attempt was actually dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i16", try_from = "i16")]
pub enum PushState {
    /// No recipients, nothing was sent.
    NotSent = 0,
    /// Dispatched and acknowledged by the gateway.
    Sent = 1,
}

impl PushState {
    /// Maps a stored column value; anything other than 1 reads as not sent.
    pub fn from_db(value: i16) -> Self {
        if value == 1 {
            PushState::Sent
        } else {
            PushState::NotSent
        }
    }

    pub fn as_db(self) -> i16 {
        self as i16
    }
}

impl From<PushState> for i16 {
    fn from(value: PushState) -> Self {
        value.as_db()
    }
}

impl TryFrom<i16> for PushState {
    type Error = String;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(PushState::NotSent),
            1 => Ok(PushState::Sent),
            other => Err(format!("unknown push state {}", other)),
        }
    }
}

/// One admin-initiated push attempt, as persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct MessageRecord {
    pub id: i64,
    pub app_id: i64,
    pub app_name: String,
    pub message_title: String,
    pub message_content: String,
    pub total_count: i32,
    pub success_count: i32,
    pub fail_count: i32,
    pub platform: String,
    pub push_state: PushState,
    pub remark: String,
    pub created_at: DateTime<Utc>,
}

/// A message record that has not been written yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessageRecord {
    pub app_id: i64,
    pub app_name: String,
    pub message_title: String,
    pub message_content: String,
    pub total_count: i32,
    pub success_count: i32,
    pub fail_count: i32,
    pub platform: String,
    pub push_state: PushState,
    pub remark: String,
    pub created_at: DateTime<Utc>,
}

impl NewMessageRecord {
    /// Attaches the identifier assigned by the store.
    pub fn into_record(self, id: i64) -> MessageRecord {
        MessageRecord {
            id,
            app_id: self.app_id,
            app_name: self.app_name,
            message_title: self.message_title,
            message_content: self.message_content,
            total_count: self.total_count,
            success_count: self.success_count,
            fail_count: self.fail_count,
            platform: self.platform,
            push_state: self.push_state,
            remark: self.remark,
            created_at: self.created_at,
        }
    }
}

/// Query parameters for listing message records.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct ListMessagesQuery {
    /// Row offset.
    pub start: Option<u32>,
    /// Page size, clamped to the configured maximum.
    pub length: Option<u32>,
    /// Substring matched against application name, content and title.
    #[validate(length(max = 200, message = "Search text must be at most 200 characters"))]
    pub search: Option<String>,
}

impl ListMessagesQuery {
    /// Returns the search text if it holds anything besides whitespace.
    pub fn search_text(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// Response for listing message records.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListMessagesResponse {
    pub data: Vec<MessageRecord>,
    pub records_total: i64,
    pub records_filtered: i64,
}
