//! Push request, transport message and acknowledgment models.

use std::collections::{BTreeMap, HashMap};

use serde::de::Deserializer;
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use shared::validation::{validate_not_blank, validate_platform};
use validator::Validate;

/// Incoming push request, shared by the server and admin paths.
///
/// The title is only recorded on the admin path; the sender is only
/// forwarded on the server path.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct PushRequest {
    #[validate(length(max = 100, message = "Application name must be at most 100 characters"))]
    #[validate(custom(function = "validate_not_blank"))]
    pub app_name: String,

    #[serde(default)]
    #[validate(length(max = 200, message = "Title must be at most 200 characters"))]
    pub message_title: String,

    #[validate(length(min = 1, max = 4000, message = "Content must be 1-4000 characters"))]
    pub message_content: String,

    #[validate(custom(function = "validate_platform"))]
    pub platform: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, max = 100, message = "Sender must be 1-100 characters"))]
    pub sender: Option<String>,
}

/// Transport-level message type understood by the push gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum MessageType {
    /// Generic notification, no acknowledgment expected.
    Notification = 1,
    /// Delivery notification, the gateway replies with per-recipient acks.
    Delivery = 2,
}

impl From<MessageType> for u8 {
    fn from(value: MessageType) -> Self {
        value as u8
    }
}

impl TryFrom<u8> for MessageType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(MessageType::Notification),
            2 => Ok(MessageType::Delivery),
            other => Err(format!("unknown message type {}", other)),
        }
    }
}

/// Message handed to the push connector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushMessage {
    pub msg_type: MessageType,
    pub msg_content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_id: Option<String>,
    pub to_id: Vec<String>,
    pub platform: String,
    /// Routing key; the application name on the admin path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_key: Option<String>,
}

/// Delivery outcome reported by the gateway for one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acknowledgment {
    pub recipient_id: String,
    pub delivered: bool,
}

/// Ordered per-recipient acknowledgments from one notify-and-collect call.
///
/// On the wire this is a sequence of single-entry objects
/// (`[{"d1":true},{"d2":false}]`). Recipient ids are unique within one map;
/// inserting an id twice keeps its original position and takes the newer flag.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AckMap {
    entries: Vec<Acknowledgment>,
    /// Recipient id to position in `entries`.
    index: HashMap<String, usize>,
}

impl AckMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    pub fn insert(&mut self, recipient_id: impl Into<String>, delivered: bool) {
        let recipient_id = recipient_id.into();
        match self.index.get(&recipient_id) {
            Some(&position) => self.entries[position].delivered = delivered,
            None => {
                self.index.insert(recipient_id.clone(), self.entries.len());
                self.entries.push(Acknowledgment {
                    recipient_id,
                    delivered,
                });
            }
        }
    }

    pub fn get(&self, recipient_id: &str) -> Option<bool> {
        self.index
            .get(recipient_id)
            .map(|&position| self.entries[position].delivered)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Acknowledgment> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn delivered_count(&self) -> usize {
        self.entries.iter().filter(|e| e.delivered).count()
    }

    pub fn failed_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.delivered).count()
    }
}

impl<S: Into<String>> FromIterator<(S, bool)> for AckMap {
    fn from_iter<I: IntoIterator<Item = (S, bool)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let mut map = AckMap::with_capacity(iter.size_hint().0);
        for (recipient_id, delivered) in iter {
            map.insert(recipient_id, delivered);
        }
        map
    }
}

impl<'a> IntoIterator for &'a AckMap {
    type Item = &'a Acknowledgment;
    type IntoIter = std::slice::Iter<'a, Acknowledgment>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl Serialize for AckMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut seq = serializer.serialize_seq(Some(self.entries.len()))?;
        for entry in &self.entries {
            let mut single = BTreeMap::new();
            single.insert(entry.recipient_id.as_str(), entry.delivered);
            seq.serialize_element(&single)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for AckMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw: Vec<BTreeMap<String, bool>> = Vec::deserialize(deserializer)?;
        let mut map = AckMap::with_capacity(raw.len());
        for (recipient_id, delivered) in raw.into_iter().flatten() {
            map.insert(recipient_id, delivered);
        }
        Ok(map)
    }
}
