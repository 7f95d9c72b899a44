//! Application domain model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A push-enabled application.
///
/// Applications are registered by an external flow and are read-only here.
/// Each owns a pool of registered user ids and a pool of registered device ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Application {
    pub id: i64,
    pub app_name: String,
    pub created_at: DateTime<Utc>,
}

/// Selects which recipient pool of an application a push targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecipientPool {
    /// Registered user ids (server push path).
    Users,
    /// Registered device ids (admin push path).
    Devices,
}

impl std::fmt::Display for RecipientPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecipientPool::Users => write!(f, "users"),
            RecipientPool::Devices => write!(f, "devices"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipient_pool_display() {
        assert_eq!(RecipientPool::Users.to_string(), "users");
        assert_eq!(RecipientPool::Devices.to_string(), "devices");
    }

    #[test]
    fn test_recipient_pool_serialization() {
        assert_eq!(
            serde_json::to_string(&RecipientPool::Devices).unwrap(),
            "\"devices\""
        );
    }

    #[test]
    fn test_application_serialization() {
        let app = Application {
            id: 7,
            app_name: "foo".to_string(),
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&app).unwrap();
        assert!(json.contains("\"id\":7"));
        assert!(json.contains("\"app_name\":\"foo\""));
    }
}
