//! Core types for the task reminder service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A task with a due time, contact info, and notification preference.
///
/// Serialized field names match the JSON wire format consumed by the HTTP
/// layer (camelCase, `taskID` on reminders).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Free-text priority tag ("high", "low", ...). Not validated.
    #[serde(default)]
    pub priority: String,
    pub due_date_time: DateTime<Utc>,
    #[serde(default)]
    pub email: String,
    /// Delivery channel tag ("email", "push"). Unknown tags are logged and
    /// dropped at dispatch time.
    #[serde(default)]
    pub notify_method: String,
    /// Advisory outcome of the last notification attempt. Written by the
    /// scanner, never read back by any store operation.
    #[serde(default)]
    pub notify_status: String,
    #[serde(default)]
    pub notify_message: String,
    /// Reminders owned by this task. Storage order is not significant.
    #[serde(default)]
    pub reminders: Vec<Reminder>,
}

/// A timestamped trigger owned by a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    pub id: String,
    pub date: DateTime<Utc>,
    #[serde(rename = "taskID", default)]
    pub task_id: String,
    /// When this reminder was last dispatched, if ever. Checked by the
    /// scanner so a due reminder is not renotified every cycle.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub notified_at: Option<DateTime<Utc>>,
}

/// Notification delivery channel parsed from a task's `notify_method` tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyMethod {
    Email,
    Push,
    /// Anything else, including the empty string. Carried for logging.
    Unknown(String),
}

impl NotifyMethod {
    /// Parse a method tag. Matching is exact; the wire format uses lowercase
    /// tags.
    pub fn parse(tag: &str) -> Self {
        match tag {
            "email" => Self::Email,
            "push" => Self::Push,
            other => Self::Unknown(other.to_string()),
        }
    }

    /// The registry key for this method, if it maps to a known channel.
    pub fn channel(&self) -> Option<&str> {
        match self {
            Self::Email => Some("email"),
            Self::Push => Some("push"),
            Self::Unknown(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_methods() {
        assert_eq!(NotifyMethod::parse("email"), NotifyMethod::Email);
        assert_eq!(NotifyMethod::parse("push"), NotifyMethod::Push);
    }

    #[test]
    fn parse_unknown_method_preserves_tag() {
        assert_eq!(
            NotifyMethod::parse("sms"),
            NotifyMethod::Unknown("sms".to_string())
        );
        assert_eq!(NotifyMethod::parse("").channel(), None);
    }

    #[test]
    fn task_serializes_camel_case() {
        let task = Task {
            id: "t1".to_string(),
            title: "Title".to_string(),
            description: String::new(),
            priority: "high".to_string(),
            due_date_time: Utc::now(),
            email: "a@b.com".to_string(),
            notify_method: "email".to_string(),
            notify_status: String::new(),
            notify_message: String::new(),
            reminders: vec![Reminder {
                id: "r1".to_string(),
                date: Utc::now(),
                task_id: "t1".to_string(),
                notified_at: None,
            }],
        };

        let json = serde_json::to_value(&task).unwrap();
        assert!(json.get("dueDateTime").is_some());
        assert!(json.get("notifyMethod").is_some());
        assert_eq!(json["reminders"][0]["taskID"], "t1");
        // Unstamped reminders omit the notifiedAt field entirely
        assert!(json["reminders"][0].get("notifiedAt").is_none());
    }
}
