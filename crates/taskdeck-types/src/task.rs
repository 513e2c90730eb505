//! Task and category types.
//!
//! Tasks carry a three-level priority and an optional free-form category
//! label; categories are a separate user-owned list used for grouping.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Task priority.
///
/// Maps to the CHECK constraint in the SQLite schema:
/// `CHECK (priority IN ('low', 'medium', 'high'))`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
        }
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(format!("invalid priority: '{other}'")),
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Medium
    }
}

/// A single task owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    /// Free-form category label; not a foreign key into `Category`.
    pub category: Option<String>,
    pub is_completed: bool,
    pub due_date: Option<DateTime<Utc>>,
    pub user_id: Uuid,
}

/// A user-owned category for grouping tasks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub user_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_roundtrip() {
        for priority in [Priority::Low, Priority::Medium, Priority::High] {
            let s = priority.to_string();
            let parsed: Priority = s.parse().unwrap();
            assert_eq!(priority, parsed);
        }
    }

    #[test]
    fn test_priority_serde() {
        let priority = Priority::High;
        let json = serde_json::to_string(&priority).unwrap();
        assert_eq!(json, "\"high\"");
        let parsed: Priority = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, Priority::High);
    }

    #[test]
    fn test_priority_default_is_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn test_priority_rejects_unknown() {
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn test_task_serialize() {
        let task = Task {
            id: Uuid::now_v7(),
            title: "Write report".to_string(),
            description: None,
            priority: Priority::Medium,
            category: Some("work".to_string()),
            is_completed: false,
            due_date: None,
            user_id: Uuid::now_v7(),
        };
        let json = serde_json::to_string(&task).unwrap();
        assert!(json.contains("\"priority\":\"medium\""));
        assert!(json.contains("\"is_completed\":false"));
    }
}
