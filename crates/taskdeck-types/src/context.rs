//! Prompt-context views over the user's task state and chat history.
//!
//! These are the reduced shapes the prompt builder consumes: open tasks,
//! category names, and recent history entries. Everything is plain data,
//! already rendered to the strings the prompt needs (priority as lowercase
//! text, timestamps as RFC 3339).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::llm::MessageRole;

/// An open task reduced to the fields the prompt renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
    pub title: String,
    /// Priority as lowercase text ("low"/"medium"/"high").
    pub priority: String,
    pub category: Option<String>,
    /// Due timestamp as an RFC 3339 string.
    pub due_date: Option<String>,
}

/// A user's current task/category state for context injection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    pub tasks: Vec<TaskSummary>,
    /// Category names only.
    pub categories: Vec<String>,
}

impl UserContext {
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty() && self.categories.is_empty()
    }
}

/// One entry of recent conversation history, in chronological order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: MessageRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}
