//! Conversation and message types.
//!
//! A conversation groups an ordered sequence of messages for one user.
//! Messages are created by the assistant orchestrator (user message first,
//! assistant reply second) or by the direct assistant-insert path; they are
//! never mutated after creation on the orchestration path.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// Re-export MessageRole from llm (it's used in both chat and llm contexts).
pub use crate::llm::MessageRole;

/// Upper bound on stored message content length, in characters.
pub const MAX_MESSAGE_CONTENT_CHARS: usize = 10_000;

/// A chat conversation owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub title: Option<String>,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A single message within a conversation.
///
/// Messages are totally ordered within a conversation by `created_at`,
/// with the time-sortable UUIDv7 `id` as tiebreaker. Role alternation is
/// not enforced: the direct assistant-insert path can store consecutive
/// assistant messages by design.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: Uuid,
    pub conversation_id: Uuid,
    pub user_id: Uuid,
    pub role: MessageRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}
