//! The assistant pipeline: context assembly, history retrieval, prompt
//! construction, and the message orchestrator.
//!
//! Control flow for one chat turn: persist the inbound user message, gather
//! the user's task/category state and recent history, build the prompt,
//! call the completion client, and persist the reply. Only the user-message
//! write is a durable checkpoint; every later step degrades or falls back
//! without losing it.

pub mod context;
pub mod history;
pub mod orchestrator;
pub mod prompt;

pub use orchestrator::{AssistantReply, AssistantService, verify_conversation_owner};
