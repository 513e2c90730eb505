//! LLM request/response types.
//!
//! These model the contract taskdeck expects from a completion provider:
//! role-tagged prompt messages, completion requests/responses, streaming
//! events, tool definitions for the chat passthrough, and the classified
//! error taxonomy the orchestrator's fallback handling is built on.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role of a message in an LLM conversation.
///
/// Stored messages only ever carry `User` or `Assistant`; `System` exists
/// for prompt construction and is rejected by the message-create endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageRole::System => write!(f, "system"),
            MessageRole::User => write!(f, "user"),
            MessageRole::Assistant => write!(f, "assistant"),
        }
    }
}

impl FromStr for MessageRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "system" => Ok(MessageRole::System),
            "user" => Ok(MessageRole::User),
            "assistant" => Ok(MessageRole::Assistant),
            other => Err(format!("invalid message role: '{other}'")),
        }
    }
}

/// A single role-tagged entry in a prompt sequence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: MessageRole,
    pub content: String,
}

/// A tool the model may propose calling (never executed server-side).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    /// JSON Schema for the tool's arguments.
    pub parameters: serde_json::Value,
}

/// Request to a completion provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<PromptMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    pub max_tokens: u32,
    #[serde(default)]
    pub stream: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<ToolDefinition>,
}

/// Response from a completion provider for a non-streaming request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionResponse {
    pub id: String,
    pub content: String,
    pub model: String,
}

/// Events emitted during a streaming completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// A delta of text content.
    TextDelta { text: String },

    /// A tool call proposal, fully assembled from its fragments.
    ToolCall {
        id: String,
        name: String,
        arguments: serde_json::Value,
    },

    /// The stream has completed.
    Done,
}

/// One frame of the chat passthrough wire format, serialized one-per-line
/// as newline-delimited JSON.
///
/// A typed discriminated union instead of ad hoc numeric line prefixes, so
/// the wire format is independent of any frontend SDK convention.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChatStreamFrame {
    Text {
        text: String,
    },
    ToolCall {
        id: String,
        name: String,
        arguments: serde_json::Value,
    },
}

/// Errors from completion provider operations.
///
/// The variants are the orchestrator's failure classes: each maps to a
/// fixed user-safe fallback string, with identical non-persistence effect.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("authentication failed")]
    AuthenticationFailed,

    #[error("rate limited (retry after {retry_after_ms:?}ms)")]
    RateLimited { retry_after_ms: Option<u64> },

    #[error("connection error: {0}")]
    Connection(String),

    #[error("completion timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },

    #[error("deserialization error: {0}")]
    Deserialization(String),

    #[error("stream error: {0}")]
    Stream(String),

    #[error("provider error: {message}")]
    Provider { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_role_roundtrip() {
        for role in [MessageRole::System, MessageRole::User, MessageRole::Assistant] {
            let s = role.to_string();
            let parsed: MessageRole = s.parse().unwrap();
            assert_eq!(role, parsed);
        }
    }

    #[test]
    fn test_message_role_rejects_unknown() {
        assert!("robot".parse::<MessageRole>().is_err());
    }

    #[test]
    fn test_message_role_serde() {
        let role = MessageRole::Assistant;
        let json = serde_json::to_string(&role).unwrap();
        assert_eq!(json, "\"assistant\"");
        let parsed: MessageRole = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, MessageRole::Assistant);
    }

    #[test]
    fn test_chat_stream_frame_text_wire_shape() {
        let frame = ChatStreamFrame::Text {
            text: "hello".to_string(),
        };
        let json = serde_json::to_string(&frame).unwrap();
        assert_eq!(json, r#"{"kind":"text","text":"hello"}"#);
    }

    #[test]
    fn test_chat_stream_frame_tool_call_wire_shape() {
        let frame = ChatStreamFrame::ToolCall {
            id: "call_1".to_string(),
            name: "create_task".to_string(),
            arguments: serde_json::json!({"title": "Buy milk"}),
        };
        let json = serde_json::to_string(&frame).unwrap();
        assert!(json.starts_with(r#"{"kind":"tool_call""#));
        assert!(json.contains("\"name\":\"create_task\""));
    }

    #[test]
    fn test_llm_error_display() {
        let err = LlmError::Timeout { elapsed_ms: 60_000 };
        assert!(err.to_string().contains("60000"));
    }
}
