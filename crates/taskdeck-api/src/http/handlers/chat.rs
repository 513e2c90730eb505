//! Streaming chat passthrough endpoint.
//!
//! POST /api/chat
//!
//! Forwards the caller's messages to the completion client with streaming
//! enabled and relays the reply as newline-delimited JSON frames, one
//! [`ChatStreamFrame`] per line. Tool call proposals (`create_task`,
//! `refresh_dashboard`) are surfaced to the caller for client-side
//! execution, never executed here.
//!
//! This path bypasses the orchestrator: nothing is persisted and no
//! fallback text is produced. A mid-stream provider failure ends the
//! stream after the frames already sent.

use std::convert::Infallible;

use axum::Json;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use futures_util::StreamExt;
use serde::Deserialize;
use tracing::error;

use taskdeck_core::llm::CompletionClient;
use taskdeck_types::llm::{
    ChatStreamFrame, CompletionRequest, PromptMessage, StreamEvent, ToolDefinition,
};

use crate::http::error::AppError;
use crate::http::extractors::auth::RequestUser;
use crate::state::AppState;

const CHAT_TEMPERATURE: f64 = 0.7;
const CHAT_MAX_TOKENS: u32 = 1000;

/// Request body for the streaming chat endpoint.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<PromptMessage>,
}

/// Tool definitions offered to the model on the passthrough path.
fn chat_tools() -> Vec<ToolDefinition> {
    vec![
        ToolDefinition {
            name: "create_task".to_string(),
            description: "Create a new task for the user".to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {
                    "title": { "type": "string", "description": "Task title" },
                    "description": { "type": "string", "description": "Optional details" },
                    "priority": {
                        "type": "string",
                        "enum": ["low", "medium", "high"],
                        "description": "Task priority"
                    },
                    "category": { "type": "string", "description": "Category name" },
                    "due_date": {
                        "type": "string",
                        "format": "date-time",
                        "description": "Due date, RFC 3339"
                    }
                },
                "required": ["title"]
            }),
        },
        ToolDefinition {
            name: "refresh_dashboard".to_string(),
            description: "Ask the client to reload its task dashboard".to_string(),
            parameters: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
        },
    ]
}

/// POST /api/chat - Streaming chat passthrough (NDJSON).
pub async fn stream_chat(
    State(state): State<AppState>,
    RequestUser(_user): RequestUser,
    Json(body): Json<ChatRequest>,
) -> Result<Response, AppError> {
    if body.messages.is_empty() {
        return Err(AppError::Validation("messages must not be empty".to_string()));
    }

    let request = CompletionRequest {
        model: state.chat_model.clone(),
        messages: body.messages,
        temperature: Some(CHAT_TEMPERATURE),
        max_tokens: CHAT_MAX_TOKENS,
        stream: true,
        tools: chat_tools(),
    };

    let llm_stream = state.completion_client.stream(request);

    let ndjson_stream = async_stream::stream! {
        let mut llm_stream = llm_stream;

        while let Some(event_result) = llm_stream.next().await {
            let frame = match event_result {
                Ok(StreamEvent::TextDelta { text }) => Some(ChatStreamFrame::Text { text }),
                Ok(StreamEvent::ToolCall { id, name, arguments }) => {
                    Some(ChatStreamFrame::ToolCall { id, name, arguments })
                }
                Ok(StreamEvent::Done) => break,
                Err(e) => {
                    error!(error = %e, "Chat passthrough stream failed");
                    break;
                }
            };

            if let Some(frame) = frame {
                match serde_json::to_string(&frame) {
                    Ok(mut line) => {
                        line.push('\n');
                        yield Ok::<_, Infallible>(Bytes::from(line));
                    }
                    Err(e) => {
                        error!(error = %e, "Failed to serialize stream frame");
                        break;
                    }
                }
            }
        }
    };

    let response = (
        [(CONTENT_TYPE, "application/x-ndjson")],
        Body::from_stream(ndjson_stream),
    )
        .into_response();

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_tools_shapes() {
        let tools = chat_tools();
        assert_eq!(tools.len(), 2);
        assert_eq!(tools[0].name, "create_task");
        assert_eq!(tools[1].name, "refresh_dashboard");

        let required = &tools[0].parameters["required"];
        assert_eq!(required, &serde_json::json!(["title"]));
        assert!(tools[1].parameters["properties"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_frame_line_is_single_line_json() {
        let frame = ChatStreamFrame::Text {
            text: "hello\nworld".to_string(),
        };
        let line = serde_json::to_string(&frame).unwrap();
        assert!(!line.contains('\n'));
        let parsed: ChatStreamFrame = serde_json::from_str(&line).unwrap();
        assert!(matches!(parsed, ChatStreamFrame::Text { .. }));
    }
}
