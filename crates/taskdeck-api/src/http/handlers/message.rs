//! Message HTTP handlers, including the assistant orchestration endpoint.
//!
//! Endpoints:
//! - POST /api/messages                       - Create a message (orchestrates on role "user")
//! - GET  /api/messages?conversation_id={id}  - Chronological listing
//! - GET  /api/messages/{id}                  - Single message

use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use taskdeck_core::assistant::verify_conversation_owner;
use taskdeck_core::repository::ChatRepository;
use taskdeck_types::chat::{MAX_MESSAGE_CONTENT_CHARS, Message, MessageRole};
use taskdeck_types::error::AssistantError;

use crate::http::error::AppError;
use crate::http::extractors::auth::RequestUser;
use crate::state::AppState;

/// Request body for message creation.
#[derive(Debug, Deserialize)]
pub struct CreateMessageRequest {
    pub conversation_id: Uuid,
    pub role: String,
    pub content: String,
}

/// Response for message creation.
///
/// `persisted` is false only when the assistant reply is a transient
/// fallback: the user message was stored, the reply text was not.
#[derive(Debug, Serialize)]
pub struct CreateMessageResponse {
    #[serde(flatten)]
    pub message: Message,
    pub persisted: bool,
}

/// Parse and bound-check the request before any write happens.
fn validate_request(body: &CreateMessageRequest) -> Result<MessageRole, AssistantError> {
    let role: MessageRole = body
        .role
        .parse()
        .map_err(|_| AssistantError::InvalidRole(body.role.clone()))?;

    // System entries exist only inside prompt construction.
    if role == MessageRole::System {
        return Err(AssistantError::InvalidRole(body.role.clone()));
    }

    if body.content.chars().count() > MAX_MESSAGE_CONTENT_CHARS {
        return Err(AssistantError::ContentTooLong {
            max: MAX_MESSAGE_CONTENT_CHARS,
        });
    }

    Ok(role)
}

/// POST /api/messages - Create a message.
///
/// Ownership and validation run before any persistence, so a rejected
/// request leaves no partial writes. A "user" message runs the assistant
/// pipeline and returns the assistant's reply; an "assistant" message is
/// stored as-is.
pub async fn create_message(
    State(state): State<AppState>,
    RequestUser(user): RequestUser,
    Json(body): Json<CreateMessageRequest>,
) -> Result<(StatusCode, Json<CreateMessageResponse>), AppError> {
    verify_conversation_owner(state.chat_repo.as_ref(), &body.conversation_id, &user.id).await?;
    let role = validate_request(&body).map_err(AppError::Assistant)?;

    match role {
        MessageRole::User => {
            let reply = state
                .assistant
                .process_message(user.id, body.conversation_id, body.content)
                .await?;

            Ok((
                StatusCode::CREATED,
                Json(CreateMessageResponse {
                    message: reply.message,
                    persisted: reply.persisted,
                }),
            ))
        }
        MessageRole::Assistant => {
            let message = Message {
                id: Uuid::now_v7(),
                conversation_id: body.conversation_id,
                user_id: user.id,
                role: MessageRole::Assistant,
                content: body.content,
                created_at: Utc::now(),
            };
            state.chat_repo.save_message(&message).await.map_err(|e| {
                AppError::Assistant(AssistantError::Repository(e))
            })?;

            Ok((
                StatusCode::CREATED,
                Json(CreateMessageResponse {
                    message,
                    persisted: true,
                }),
            ))
        }
        MessageRole::System => unreachable!("rejected by validate_request"),
    }
}

/// Query parameters for message listing.
#[derive(Debug, Deserialize)]
pub struct MessageListQuery {
    pub conversation_id: Uuid,
}

/// GET /api/messages?conversation_id={id} - Chronological message listing.
pub async fn list_messages(
    State(state): State<AppState>,
    RequestUser(user): RequestUser,
    Query(query): Query<MessageListQuery>,
) -> Result<Json<Vec<Message>>, AppError> {
    verify_conversation_owner(state.chat_repo.as_ref(), &query.conversation_id, &user.id).await?;

    let messages = state.chat_repo.list_messages(&query.conversation_id).await?;
    Ok(Json(messages))
}

/// GET /api/messages/{id} - Get a single message the acting user can see.
pub async fn get_message(
    State(state): State<AppState>,
    RequestUser(user): RequestUser,
    Path(message_id): Path<Uuid>,
) -> Result<Json<Message>, AppError> {
    let message = state
        .chat_repo
        .get_message(&message_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Message not found".to_string()))?;

    verify_conversation_owner(state.chat_repo.as_ref(), &message.conversation_id, &user.id)
        .await?;

    Ok(Json(message))
}
