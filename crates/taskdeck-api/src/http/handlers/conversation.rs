//! Conversation HTTP handlers.
//!
//! Endpoints:
//! - POST /api/conversations      - Start a conversation
//! - GET  /api/conversations      - List the acting user's conversations
//! - GET  /api/conversations/{id} - Get a single conversation (owner only)

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use taskdeck_core::assistant::verify_conversation_owner;
use taskdeck_core::repository::ChatRepository;
use taskdeck_types::chat::Conversation;

use crate::http::error::AppError;
use crate::http::extractors::auth::RequestUser;
use crate::state::AppState;

/// Request body for conversation creation.
#[derive(Debug, Deserialize)]
pub struct CreateConversationRequest {
    pub title: Option<String>,
}

/// POST /api/conversations - Start a new conversation.
pub async fn create_conversation(
    State(state): State<AppState>,
    RequestUser(user): RequestUser,
    Json(body): Json<CreateConversationRequest>,
) -> Result<(StatusCode, Json<Conversation>), AppError> {
    let now = Utc::now();
    let conversation = Conversation {
        id: Uuid::now_v7(),
        title: body.title,
        user_id: user.id,
        created_at: now,
        updated_at: now,
    };

    state.chat_repo.create_conversation(&conversation).await?;

    Ok((StatusCode::CREATED, Json(conversation)))
}

/// GET /api/conversations - List the acting user's conversations, most
/// recently active first.
pub async fn list_conversations(
    State(state): State<AppState>,
    RequestUser(user): RequestUser,
) -> Result<Json<Vec<Conversation>>, AppError> {
    let conversations = state.chat_repo.list_conversations(&user.id).await?;
    Ok(Json(conversations))
}

/// GET /api/conversations/{id} - Get a conversation the acting user owns.
pub async fn get_conversation(
    State(state): State<AppState>,
    RequestUser(user): RequestUser,
    Path(conversation_id): Path<Uuid>,
) -> Result<Json<Conversation>, AppError> {
    let conversation =
        verify_conversation_owner(state.chat_repo.as_ref(), &conversation_id, &user.id).await?;
    Ok(Json(conversation))
}
