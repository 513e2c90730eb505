//! Application error type mapping to HTTP status codes.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use taskdeck_types::error::{AssistantError, RepositoryError};

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Assistant pipeline errors.
    Assistant(AssistantError),
    /// Persistence errors outside the pipeline.
    Repository(RepositoryError),
    /// Authentication failure (missing or malformed proxy headers).
    Unauthorized(String),
    /// Validation error.
    Validation(String),
    /// Resource not found.
    NotFound(String),
    /// Generic internal error.
    Internal(String),
}

impl From<AssistantError> for AppError {
    fn from(e: AssistantError) -> Self {
        AppError::Assistant(e)
    }
}

impl From<RepositoryError> for AppError {
    fn from(e: RepositoryError) -> Self {
        AppError::Repository(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Assistant(AssistantError::ConversationNotFound) => (
                StatusCode::NOT_FOUND,
                "CONVERSATION_NOT_FOUND",
                "Conversation not found".to_string(),
            ),
            AppError::Assistant(AssistantError::NotConversationOwner) => (
                StatusCode::FORBIDDEN,
                "FORBIDDEN",
                "You do not own this conversation".to_string(),
            ),
            AppError::Assistant(AssistantError::InvalidRole(role)) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                format!("Invalid message role: '{role}'"),
            ),
            AppError::Assistant(AssistantError::ContentTooLong { max }) => (
                StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                format!("Message content exceeds {max} characters"),
            ),
            AppError::Assistant(AssistantError::Repository(e)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                e.to_string(),
            ),
            AppError::Repository(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "STORAGE_ERROR",
                e.to_string(),
            ),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Internal(msg) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", msg.clone())
            }
        };

        let body = json!({
            "error": {
                "code": code,
                "message": message,
            }
        });

        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body.to_string(),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversation_not_found_is_404() {
        let resp = AppError::Assistant(AssistantError::ConversationNotFound).into_response();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_not_owner_is_403() {
        let resp = AppError::Assistant(AssistantError::NotConversationOwner).into_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn test_invalid_role_is_400() {
        let resp =
            AppError::Assistant(AssistantError::InvalidRole("robot".to_string())).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_content_too_long_is_400() {
        let resp =
            AppError::Assistant(AssistantError::ContentTooLong { max: 10_000 }).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_repository_error_is_500() {
        let resp = AppError::Repository(RepositoryError::Connection).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
