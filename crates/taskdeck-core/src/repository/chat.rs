//! ChatRepository trait definition.
//!
//! Conversations and messages. The orchestrator relies on `save_message`
//! committing durably before it returns, and on `recent_messages` being a
//! bounded newest-first read.

use taskdeck_types::chat::{Conversation, Message};
use taskdeck_types::error::RepositoryError;
use uuid::Uuid;

/// Repository trait for conversation and message persistence.
pub trait ChatRepository: Send + Sync {
    /// Create a new conversation.
    fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get a conversation by its unique ID.
    fn get_conversation(
        &self,
        conversation_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Conversation>, RepositoryError>> + Send;

    /// List conversations owned by a user, most recently updated first.
    fn list_conversations(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Conversation>, RepositoryError>> + Send;

    /// Save a new message. Durably committed when this resolves.
    fn save_message(
        &self,
        message: &Message,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Get up to `limit` messages of a conversation, NEWEST first.
    ///
    /// Newest-first bounds the read; callers that need chronological order
    /// reverse the result.
    fn recent_messages(
        &self,
        conversation_id: &Uuid,
        limit: i64,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;

    /// Get all messages of a conversation in chronological order.
    fn list_messages(
        &self,
        conversation_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Message>, RepositoryError>> + Send;

    /// Get a message by its unique ID.
    fn get_message(
        &self,
        message_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Message>, RepositoryError>> + Send;
}
