use thiserror::Error;

/// Errors from repository operations (used by trait definitions in taskdeck-core).
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database connection error")]
    Connection,

    #[error("query error: {0}")]
    Query(String),

    #[error("entity not found")]
    NotFound,
}

/// Errors surfaced by the assistant pipeline's entry points.
///
/// `ConversationNotFound` and `NotConversationOwner` propagate before any
/// persistence mutation; everything past the ownership check is either
/// recovered locally or folded into a fallback reply.
#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("conversation not found")]
    ConversationNotFound,

    #[error("not authorized to access this conversation")]
    NotConversationOwner,

    #[error("invalid message role: '{0}'")]
    InvalidRole(String),

    #[error("message content exceeds {max} characters")]
    ContentTooLong { max: usize },

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
