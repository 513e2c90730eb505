//! History retrieval: the most recent messages of a conversation, returned
//! in chronological order for prompt rendering.

use uuid::Uuid;

use taskdeck_types::context::HistoryEntry;
use taskdeck_types::error::RepositoryError;

use crate::repository::ChatRepository;

/// How many messages of history are injected into the prompt.
pub const HISTORY_LIMIT: i64 = 10;

/// Retrieve the last [`HISTORY_LIMIT`] messages of a conversation, oldest
/// first.
///
/// The repository read is newest-first to bound the scan; the result is
/// reversed before returning because downstream prompt rendering assumes
/// chronological order. No authorization check happens here: the caller
/// must already have verified the acting user owns the conversation.
pub async fn recent_history<R: ChatRepository>(
    repo: &R,
    conversation_id: &Uuid,
) -> Result<Vec<HistoryEntry>, RepositoryError> {
    let mut messages = repo.recent_messages(conversation_id, HISTORY_LIMIT).await?;
    messages.reverse();

    Ok(messages
        .into_iter()
        .map(|m| HistoryEntry {
            role: m.role,
            content: m.content,
            timestamp: m.created_at,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    use taskdeck_types::chat::{Message, MessageRole};

    use super::*;
    use crate::assistant::test_support::FakeChatRepository;

    fn seed_messages(repo: &FakeChatRepository, conversation_id: Uuid, count: usize) {
        let user_id = Uuid::now_v7();
        let base = Utc::now();
        let mut messages = repo.messages.lock().unwrap();
        for i in 0..count {
            messages.push(Message {
                id: Uuid::now_v7(),
                conversation_id,
                user_id,
                role: if i % 2 == 0 {
                    MessageRole::User
                } else {
                    MessageRole::Assistant
                },
                content: format!("message {}", i + 1),
                created_at: base + Duration::seconds(i as i64),
            });
        }
    }

    #[tokio::test]
    async fn test_returns_latest_ten_in_chronological_order() {
        let conversation_id = Uuid::now_v7();
        let repo = FakeChatRepository::default();
        seed_messages(&repo, conversation_id, 12);

        let history = recent_history(&repo, &conversation_id).await.unwrap();

        // Messages 3..=12 (the latest 10), oldest first.
        assert_eq!(history.len(), 10);
        assert_eq!(history[0].content, "message 3");
        assert_eq!(history[9].content, "message 12");
        for pair in history.windows(2) {
            assert!(pair[0].timestamp < pair[1].timestamp);
        }
    }

    #[tokio::test]
    async fn test_short_conversation_returned_whole() {
        let conversation_id = Uuid::now_v7();
        let repo = FakeChatRepository::default();
        seed_messages(&repo, conversation_id, 3);

        let history = recent_history(&repo, &conversation_id).await.unwrap();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].content, "message 1");
    }

    #[tokio::test]
    async fn test_empty_conversation() {
        let repo = FakeChatRepository::default();
        let history = recent_history(&repo, &Uuid::now_v7()).await.unwrap();
        assert!(history.is_empty());
    }
}
