//! The message orchestrator.
//!
//! Sequences one chat turn: persist the user message, gather context and
//! history, build the prompt, call the completion client, persist the
//! assistant reply. The user-message write is the only durable checkpoint;
//! a remote-API outage must never lose the user's input.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{error, info, warn};
use uuid::Uuid;

use taskdeck_types::chat::{Conversation, Message, MessageRole};
use taskdeck_types::context::UserContext;
use taskdeck_types::error::AssistantError;
use taskdeck_types::llm::{CompletionRequest, LlmError};

use crate::assistant::context::gather_user_context;
use crate::assistant::history::recent_history;
use crate::assistant::prompt::{SYSTEM_PROMPT, build_prompt};
use crate::llm::CompletionClient;
use crate::repository::{ChatRepository, TaskRepository};

/// Model used for orchestrated completions.
pub const COMPLETION_MODEL: &str = "gpt-4o";

/// Sampling temperature for orchestrated completions.
pub const COMPLETION_TEMPERATURE: f64 = 0.7;

/// Output-length bound for orchestrated completions.
pub const COMPLETION_MAX_TOKENS: u32 = 1000;

/// How long to wait on the remote completion call before giving up.
pub const COMPLETION_TIMEOUT: Duration = Duration::from_secs(60);

/// Fixed user-safe fallback replies, one per completion failure class.
/// The class distinction exists for logging; the external effect (no
/// assistant message written) is identical.
pub const AUTH_FALLBACK: &str =
    "Sorry, there's an issue with the AI service configuration. Your message has been saved.";
pub const RATE_LIMIT_FALLBACK: &str =
    "The AI service is temporarily busy. Your message has been saved and will be processed shortly.";
pub const CONNECTIVITY_FALLBACK: &str =
    "Unable to reach the AI service. Your message has been saved.";
pub const TIMEOUT_FALLBACK: &str =
    "The AI service took too long to respond. Your message has been saved.";
pub const GENERIC_FALLBACK: &str =
    "An unexpected error occurred. Your message has been saved and we're looking into it.";

/// The orchestrator's result for one chat turn.
///
/// On completion success, `message` is the persisted assistant record. On
/// a classified completion failure, `message` is a transient record
/// carrying the fallback text and `persisted` is false: nothing beyond the
/// user message was written.
#[derive(Debug, Clone)]
pub struct AssistantReply {
    pub message: Message,
    pub persisted: bool,
}

/// Verify a conversation exists and is owned by the acting user.
///
/// Runs before any orchestration step, so invalid requests never cause a
/// partial write. Not-found and ownership failures propagate untouched.
pub async fn verify_conversation_owner<C: ChatRepository>(
    repo: &C,
    conversation_id: &Uuid,
    user_id: &Uuid,
) -> Result<Conversation, AssistantError> {
    let conversation = repo
        .get_conversation(conversation_id)
        .await?
        .ok_or(AssistantError::ConversationNotFound)?;

    if conversation.user_id != *user_id {
        return Err(AssistantError::NotConversationOwner);
    }

    Ok(conversation)
}

/// Orchestrates the assistant pipeline for chat turns.
///
/// Generic over the repositories and the completion client so the pipeline
/// can be exercised against in-memory fakes. The client is injected once
/// at construction and shared; it is never rebuilt per call.
pub struct AssistantService<T, C, L>
where
    T: TaskRepository,
    C: ChatRepository,
    L: CompletionClient,
{
    task_repo: T,
    chat_repo: C,
    client: Arc<L>,
    /// Per-conversation write locks. Concurrent turns against the same
    /// conversation serialize here so the user/assistant message pair is
    /// never interleaved with another turn's pair.
    conversation_locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

impl<T, C, L> AssistantService<T, C, L>
where
    T: TaskRepository,
    C: ChatRepository,
    L: CompletionClient,
{
    pub fn new(task_repo: T, chat_repo: C, client: Arc<L>) -> Self {
        Self {
            task_repo,
            chat_repo,
            client,
            conversation_locks: DashMap::new(),
        }
    }

    /// Access the chat repository.
    pub fn chat_repo(&self) -> &C {
        &self.chat_repo
    }

    fn conversation_lock(&self, conversation_id: Uuid) -> Arc<Mutex<()>> {
        self.conversation_locks
            .entry(conversation_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Run one chat turn.
    ///
    /// Preconditions: the caller has verified the acting user owns the
    /// conversation (see [`verify_conversation_owner`]). Errors out of this
    /// method only for a failed user-message write; every later failure is
    /// degraded or folded into a fallback reply.
    pub async fn process_message(
        &self,
        user_id: Uuid,
        conversation_id: Uuid,
        user_message_content: String,
    ) -> Result<AssistantReply, AssistantError> {
        let result = {
            let lock = self.conversation_lock(conversation_id);
            let _guard = lock.lock().await;
            self.run_turn(user_id, conversation_id, user_message_content)
                .await
        };

        // Evict the lock entry unless another turn still holds a clone,
        // so the map does not accumulate an entry per conversation.
        self.conversation_locks
            .remove_if(&conversation_id, |_, lock| Arc::strong_count(lock) == 1);

        result
    }

    async fn run_turn(
        &self,
        user_id: Uuid,
        conversation_id: Uuid,
        user_message_content: String,
    ) -> Result<AssistantReply, AssistantError> {
        // Step 1: persist the user message durably before any remote call.
        let user_message = Message {
            id: Uuid::now_v7(),
            conversation_id,
            user_id,
            role: MessageRole::User,
            content: user_message_content.clone(),
            created_at: chrono::Utc::now(),
        };
        self.chat_repo.save_message(&user_message).await?;

        // Step 2: gather context and history. A failed read degrades to
        // empty rather than aborting the turn.
        let context = match gather_user_context(&self.task_repo, &user_id).await {
            Ok(ctx) => ctx,
            Err(e) => {
                warn!(user_id = %user_id, error = %e, "Context gathering failed, degrading to empty");
                UserContext::default()
            }
        };
        let history = match recent_history(&self.chat_repo, &conversation_id).await {
            Ok(h) => h,
            Err(e) => {
                warn!(conversation_id = %conversation_id, error = %e, "History retrieval failed, degrading to empty");
                Vec::new()
            }
        };

        // Step 3: build the prompt.
        let messages = build_prompt(SYSTEM_PROMPT, &context, &history, &user_message_content);

        // Step 4: call the completion client under a bounded timeout.
        let request = CompletionRequest {
            model: COMPLETION_MODEL.to_string(),
            messages,
            temperature: Some(COMPLETION_TEMPERATURE),
            max_tokens: COMPLETION_MAX_TOKENS,
            stream: false,
            tools: Vec::new(),
        };

        let result = match tokio::time::timeout(COMPLETION_TIMEOUT, self.client.complete(&request))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(LlmError::Timeout {
                elapsed_ms: COMPLETION_TIMEOUT.as_millis() as u64,
            }),
        };

        match result {
            Ok(response) => {
                // Step 5: persist the assistant reply.
                let assistant_message = Message {
                    id: Uuid::now_v7(),
                    conversation_id,
                    user_id,
                    role: MessageRole::Assistant,
                    content: response.content,
                    created_at: chrono::Utc::now(),
                };
                self.chat_repo.save_message(&assistant_message).await?;

                info!(
                    conversation_id = %conversation_id,
                    provider = self.client.name(),
                    model = %response.model,
                    "Assistant reply persisted"
                );

                Ok(AssistantReply {
                    message: assistant_message,
                    persisted: true,
                })
            }
            Err(e) => {
                // Step 6: classified failure. The user message stays durable;
                // no assistant message is written.
                error!(
                    conversation_id = %conversation_id,
                    provider = self.client.name(),
                    error = %e,
                    "Completion failed, returning fallback reply"
                );

                let fallback = Message {
                    id: Uuid::now_v7(),
                    conversation_id,
                    user_id,
                    role: MessageRole::Assistant,
                    content: fallback_for(&e).to_string(),
                    created_at: chrono::Utc::now(),
                };

                Ok(AssistantReply {
                    message: fallback,
                    persisted: false,
                })
            }
        }
    }
}

/// Map a completion failure class to its fixed fallback string.
pub fn fallback_for(error: &LlmError) -> &'static str {
    match error {
        LlmError::AuthenticationFailed => AUTH_FALLBACK,
        LlmError::RateLimited { .. } => RATE_LIMIT_FALLBACK,
        LlmError::Connection(_) => CONNECTIVITY_FALLBACK,
        LlmError::Timeout { .. } => TIMEOUT_FALLBACK,
        LlmError::Deserialization(_) | LlmError::Stream(_) | LlmError::Provider { .. } => {
            GENERIC_FALLBACK
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::test_support::{
        FakeChatRepository, FakeCompletionClient, FakeOutcome, FakeTaskRepository,
    };

    fn service(
        chat_repo: FakeChatRepository,
        outcome: FakeOutcome,
    ) -> AssistantService<FakeTaskRepository, FakeChatRepository, FakeCompletionClient> {
        AssistantService::new(
            FakeTaskRepository::default(),
            chat_repo,
            Arc::new(FakeCompletionClient { outcome }),
        )
    }

    #[tokio::test]
    async fn test_successful_turn_persists_both_messages_in_order() {
        let user_id = Uuid::now_v7();
        let conversation_id = Uuid::now_v7();
        let chat_repo = FakeChatRepository::with_conversation(user_id, conversation_id);
        let svc = service(chat_repo, FakeOutcome::Reply("Here is your plan".to_string()));

        let reply = svc
            .process_message(user_id, conversation_id, "Plan my day".to_string())
            .await
            .unwrap();

        assert!(reply.persisted);
        assert_eq!(reply.message.content, "Here is your plan");
        assert_eq!(reply.message.role, MessageRole::Assistant);

        let stored = svc.chat_repo().stored_messages();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].role, MessageRole::User);
        assert_eq!(stored[0].content, "Plan my day");
        assert_eq!(stored[1].role, MessageRole::Assistant);
        assert_eq!(stored[1].content, "Here is your plan");
    }

    #[tokio::test]
    async fn test_rate_limit_failure_keeps_user_message_only() {
        let user_id = Uuid::now_v7();
        let conversation_id = Uuid::now_v7();
        let chat_repo = FakeChatRepository::with_conversation(user_id, conversation_id);
        let svc = service(
            chat_repo,
            FakeOutcome::Fail(|| LlmError::RateLimited {
                retry_after_ms: None,
            }),
        );

        let reply = svc
            .process_message(user_id, conversation_id, "Plan my day".to_string())
            .await
            .unwrap();

        assert!(!reply.persisted);
        assert_eq!(reply.message.content, RATE_LIMIT_FALLBACK);

        let stored = svc.chat_repo().stored_messages();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].role, MessageRole::User);
        assert_eq!(stored[0].content, "Plan my day");
    }

    #[tokio::test]
    async fn test_auth_failure_fallback() {
        let user_id = Uuid::now_v7();
        let conversation_id = Uuid::now_v7();
        let chat_repo = FakeChatRepository::with_conversation(user_id, conversation_id);
        let svc = service(chat_repo, FakeOutcome::Fail(|| LlmError::AuthenticationFailed));

        let reply = svc
            .process_message(user_id, conversation_id, "hi".to_string())
            .await
            .unwrap();

        assert_eq!(reply.message.content, AUTH_FALLBACK);
        assert_eq!(svc.chat_repo().stored_messages().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_completion_hits_timeout_fallback() {
        let user_id = Uuid::now_v7();
        let conversation_id = Uuid::now_v7();
        let chat_repo = FakeChatRepository::with_conversation(user_id, conversation_id);
        let svc = service(
            chat_repo,
            FakeOutcome::Slow(Duration::from_secs(120), "too late".to_string()),
        );

        let reply = svc
            .process_message(user_id, conversation_id, "hi".to_string())
            .await
            .unwrap();

        assert!(!reply.persisted);
        assert_eq!(reply.message.content, TIMEOUT_FALLBACK);
        assert_eq!(svc.chat_repo().stored_messages().len(), 1);
    }

    #[tokio::test]
    async fn test_context_gathering_failure_degrades_not_fatal() {
        let user_id = Uuid::now_v7();
        let conversation_id = Uuid::now_v7();
        let chat_repo = FakeChatRepository::with_conversation(user_id, conversation_id);
        let svc = AssistantService::new(
            FakeTaskRepository {
                fail_reads: true,
                ..Default::default()
            },
            chat_repo,
            Arc::new(FakeCompletionClient {
                outcome: FakeOutcome::Reply("still works".to_string()),
            }),
        );

        let reply = svc
            .process_message(user_id, conversation_id, "hi".to_string())
            .await
            .unwrap();

        assert!(reply.persisted);
        assert_eq!(reply.message.content, "still works");
        assert_eq!(svc.chat_repo().stored_messages().len(), 2);
    }

    #[tokio::test]
    async fn test_lock_map_does_not_retain_completed_conversations() {
        let user_id = Uuid::now_v7();
        let conversation_ids: Vec<Uuid> = (0..100).map(|_| Uuid::now_v7()).collect();
        let chat_repo = FakeChatRepository::with_conversations(user_id, &conversation_ids);
        let svc = service(chat_repo, FakeOutcome::Reply("ok".to_string()));

        for id in &conversation_ids {
            svc.process_message(user_id, *id, "hi".to_string())
                .await
                .unwrap();
        }

        assert!(svc.conversation_locks.is_empty());
    }

    #[tokio::test]
    async fn test_lock_map_evicted_after_failed_turn() {
        let user_id = Uuid::now_v7();
        let conversation_id = Uuid::now_v7();
        let chat_repo = FakeChatRepository::with_conversation(user_id, conversation_id);
        let svc = service(chat_repo, FakeOutcome::Fail(|| LlmError::AuthenticationFailed));

        svc.process_message(user_id, conversation_id, "hi".to_string())
            .await
            .unwrap();

        assert!(svc.conversation_locks.is_empty());
    }

    #[tokio::test]
    async fn test_verify_owner_not_found() {
        let repo = FakeChatRepository::default();
        let result = verify_conversation_owner(&repo, &Uuid::now_v7(), &Uuid::now_v7()).await;
        assert!(matches!(result, Err(AssistantError::ConversationNotFound)));
    }

    #[tokio::test]
    async fn test_verify_owner_rejects_other_user() {
        let owner = Uuid::now_v7();
        let conversation_id = Uuid::now_v7();
        let repo = FakeChatRepository::with_conversation(owner, conversation_id);

        let stranger = Uuid::now_v7();
        let result = verify_conversation_owner(&repo, &conversation_id, &stranger).await;
        assert!(matches!(result, Err(AssistantError::NotConversationOwner)));

        let ok = verify_conversation_owner(&repo, &conversation_id, &owner).await;
        assert!(ok.is_ok());
    }

    #[test]
    fn test_fallback_classification() {
        assert_eq!(fallback_for(&LlmError::AuthenticationFailed), AUTH_FALLBACK);
        assert_eq!(
            fallback_for(&LlmError::RateLimited { retry_after_ms: Some(100) }),
            RATE_LIMIT_FALLBACK
        );
        assert_eq!(
            fallback_for(&LlmError::Connection("refused".to_string())),
            CONNECTIVITY_FALLBACK
        );
        assert_eq!(
            fallback_for(&LlmError::Timeout { elapsed_ms: 60_000 }),
            TIMEOUT_FALLBACK
        );
        assert_eq!(
            fallback_for(&LlmError::Provider {
                message: "boom".to_string()
            }),
            GENERIC_FALLBACK
        );
    }
}
