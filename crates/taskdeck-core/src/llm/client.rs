//! CompletionClient trait definition.
//!
//! The abstraction over remote completion providers. Constructed once at
//! process start and injected into the orchestrator and the chat
//! passthrough; never reconstructed per call.

use std::pin::Pin;

use futures_util::Stream;

use taskdeck_types::llm::{CompletionRequest, CompletionResponse, LlmError, StreamEvent};

/// Trait for completion provider backends.
///
/// Uses native async fn in traits (RPITIT) for `complete`. The `stream`
/// method returns a boxed stream so the events can outlive the borrow of
/// the client inside handler-spawned response bodies.
pub trait CompletionClient: Send + Sync {
    /// Human-readable provider name (e.g., "openai").
    fn name(&self) -> &str;

    /// Send a completion request and receive the full response.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;

    /// Send a streaming completion request. Returns a stream of events.
    fn stream(
        &self,
        request: CompletionRequest,
    ) -> Pin<Box<dyn Stream<Item = Result<StreamEvent, LlmError>> + Send + 'static>>;
}
