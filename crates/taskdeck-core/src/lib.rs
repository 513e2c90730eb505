//! Business logic for taskdeck.
//!
//! This crate defines the repository traits implemented by taskdeck-infra,
//! the `CompletionClient` abstraction over remote LLM providers, and the
//! assistant pipeline: context assembly, history retrieval, prompt
//! construction, and the message orchestrator. It never depends on
//! taskdeck-infra (clean architecture: dependencies point inward).

pub mod assistant;
pub mod llm;
pub mod repository;
