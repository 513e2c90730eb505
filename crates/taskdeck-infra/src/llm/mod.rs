//! Completion provider implementations.

pub mod openai;
pub mod streaming;

pub use openai::OpenAiCompletionClient;
