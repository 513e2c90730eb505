//! Shared domain types for taskdeck.
//!
//! This crate holds the data shapes used across core, infra, and api:
//! users, tasks, categories, conversations, messages, prompt-context views,
//! LLM request/response types, and the shared error enums. No business
//! logic lives here.

pub mod chat;
pub mod context;
pub mod error;
pub mod llm;
pub mod task;
pub mod user;
