//! Infrastructure implementations for Taskdeck.
//!
//! Concrete adapters behind the `taskdeck-core` traits: SQLite-backed
//! repositories and the OpenAI completion client.

pub mod config;
pub mod llm;
pub mod sqlite;
