//! Repository trait definitions.
//!
//! Implementations live in taskdeck-infra (SQLite over sqlx). All traits
//! use native async fn in traits (RPITIT, Rust 2024 edition).

pub mod chat;
pub mod task;
pub mod user;

pub use chat::ChatRepository;
pub use task::TaskRepository;
pub use user::UserRepository;
