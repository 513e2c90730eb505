//! SQLite-backed repository implementations.

pub mod chat;
pub mod pool;
pub mod task;
pub mod user;

pub use chat::SqliteChatRepository;
pub use pool::DatabasePool;
pub use task::SqliteTaskRepository;
pub use user::SqliteUserRepository;
