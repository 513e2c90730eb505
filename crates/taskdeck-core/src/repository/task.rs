//! TaskRepository trait definition.

use taskdeck_types::error::RepositoryError;
use taskdeck_types::task::{Category, Task};
use uuid::Uuid;

/// Repository trait for task and category persistence.
///
/// The context assembler only reads (`list_open_tasks`, `list_categories`);
/// the create operations back the CRUD surface.
pub trait TaskRepository: Send + Sync {
    /// Persist a new task.
    fn create_task(
        &self,
        task: &Task,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// List all tasks owned by a user.
    fn list_tasks(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Task>, RepositoryError>> + Send;

    /// List tasks owned by a user with `is_completed = false`.
    fn list_open_tasks(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Task>, RepositoryError>> + Send;

    /// Persist a new category.
    fn create_category(
        &self,
        category: &Category,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// List all categories owned by a user (no status filter).
    fn list_categories(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Category>, RepositoryError>> + Send;
}
