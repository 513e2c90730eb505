//! Context assembly: the user's open tasks and categories, reduced to the
//! shape the prompt builder renders.

use tracing::debug;
use uuid::Uuid;

use taskdeck_types::context::{TaskSummary, UserContext};
use taskdeck_types::error::RepositoryError;

use crate::repository::TaskRepository;

/// Gather a user's current task/category state for prompt injection.
///
/// Reads every incomplete task and every category owned by the user. No
/// pagination: task and category counts are expected to be small. Read-only;
/// a failed read propagates to the caller (the orchestrator decides whether
/// to degrade).
pub async fn gather_user_context<R: TaskRepository>(
    repo: &R,
    user_id: &Uuid,
) -> Result<UserContext, RepositoryError> {
    let tasks = repo.list_open_tasks(user_id).await?;
    let categories = repo.list_categories(user_id).await?;

    let context = UserContext {
        tasks: tasks
            .into_iter()
            .map(|task| TaskSummary {
                title: task.title,
                priority: task.priority.to_string(),
                category: task.category,
                due_date: task.due_date.map(|d| d.to_rfc3339()),
            })
            .collect(),
        categories: categories.into_iter().map(|c| c.name).collect(),
    };

    debug!(
        user_id = %user_id,
        open_tasks = context.tasks.len(),
        categories = context.categories.len(),
        "Assembled user context"
    );

    Ok(context)
}
