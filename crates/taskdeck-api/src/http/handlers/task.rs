//! Task and category HTTP handlers.
//!
//! Endpoints:
//! - POST /api/tasks       - Create a task for the acting user
//! - GET  /api/tasks       - List the acting user's tasks
//! - POST /api/categories  - Create a category
//! - GET  /api/categories  - List categories

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use taskdeck_core::repository::TaskRepository;
use taskdeck_types::task::{Category, Priority, Task};

use crate::http::error::AppError;
use crate::http::extractors::auth::RequestUser;
use crate::state::AppState;

/// Request body for task creation.
#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub due_date: Option<DateTime<Utc>>,
}

/// POST /api/tasks - Create a task.
pub async fn create_task(
    State(state): State<AppState>,
    RequestUser(user): RequestUser,
    Json(body): Json<CreateTaskRequest>,
) -> Result<(StatusCode, Json<Task>), AppError> {
    if body.title.trim().is_empty() {
        return Err(AppError::Validation("Task title must not be empty".to_string()));
    }

    let priority = match body.priority.as_deref() {
        Some(p) => p.parse::<Priority>().map_err(AppError::Validation)?,
        None => Priority::default(),
    };

    let task = Task {
        id: Uuid::now_v7(),
        title: body.title,
        description: body.description,
        priority,
        category: body.category,
        is_completed: false,
        due_date: body.due_date,
        user_id: user.id,
    };

    state.task_repo.create_task(&task).await?;

    Ok((StatusCode::CREATED, Json(task)))
}

/// GET /api/tasks - List the acting user's tasks.
pub async fn list_tasks(
    State(state): State<AppState>,
    RequestUser(user): RequestUser,
) -> Result<Json<Vec<Task>>, AppError> {
    let tasks = state.task_repo.list_tasks(&user.id).await?;
    Ok(Json(tasks))
}

/// Request body for category creation.
#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

/// POST /api/categories - Create a category.
pub async fn create_category(
    State(state): State<AppState>,
    RequestUser(user): RequestUser,
    Json(body): Json<CreateCategoryRequest>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    if body.name.trim().is_empty() {
        return Err(AppError::Validation("Category name must not be empty".to_string()));
    }

    let category = Category {
        id: Uuid::now_v7(),
        name: body.name,
        user_id: user.id,
    };

    state.task_repo.create_category(&category).await?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// GET /api/categories - List the acting user's categories.
pub async fn list_categories(
    State(state): State<AppState>,
    RequestUser(user): RequestUser,
) -> Result<Json<Vec<Category>>, AppError> {
    let categories = state.task_repo.list_categories(&user.id).await?;
    Ok(Json(categories))
}
