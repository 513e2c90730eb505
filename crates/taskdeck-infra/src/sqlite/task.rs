//! SQLite task/category repository implementation.
//!
//! Implements `TaskRepository` from `taskdeck-core` using sqlx with split
//! read/write pools: raw queries, private Row structs, writes on the writer
//! pool, reads on the reader pool.

use sqlx::Row;
use uuid::Uuid;

use taskdeck_core::repository::TaskRepository;
use taskdeck_types::error::RepositoryError;
use taskdeck_types::task::{Category, Priority, Task};

use super::pool::DatabasePool;

/// SQLite-backed implementation of `TaskRepository`.
pub struct SqliteTaskRepository {
    pool: DatabasePool,
}

impl SqliteTaskRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct TaskRow {
    id: String,
    title: String,
    description: Option<String>,
    priority: String,
    category: Option<String>,
    is_completed: i64,
    due_date: Option<String>,
    user_id: String,
}

impl TaskRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            title: row.try_get("title")?,
            description: row.try_get("description")?,
            priority: row.try_get("priority")?,
            category: row.try_get("category")?,
            is_completed: row.try_get("is_completed")?,
            due_date: row.try_get("due_date")?,
            user_id: row.try_get("user_id")?,
        })
    }

    fn into_task(self) -> Result<Task, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid task id: {e}")))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| RepositoryError::Query(format!("invalid user_id: {e}")))?;
        let priority: Priority = self
            .priority
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        let due_date = self
            .due_date
            .as_deref()
            .map(super::chat::parse_datetime)
            .transpose()?;

        Ok(Task {
            id,
            title: self.title,
            description: self.description,
            priority,
            category: self.category,
            is_completed: self.is_completed != 0,
            due_date,
            user_id,
        })
    }
}

struct CategoryRow {
    id: String,
    name: String,
    user_id: String,
}

impl CategoryRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            user_id: row.try_get("user_id")?,
        })
    }

    fn into_category(self) -> Result<Category, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid category id: {e}")))?;
        let user_id = Uuid::parse_str(&self.user_id)
            .map_err(|e| RepositoryError::Query(format!("invalid user_id: {e}")))?;

        Ok(Category {
            id,
            name: self.name,
            user_id,
        })
    }
}

// ---------------------------------------------------------------------------
// TaskRepository implementation
// ---------------------------------------------------------------------------

impl TaskRepository for SqliteTaskRepository {
    async fn create_task(&self, task: &Task) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"INSERT INTO tasks (id, title, description, priority, category, is_completed, due_date, user_id)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(task.id.to_string())
        .bind(&task.title)
        .bind(&task.description)
        .bind(task.priority.to_string())
        .bind(&task.category)
        .bind(task.is_completed as i64)
        .bind(task.due_date.map(|d| d.to_rfc3339()))
        .bind(task.user_id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn list_tasks(&self, user_id: &Uuid) -> Result<Vec<Task>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM tasks WHERE user_id = ? ORDER BY id")
            .bind(user_id.to_string())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut tasks = Vec::with_capacity(rows.len());
        for row in &rows {
            let task_row =
                TaskRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            tasks.push(task_row.into_task()?);
        }

        Ok(tasks)
    }

    async fn list_open_tasks(&self, user_id: &Uuid) -> Result<Vec<Task>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM tasks WHERE user_id = ? AND is_completed = 0 ORDER BY id",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut tasks = Vec::with_capacity(rows.len());
        for row in &rows {
            let task_row =
                TaskRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            tasks.push(task_row.into_task()?);
        }

        Ok(tasks)
    }

    async fn create_category(&self, category: &Category) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO categories (id, name, user_id) VALUES (?, ?, ?)")
            .bind(category.id.to_string())
            .bind(&category.name)
            .bind(category.user_id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn list_categories(&self, user_id: &Uuid) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query("SELECT * FROM categories WHERE user_id = ? ORDER BY name")
            .bind(user_id.to_string())
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        let mut categories = Vec::with_capacity(rows.len());
        for row in &rows {
            let cat_row =
                CategoryRow::from_row(row).map_err(|e| RepositoryError::Query(e.to_string()))?;
            categories.push(cat_row.into_category()?);
        }

        Ok(categories)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;
    use crate::sqlite::test_util::{seed_user, test_pool};

    fn make_task(user_id: Uuid, title: &str) -> Task {
        Task {
            id: Uuid::now_v7(),
            title: title.to_string(),
            description: None,
            priority: Priority::Medium,
            category: None,
            is_completed: false,
            due_date: None,
            user_id,
        }
    }

    #[tokio::test]
    async fn test_create_and_list_tasks() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteTaskRepository::new(pool.clone());
        let user_id = seed_user(&pool).await;

        let due = Utc.with_ymd_and_hms(2026, 9, 1, 12, 0, 0).unwrap();
        let task = Task {
            priority: Priority::High,
            category: Some("work".to_string()),
            due_date: Some(due),
            description: Some("quarterly numbers".to_string()),
            ..make_task(user_id, "Write report")
        };
        repo.create_task(&task).await.unwrap();

        let tasks = repo.list_tasks(&user_id).await.unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].title, "Write report");
        assert_eq!(tasks[0].priority, Priority::High);
        assert_eq!(tasks[0].category.as_deref(), Some("work"));
        assert_eq!(tasks[0].due_date, Some(due));
        assert!(!tasks[0].is_completed);
    }

    #[tokio::test]
    async fn test_list_open_tasks_excludes_completed() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteTaskRepository::new(pool.clone());
        let user_id = seed_user(&pool).await;

        repo.create_task(&make_task(user_id, "open")).await.unwrap();
        repo.create_task(&Task {
            is_completed: true,
            ..make_task(user_id, "done")
        })
        .await
        .unwrap();

        let open = repo.list_open_tasks(&user_id).await.unwrap();
        assert_eq!(open.len(), 1);
        assert_eq!(open[0].title, "open");

        let all = repo.list_tasks(&user_id).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[tokio::test]
    async fn test_tasks_scoped_to_user() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteTaskRepository::new(pool.clone());
        let alice = seed_user(&pool).await;
        let bob = seed_user(&pool).await;

        repo.create_task(&make_task(alice, "alice's task")).await.unwrap();

        let bobs = repo.list_tasks(&bob).await.unwrap();
        assert!(bobs.is_empty());
    }

    #[tokio::test]
    async fn test_categories_sorted_by_name() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteTaskRepository::new(pool.clone());
        let user_id = seed_user(&pool).await;

        for name in ["work", "errands", "home"] {
            repo.create_category(&Category {
                id: Uuid::now_v7(),
                name: name.to_string(),
                user_id,
            })
            .await
            .unwrap();
        }

        let categories = repo.list_categories(&user_id).await.unwrap();
        let names: Vec<&str> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["errands", "home", "work"]);
    }

    #[tokio::test]
    async fn test_duplicate_category_name_rejected() {
        let (pool, _dir) = test_pool().await;
        let repo = SqliteTaskRepository::new(pool.clone());
        let user_id = seed_user(&pool).await;

        let category = Category {
            id: Uuid::now_v7(),
            name: "work".to_string(),
            user_id,
        };
        repo.create_category(&category).await.unwrap();

        let dup = Category {
            id: Uuid::now_v7(),
            name: "work".to_string(),
            user_id,
        };
        assert!(repo.create_category(&dup).await.is_err());
    }
}
