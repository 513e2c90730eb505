//! Application state wiring all services together.
//!
//! Services are generic over the repository and completion-client traits;
//! AppState pins them to the concrete infra implementations. The OpenAI
//! client is built once here and shared, never rebuilt per request.

use std::sync::Arc;

use taskdeck_core::assistant::AssistantService;
use taskdeck_infra::config::AppConfig;
use taskdeck_infra::llm::OpenAiCompletionClient;
use taskdeck_infra::sqlite::{
    DatabasePool, SqliteChatRepository, SqliteTaskRepository, SqliteUserRepository,
};

/// Concrete type alias for the assistant service pinned to infra implementations.
pub type ConcreteAssistantService =
    AssistantService<SqliteTaskRepository, SqliteChatRepository, OpenAiCompletionClient>;

/// Shared application state for the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub assistant: Arc<ConcreteAssistantService>,
    pub user_repo: Arc<SqliteUserRepository>,
    pub task_repo: Arc<SqliteTaskRepository>,
    pub chat_repo: Arc<SqliteChatRepository>,
    pub completion_client: Arc<OpenAiCompletionClient>,
    pub chat_model: String,
    pub db_pool: DatabasePool,
}

impl AppState {
    /// Initialize the application state: connect to DB, wire services.
    pub async fn init() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();
        Self::init_with_config(config).await
    }

    /// Initialize with an explicit configuration (used by tests).
    pub async fn init_with_config(config: AppConfig) -> anyhow::Result<Self> {
        // Ensure the data directory exists for file-based database URLs
        if let Some(path) = config
            .database_url
            .strip_prefix("sqlite://")
            .filter(|p| !p.starts_with(':'))
        {
            if let Some(parent) = std::path::Path::new(path).parent() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let db_pool = DatabasePool::new(&config.database_url).await?;

        if config.openai_api_key.is_none() {
            tracing::warn!(
                "OPENAI_API_KEY is not set; assistant replies will degrade to fallbacks"
            );
        }
        let completion_client =
            Arc::new(OpenAiCompletionClient::new(config.openai_api_key.as_ref()));

        // The assistant service owns its own repository handles; handlers get
        // separate instances over the same pool.
        let assistant = AssistantService::new(
            SqliteTaskRepository::new(db_pool.clone()),
            SqliteChatRepository::new(db_pool.clone()),
            completion_client.clone(),
        );

        Ok(Self {
            assistant: Arc::new(assistant),
            user_repo: Arc::new(SqliteUserRepository::new(db_pool.clone())),
            task_repo: Arc::new(SqliteTaskRepository::new(db_pool.clone())),
            chat_repo: Arc::new(SqliteChatRepository::new(db_pool.clone())),
            completion_client,
            chat_model: config.chat_model,
            db_pool,
        })
    }
}
