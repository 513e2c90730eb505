//! Environment-driven runtime configuration.

use secrecy::SecretString;

/// Runtime configuration, assembled from environment variables.
pub struct AppConfig {
    /// SQLite database URL.
    pub database_url: String,
    /// API key for the OpenAI completion client. Absent keys are allowed
    /// at startup; completion calls fail with an authentication error and
    /// the orchestrator degrades to its fallback reply.
    pub openai_api_key: Option<SecretString>,
    /// Model used by the streaming chat passthrough endpoint.
    pub chat_model: String,
}

impl AppConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self {
            database_url: default_database_url(),
            openai_api_key: std::env::var("OPENAI_API_KEY")
                .ok()
                .filter(|k| !k.is_empty())
                .map(SecretString::from),
            chat_model: std::env::var("TASKDECK_CHAT_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
        }
    }
}

/// Returns the default database URL based on `TASKDECK_DATA_DIR` env var,
/// falling back to `~/.taskdeck/taskdeck.db`.
pub fn default_database_url() -> String {
    if let Ok(url) = std::env::var("DATABASE_URL") {
        return url;
    }
    let data_dir = std::env::var("TASKDECK_DATA_DIR").unwrap_or_else(|_| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        format!("{home}/.taskdeck")
    });
    format!("sqlite://{data_dir}/taskdeck.db")
}
