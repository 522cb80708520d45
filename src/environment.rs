// src/environment.rs
use tracing::warn;

/// Process configuration, resolved once at startup and passed into each
/// component constructor. Every credential is optional: a missing value
/// degrades the feature that needs it instead of preventing boot.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    pub notion_token: Option<String>,
    pub notion_database_id: Option<String>,
    pub openai_api_key: Option<String>,
    pub resume_link: Option<String>,
}

impl AppConfig {
    /// Load configuration from the process environment.
    ///
    /// Blank values are treated as unset so an empty `.env` entry behaves
    /// like a missing one.
    pub fn from_env() -> Self {
        let config = Self {
            notion_token: env_var("NOTION_TOKEN"),
            notion_database_id: env_var("NOTION_DATABASE_ID"),
            openai_api_key: env_var("OPENAI_API_KEY"),
            resume_link: env_var("RESUME_LINK"),
        };

        if config.notion_token.is_none() || config.notion_database_id.is_none() {
            warn!("NOTION_TOKEN or NOTION_DATABASE_ID not set; Notion writes will fail");
        }
        if config.openai_api_key.is_none() {
            warn!("OPENAI_API_KEY not set; job extraction will fail");
        }

        config
    }

    pub fn has_notion_credentials(&self) -> bool {
        self.notion_token.is_some() && self.notion_database_id.is_some()
    }
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
