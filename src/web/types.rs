// src/web/types.rs
use crate::environment::AppConfig;
use crate::notion::NotionClient;
use crate::pipeline::ScrapePipeline;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Managed state shared by all routes.
pub struct AppState {
    pub config: AppConfig,
    pub notion: Arc<NotionClient>,
    pub pipeline: ScrapePipeline,
}

#[derive(Debug, Deserialize)]
pub struct JobScrapeRequest {
    pub url: String,
    /// Accepted for compatibility with the browser extension; the page is
    /// always re-rendered server-side.
    #[serde(default)]
    pub page_content: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ScrapeResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct HelloResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scrape_request_accepts_optional_page_content() {
        let request: JobScrapeRequest =
            serde_json::from_str(r#"{"url": "https://x.com/job/1"}"#).unwrap();
        assert_eq!(request.url, "https://x.com/job/1");
        assert_eq!(request.page_content, None);

        let request: JobScrapeRequest =
            serde_json::from_str(r#"{"url": "https://x.com/job/1", "page_content": "<html/>"}"#)
                .unwrap();
        assert_eq!(request.page_content.as_deref(), Some("<html/>"));
    }
}
