// src/notion/client.rs
use super::{RecordStore, SchemaStore};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::collections::HashMap;
use tracing::{error, info};

const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";

/// Thin client over the Notion REST API, implementing the schema and
/// record capabilities the upserter needs.
pub struct NotionClient {
    client: Client,
    token: Option<String>,
    base_url: String,
}

impl NotionClient {
    pub fn new(token: Option<String>) -> Result<Self> {
        let base_url =
            std::env::var("NOTION_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            token,
            base_url,
        })
    }

    fn token(&self) -> Result<&str> {
        self.token
            .as_deref()
            .context("NOTION_TOKEN is not configured")
    }

    async fn read_success_body(response: reqwest::Response, action: &str) -> Result<Value> {
        let status = response.status();
        let body = response
            .text()
            .await
            .with_context(|| format!("Failed to read Notion response for {action}"))?;

        if !status.is_success() {
            error!("Notion API error {} during {}: {}", status, action, body);
            anyhow::bail!("Notion API returned error {} during {}: {}", status, action, body);
        }

        serde_json::from_str(&body)
            .with_context(|| format!("Failed to parse Notion response for {action}"))
    }
}

#[async_trait]
impl SchemaStore for NotionClient {
    async fn database_properties(&self, database_id: &str) -> Result<HashMap<String, String>> {
        let response = self
            .client
            .get(format!("{}/databases/{}", self.base_url, database_id))
            .bearer_auth(self.token()?)
            .header("Notion-Version", NOTION_VERSION)
            .send()
            .await
            .context("Failed to retrieve Notion database")?;

        let body = Self::read_success_body(response, "database retrieval").await?;

        let mut properties = HashMap::new();
        if let Some(remote) = body.get("properties").and_then(Value::as_object) {
            for (name, descriptor) in remote {
                let kind = descriptor
                    .get("type")
                    .and_then(Value::as_str)
                    .unwrap_or_default();
                properties.insert(name.clone(), kind.to_string());
            }
        }
        Ok(properties)
    }

    async fn add_property(&self, database_id: &str, name: &str, kind: &str) -> Result<()> {
        let body = json!({ "properties": { name: { kind: {} } } });

        let response = self
            .client
            .patch(format!("{}/databases/{}", self.base_url, database_id))
            .bearer_auth(self.token()?)
            .header("Notion-Version", NOTION_VERSION)
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Failed to add Notion property: {name}"))?;

        Self::read_success_body(response, "schema alteration").await?;
        info!("Created Notion property: {} ({})", name, kind);
        Ok(())
    }
}

#[async_trait]
impl RecordStore for NotionClient {
    async fn create_record(&self, database_id: &str, properties: Value) -> Result<()> {
        let body = json!({
            "parent": { "database_id": database_id },
            "properties": properties,
        });

        let response = self
            .client
            .post(format!("{}/pages", self.base_url))
            .bearer_auth(self.token()?)
            .header("Notion-Version", NOTION_VERSION)
            .json(&body)
            .send()
            .await
            .context("Failed to create Notion page")?;

        Self::read_success_body(response, "page creation").await?;
        Ok(())
    }
}
