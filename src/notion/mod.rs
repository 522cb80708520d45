// src/notion/mod.rs
use crate::environment::AppConfig;
use crate::models::JobData;
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{error, info};

pub mod client;

pub use client::NotionClient;

/// Read and extend a remote database schema.
#[async_trait]
pub trait SchemaStore: Send + Sync {
    /// Current remote properties, as name -> property type.
    async fn database_properties(&self, database_id: &str) -> Result<HashMap<String, String>>;

    /// Add one named, typed property. Existing properties are never
    /// removed or retyped.
    async fn add_property(&self, database_id: &str, name: &str, kind: &str) -> Result<()>;
}

/// Create records in a remote database.
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn create_record(&self, database_id: &str, properties: Value) -> Result<()>;
}

/// The properties every destination database must carry, as
/// (name, property type). Compared against the remote schema before each
/// write; whatever is missing gets created first.
pub const REQUIRED_PROPERTIES: &[(&str, &str)] = &[
    ("Company", "title"),
    ("Role", "rich_text"),
    ("Location", "rich_text"),
    ("Category", "select"),
    ("Flexibility", "select"),
    ("Status", "select"),
    ("Applied Date", "date"),
    ("Link", "url"),
    ("Resume", "files"),
];

/// Writes one page per job into the destination database, healing the
/// schema first. Failures are logged and swallowed: the upsert runs as a
/// detached task after the HTTP response has already been sent, so there
/// is no caller left to inform.
pub struct NotionUpserter {
    schema: Arc<dyn SchemaStore>,
    records: Arc<dyn RecordStore>,
    database_id: Option<String>,
    resume_link: Option<String>,
}

impl NotionUpserter {
    pub fn new(
        schema: Arc<dyn SchemaStore>,
        records: Arc<dyn RecordStore>,
        config: &AppConfig,
    ) -> Self {
        Self {
            schema,
            records,
            database_id: config.notion_database_id.clone(),
            resume_link: config.resume_link.clone(),
        }
    }

    /// Fire-and-forget write. The `error!` log line is the only signal a
    /// failed upsert leaves behind.
    pub async fn upsert(&self, job: &JobData) {
        info!("Adding job '{}' at '{}' to Notion", job.title, job.company);

        if let Err(e) = self.try_upsert(job).await {
            error!("Failed to add job '{}' to Notion: {:#}", job.title, e);
        }
    }

    async fn try_upsert(&self, job: &JobData) -> Result<()> {
        let database_id = self
            .database_id
            .as_deref()
            .context("NOTION_DATABASE_ID is not configured")?;

        let current = self
            .schema
            .database_properties(database_id)
            .await
            .context("Failed to read destination schema")?;

        for (name, kind) in REQUIRED_PROPERTIES {
            if !current.contains_key(*name) {
                info!("Creating missing property: {}", name);
                self.schema
                    .add_property(database_id, name, kind)
                    .await
                    .with_context(|| format!("Failed to create property: {name}"))?;
            }
        }

        let properties = build_page_properties(job, self.resume_link.as_deref());
        self.records
            .create_record(database_id, properties)
            .await
            .context("Failed to create job page")?;

        info!("Job successfully added to Notion");
        Ok(())
    }
}

/// Select options cannot contain commas; rewrite them to `" /"`. Absent or
/// empty values stay absent.
pub fn clean_select_value(value: Option<&str>) -> Option<String> {
    value
        .map(|v| v.replace(',', " /").trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn clean_text_value(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

/// Build the property payload for one job page. The Status select is
/// always "Applied" and Applied Date is always now in UTC; any scraped
/// values for those fields are ignored.
pub fn build_page_properties(job: &JobData, resume_link: Option<&str>) -> Value {
    let mut properties = serde_json::Map::new();

    properties.insert(
        "Company".to_string(),
        json!({ "title": [{ "text": { "content": clean_text_value(Some(&job.company)) } }] }),
    );
    properties.insert(
        "Role".to_string(),
        json!({ "rich_text": [{ "text": { "content": clean_text_value(Some(&job.title)) } }] }),
    );
    properties.insert(
        "Location".to_string(),
        json!({ "rich_text": [{ "text": { "content": clean_text_value(job.location.as_deref()) } }] }),
    );
    properties.insert(
        "Category".to_string(),
        select_property(job.experience_level.as_deref()),
    );
    properties.insert(
        "Flexibility".to_string(),
        select_property(job.job_type.as_deref()),
    );
    properties.insert("Status".to_string(), json!({ "select": { "name": "Applied" } }));
    properties.insert(
        "Applied Date".to_string(),
        json!({ "date": { "start": Utc::now().to_rfc3339() } }),
    );
    properties.insert(
        "Link".to_string(),
        json!({ "url": clean_text_value(Some(&job.url)) }),
    );

    if let Some(link) = resume_link {
        properties.insert(
            "Resume".to_string(),
            json!({
                "files": [{ "type": "external", "name": "Resume", "external": { "url": link } }]
            }),
        );
    }

    Value::Object(properties)
}

fn select_property(value: Option<&str>) -> Value {
    match clean_select_value(value) {
        Some(name) => json!({ "select": { "name": name } }),
        None => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeNotion {
        existing: Vec<(&'static str, &'static str)>,
        added: Mutex<Vec<String>>,
        created: Mutex<Vec<Value>>,
    }

    #[async_trait]
    impl SchemaStore for FakeNotion {
        async fn database_properties(&self, _database_id: &str) -> Result<HashMap<String, String>> {
            Ok(self
                .existing
                .iter()
                .map(|(name, kind)| (name.to_string(), kind.to_string()))
                .collect())
        }

        async fn add_property(&self, _database_id: &str, name: &str, _kind: &str) -> Result<()> {
            self.added.lock().unwrap().push(name.to_string());
            Ok(())
        }
    }

    #[async_trait]
    impl RecordStore for FakeNotion {
        async fn create_record(&self, _database_id: &str, properties: Value) -> Result<()> {
            self.created.lock().unwrap().push(properties);
            Ok(())
        }
    }

    fn job() -> JobData {
        JobData {
            title: "Engineer".to_string(),
            company: "Acme".to_string(),
            location: Some("Remote".to_string()),
            description: None,
            salary: None,
            job_type: Some("Full-time".to_string()),
            experience_level: Some("Mid, Senior".to_string()),
            url: "https://x.com/job/1".to_string(),
            scraped_at: Utc::now(),
            status: None,
            resume: None,
        }
    }

    fn upserter(fake: Arc<FakeNotion>, resume_link: Option<&str>) -> NotionUpserter {
        let config = AppConfig {
            notion_token: Some("secret".to_string()),
            notion_database_id: Some("db-1".to_string()),
            resume_link: resume_link.map(str::to_string),
            ..Default::default()
        };
        NotionUpserter::new(fake.clone(), fake, &config)
    }

    #[test]
    fn select_values_cannot_contain_commas() {
        assert_eq!(
            clean_select_value(Some("Mid, Senior")),
            Some("Mid / Senior".to_string())
        );
        assert_eq!(clean_select_value(Some("")), None);
        assert_eq!(clean_select_value(None), None);
    }

    #[tokio::test]
    async fn heals_every_missing_property_before_creating() {
        let fake = Arc::new(FakeNotion::default());
        upserter(fake.clone(), None).upsert(&job()).await;

        let added = fake.added.lock().unwrap();
        assert_eq!(added.len(), REQUIRED_PROPERTIES.len());
        for (name, _) in REQUIRED_PROPERTIES {
            assert!(added.contains(&name.to_string()));
        }
        assert_eq!(fake.created.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn complete_schema_needs_no_alteration() {
        let fake = Arc::new(FakeNotion {
            existing: REQUIRED_PROPERTIES.to_vec(),
            ..Default::default()
        });
        upserter(fake.clone(), None).upsert(&job()).await;

        assert!(fake.added.lock().unwrap().is_empty());
        assert_eq!(fake.created.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_database_id_is_swallowed() {
        let fake = Arc::new(FakeNotion::default());
        let config = AppConfig::default();
        let upserter = NotionUpserter::new(fake.clone(), fake.clone(), &config);

        upserter.upsert(&job()).await;

        assert!(fake.added.lock().unwrap().is_empty());
        assert!(fake.created.lock().unwrap().is_empty());
    }

    #[test]
    fn payload_hardcodes_status_and_rewrites_selects() {
        let payload = build_page_properties(&job(), None);

        assert_eq!(payload["Status"]["select"]["name"], "Applied");
        assert_eq!(payload["Category"]["select"]["name"], "Mid / Senior");
        assert_eq!(payload["Company"]["title"][0]["text"]["content"], "Acme");
        assert_eq!(payload["Role"]["rich_text"][0]["text"]["content"], "Engineer");
        assert_eq!(payload["Link"]["url"], "https://x.com/job/1");
        assert!(payload.get("Resume").is_none());
    }

    #[test]
    fn payload_nulls_selects_without_source_values() {
        let mut record = job();
        record.experience_level = None;
        record.job_type = Some(String::new());

        let payload = build_page_properties(&record, None);
        assert!(payload["Category"].is_null());
        assert!(payload["Flexibility"].is_null());
    }

    #[test]
    fn payload_attaches_resume_only_when_configured() {
        let payload = build_page_properties(&job(), Some("https://files.example/resume.pdf"));
        assert_eq!(
            payload["Resume"]["files"][0]["external"]["url"],
            "https://files.example/resume.pdf"
        );
    }
}
