// src/pipeline.rs
use crate::environment::AppConfig;
use crate::error::PipelineError;
use crate::extractor::{Completer, FieldExtractor};
use crate::fetcher::PageFetcher;
use crate::normalizer::normalize_fields;
use crate::notion::{NotionUpserter, RecordStore, SchemaStore};
use crate::sanitizer::sanitize_job;
use std::sync::Arc;
use tracing::info;

/// Sequences fetch, extract, normalize and sanitize per request, then
/// detaches the Notion write so the HTTP response never waits on it.
pub struct ScrapePipeline {
    fetcher: PageFetcher,
    extractor: FieldExtractor,
    upserter: Arc<NotionUpserter>,
}

impl ScrapePipeline {
    pub fn new(
        completer: Arc<dyn Completer>,
        schema: Arc<dyn SchemaStore>,
        records: Arc<dyn RecordStore>,
        config: &AppConfig,
    ) -> Self {
        Self {
            fetcher: PageFetcher::new(),
            extractor: FieldExtractor::new(completer),
            upserter: Arc::new(NotionUpserter::new(schema, records, config)),
        }
    }

    /// Run the synchronous stages and schedule the deferred upsert.
    ///
    /// Returns as soon as sanitization completes; the Notion write happens
    /// in a background task whose outcome is invisible to the caller.
    pub async fn handle(&self, url: &str) -> Result<(), PipelineError> {
        info!("Received request to scrape job from URL: {}", url);

        let html = self.fetcher.fetch(url).await?;
        info!("Fetched dynamic content via headless browser");

        let raw = self.extractor.extract(&html, url).await?;

        let mut job = normalize_fields(&raw, url)?;
        sanitize_job(&mut job);
        info!("Extracted job data: '{}' at '{}'", job.title, job.company);

        let upserter = Arc::clone(&self.upserter);
        tokio::spawn(async move {
            upserter.upsert(&job).await;
        });
        info!("Background task to add job to Notion has been scheduled");

        Ok(())
    }
}
