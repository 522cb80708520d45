// src/error.rs
use thiserror::Error;

/// Failure kinds for the scrape pipeline.
///
/// `FetchTransport` maps to a 400 response, `Extraction` and `Validation`
/// to 500. `Upsert` never reaches the caller: the Notion write runs as a
/// detached task and its failures are logged and swallowed.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("failed to reach job page: {0}")]
    FetchTransport(String),

    #[error("job data extraction failed: {0}")]
    Extraction(String),

    #[error("job data validation failed: {0}")]
    Validation(String),

    #[error("notion upsert failed: {0}")]
    Upsert(String),
}
