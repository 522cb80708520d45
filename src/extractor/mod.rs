// src/extractor/mod.rs
use crate::error::PipelineError;
use anyhow::Result;
use async_trait::async_trait;
use scraper::{Html, Selector};
use serde_json::{Map, Value};
use std::sync::Arc;
use tracing::info;

pub mod openai;

pub use openai::OpenAiClient;

/// The closed set of schema field names the model may reply with.
pub const SCHEMA_FIELDS: &[&str] = &[
    "Company",
    "Role",
    "Category",
    "Location",
    "Flexibility",
    "Status",
    "Applied Date",
    "Link",
    "Resume",
];

/// Page text beyond this prefix is dropped before prompting, to bound
/// request size.
const MAX_PROMPT_CHARS: usize = 8000;

/// Narrow capability interface over a language-model completion service,
/// so extraction can be tested against a fake without network access.
#[async_trait]
pub trait Completer: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String>;
}

/// Turns rendered page HTML into the raw schema-field mapping by prompting
/// a language model and parsing its reply strictly as JSON.
pub struct FieldExtractor {
    completer: Arc<dyn Completer>,
}

impl FieldExtractor {
    pub fn new(completer: Arc<dyn Completer>) -> Self {
        Self { completer }
    }

    /// Extract the raw field mapping from a rendered page.
    ///
    /// Keys in the returned map still use the external schema naming; the
    /// normalizer renames them. A model failure or a reply that is not a
    /// JSON object is an extraction failure, with no retry.
    pub async fn extract(
        &self,
        html: &str,
        url: &str,
    ) -> Result<Map<String, Value>, PipelineError> {
        info!("Starting job data extraction for URL: {}", url);

        let text = visible_body_text(html);
        let prompt = build_prompt(&text, url);

        let reply = self
            .completer
            .complete(&prompt)
            .await
            .map_err(|e| PipelineError::Extraction(format!("{e:#}")))?;

        let raw: Map<String, Value> = serde_json::from_str(reply.trim())
            .map_err(|e| PipelineError::Extraction(format!("model reply is not valid JSON: {e}")))?;

        info!("Extracted {} raw fields", raw.len());
        Ok(raw)
    }
}

/// Visible text of the document body, tags stripped, one text block per
/// line. Empty when the document has no body.
pub fn visible_body_text(html: &str) -> String {
    let document = Html::parse_document(html);
    let Ok(body) = Selector::parse("body") else {
        return String::new();
    };
    document
        .select(&body)
        .next()
        .map(|element| {
            element
                .text()
                .map(str::trim)
                .filter(|chunk| !chunk.is_empty())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .unwrap_or_default()
}

fn build_prompt(text: &str, url: &str) -> String {
    let truncated: String = text.chars().take(MAX_PROMPT_CHARS).collect();
    let fields = SCHEMA_FIELDS.join(", ");

    format!(
        "Extract job data from this posting:\n\n{truncated}\n\n\
         Please output a JSON object with the following keys ONLY:\n{fields}\n\n\
         If any field is missing, omit it from the JSON.\n\n\
         URL: {url}"
    )
}
