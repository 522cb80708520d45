// src/models.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The canonical job record produced by one scrape request.
///
/// Built once by the normalizer, cleaned in place by the sanitizer, then
/// consumed read-only by the Notion upserter. Never persisted locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobData {
    pub title: String,
    pub company: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub salary: Option<String>,
    pub job_type: Option<String>,
    pub experience_level: Option<String>,
    pub url: String,
    pub scraped_at: DateTime<Utc>,
    pub status: Option<String>,
    pub resume: Option<String>,
}

/// Mapping from the external schema names the model replies with to the
/// internal `JobData` attribute names. Static and never mutated at runtime.
///
/// `applied_date` has no `JobData` field; values mapped to it are discarded
/// when the record is constructed.
pub const FIELD_MAP: &[(&str, &str)] = &[
    ("Company", "company"),
    ("Role", "title"),
    ("Location", "location"),
    ("Flexibility", "job_type"),
    ("Category", "experience_level"),
    ("Status", "status"),
    ("Applied Date", "applied_date"),
    ("Link", "url"),
    ("Resume", "resume"),
];

/// Look up the internal attribute name for an external schema field.
pub fn map_field(raw_key: &str) -> Option<&'static str> {
    FIELD_MAP
        .iter()
        .find(|(external, _)| *external == raw_key)
        .map(|(_, internal)| *internal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_known_schema_fields() {
        assert_eq!(map_field("Company"), Some("company"));
        assert_eq!(map_field("Role"), Some("title"));
        assert_eq!(map_field("Flexibility"), Some("job_type"));
        assert_eq!(map_field("Category"), Some("experience_level"));
        assert_eq!(map_field("Link"), Some("url"));
    }

    #[test]
    fn drops_unknown_fields() {
        assert_eq!(map_field("Salary Range"), None);
        assert_eq!(map_field("company"), None);
    }
}
