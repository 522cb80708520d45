// src/normalizer.rs
use crate::error::PipelineError;
use crate::models::{map_field, JobData};
use chrono::Utc;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Shape the raw model reply into a `JobData` record.
///
/// Unknown keys are silently dropped, known keys are renamed through
/// `FIELD_MAP`, `url` is always the input URL regardless of what the model
/// extracted, and `scraped_at` is the current time. `requirements` and
/// `benefits` are reserved fields defaulted here but not carried on the
/// record itself.
pub fn normalize_fields(raw: &Map<String, Value>, url: &str) -> Result<JobData, PipelineError> {
    let mut mapped: BTreeMap<&str, Value> = BTreeMap::new();
    for (key, value) in raw {
        if let Some(internal) = map_field(key) {
            mapped.insert(internal, value.clone());
        }
    }

    mapped.insert("url", Value::String(url.to_string()));
    mapped
        .entry("requirements")
        .or_insert_with(|| Value::Array(Vec::new()));
    mapped
        .entry("benefits")
        .or_insert_with(|| Value::Array(Vec::new()));

    let strings = convert_all_values_to_strings(&mapped);

    let title = strings
        .get("title")
        .cloned()
        .ok_or_else(|| PipelineError::Validation("missing required field: title".to_string()))?;
    let company = strings
        .get("company")
        .cloned()
        .ok_or_else(|| PipelineError::Validation("missing required field: company".to_string()))?;

    Ok(JobData {
        title,
        company,
        location: strings.get("location").cloned(),
        description: strings.get("description").cloned(),
        salary: strings.get("salary").cloned(),
        job_type: strings.get("job_type").cloned(),
        experience_level: strings.get("experience_level").cloned(),
        url: url.to_string(),
        scraped_at: Utc::now(),
        status: strings.get("status").cloned(),
        resume: strings.get("resume").cloned(),
    })
}

/// Coerce every mapped value to a display string: sequences join with
/// `", "`, null becomes empty, everything else stringifies as-is.
pub fn convert_all_values_to_strings(values: &BTreeMap<&str, Value>) -> BTreeMap<String, String> {
    values
        .iter()
        .map(|(key, value)| (key.to_string(), value_to_display(value)))
        .collect()
}

fn value_to_display(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text.clone(),
        Value::Array(items) => items
            .iter()
            .map(value_to_display)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(pairs: &[(&str, Value)]) -> Map<String, Value> {
        pairs
            .iter()
            .map(|(key, value)| (key.to_string(), value.clone()))
            .collect()
    }

    #[test]
    fn unknown_keys_only_fails_validation() {
        let input = raw(&[("Compensation", json!("100k")), ("Team", json!("Core"))]);
        let result = normalize_fields(&input, "https://x.com/job/1");
        assert!(matches!(result, Err(PipelineError::Validation(_))));
    }

    #[test]
    fn url_and_scraped_at_come_from_call_time_inputs() {
        let input = raw(&[
            ("Company", json!("Acme")),
            ("Role", json!("Engineer")),
            ("Link", json!("https://elsewhere.example/other")),
        ]);
        let before = Utc::now();
        let job = normalize_fields(&input, "https://x.com/job/1").unwrap();
        assert_eq!(job.url, "https://x.com/job/1");
        assert!(job.scraped_at >= before);
    }

    #[test]
    fn known_keys_are_renamed_and_unknown_dropped() {
        let input = raw(&[
            ("Company", json!("Acme")),
            ("Role", json!("Engineer")),
            ("Flexibility", json!("Remote")),
            ("Category", json!("Senior")),
            ("Perks", json!("Free coffee")),
        ]);
        let job = normalize_fields(&input, "https://x.com/job/1").unwrap();
        assert_eq!(job.company, "Acme");
        assert_eq!(job.title, "Engineer");
        assert_eq!(job.job_type.as_deref(), Some("Remote"));
        assert_eq!(job.experience_level.as_deref(), Some("Senior"));
        assert_eq!(job.description, None);
    }

    #[test]
    fn converts_sequences_nulls_and_numbers() {
        let mut values: BTreeMap<&str, Value> = BTreeMap::new();
        values.insert("a", json!(["x", "y"]));
        values.insert("b", Value::Null);
        values.insert("c", json!(5));

        let strings = convert_all_values_to_strings(&values);
        assert_eq!(strings.get("a").map(String::as_str), Some("x, y"));
        assert_eq!(strings.get("b").map(String::as_str), Some(""));
        assert_eq!(strings.get("c").map(String::as_str), Some("5"));
    }
}
