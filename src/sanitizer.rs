// src/sanitizer.rs
use crate::models::JobData;

/// Strip special characters from the free-text fields of a job record.
///
/// Keeps word characters, whitespace and `- . ! ?`, then trims. The `url`
/// field is left alone so the link survives intact. Idempotent, and never
/// lengthens a value.
pub fn sanitize_job(job: &mut JobData) {
    job.title = clean_field(&job.title);
    job.company = clean_field(&job.company);

    let optional_fields = [
        &mut job.location,
        &mut job.description,
        &mut job.salary,
        &mut job.job_type,
        &mut job.experience_level,
        &mut job.status,
        &mut job.resume,
    ];
    for field in optional_fields {
        if let Some(value) = field {
            *value = clean_field(value);
        }
    }
}

fn clean_field(value: &str) -> String {
    value
        .chars()
        .filter(|&c| {
            c.is_alphanumeric() || c == '_' || c.is_whitespace() || matches!(c, '-' | '.' | '!' | '?')
        })
        .collect::<String>()
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalizer::normalize_fields;
    use serde_json::{json, Map, Value};

    fn sample_job() -> JobData {
        let mut raw = Map::new();
        raw.insert("Company".to_string(), json!("Acme, Inc"));
        raw.insert("Role".to_string(), json!("Engineer"));
        raw.insert("Location".to_string(), json!("Zürich (HQ) / hybrid"));
        raw.insert("Category".to_string(), Value::String("Mid, Senior".to_string()));
        normalize_fields(&raw, "https://x.com/job/1").unwrap()
    }

    #[test]
    fn strips_special_characters_and_preserves_url() {
        let mut job = sample_job();
        sanitize_job(&mut job);
        assert_eq!(job.company, "Acme Inc");
        assert_eq!(job.title, "Engineer");
        assert_eq!(job.url, "https://x.com/job/1");
    }

    #[test]
    fn is_idempotent() {
        let mut once = sample_job();
        sanitize_job(&mut once);
        let mut twice = once.clone();
        sanitize_job(&mut twice);
        assert_eq!(once.title, twice.title);
        assert_eq!(once.company, twice.company);
        assert_eq!(once.location, twice.location);
        assert_eq!(once.experience_level, twice.experience_level);
    }

    #[test]
    fn never_lengthens_a_field() {
        let mut job = sample_job();
        let lengths = [
            job.title.len(),
            job.company.len(),
            job.location.as_deref().unwrap_or_default().len(),
            job.experience_level.as_deref().unwrap_or_default().len(),
        ];
        sanitize_job(&mut job);
        assert!(job.title.len() <= lengths[0]);
        assert!(job.company.len() <= lengths[1]);
        assert!(job.location.as_deref().unwrap_or_default().len() <= lengths[2]);
        assert!(job.experience_level.as_deref().unwrap_or_default().len() <= lengths[3]);
    }

    #[test]
    fn trims_after_stripping() {
        assert_eq!(clean_field("  Platform Engineer @ Acme  "), "Platform Engineer  Acme");
        assert_eq!(clean_field("***"), "");
    }
}
