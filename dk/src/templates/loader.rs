//! Template loader
//!
//! Fetches a category's payload through a [`TemplateSource`] and validates it
//! into an ordered list of [`DorkTemplate`]s.
//!
//! The payload must be a JSON list of records, each with `label`, `query` and
//! `description` text fields. Unknown extra fields are ignored.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, warn};

use super::{DorkTemplate, LoadError};
use crate::source::TemplateSource;

/// Loads template lists through an injected source
#[derive(Clone)]
pub struct TemplateLoader {
    source: Arc<dyn TemplateSource>,
}

impl TemplateLoader {
    pub fn new(source: Arc<dyn TemplateSource>) -> Self {
        debug!(source = %source.describe(), "TemplateLoader::new: called");
        Self { source }
    }

    /// The underlying source
    pub fn source(&self) -> &Arc<dyn TemplateSource> {
        &self.source
    }

    /// Load the ordered template list for a source id
    pub async fn load(&self, source_id: &str) -> Result<Vec<DorkTemplate>, LoadError> {
        debug!(%source_id, "TemplateLoader::load: called");
        let payload = self.source.fetch(source_id).await.map_err(|cause| {
            warn!(%source_id, error = %cause, "Template fetch failed");
            LoadError::SourceUnavailable {
                source_id: source_id.to_string(),
                cause,
            }
        })?;

        let templates = parse_payload(source_id, &payload)?;
        info!(%source_id, count = templates.len(), "Loaded dork templates");
        Ok(templates)
    }
}

/// Validate a raw payload into templates
pub fn parse_payload(source_id: &str, payload: &str) -> Result<Vec<DorkTemplate>, LoadError> {
    debug!(%source_id, payload_len = payload.len(), "parse_payload: called");
    let malformed = |reason: String| LoadError::MalformedPayload {
        source_id: source_id.to_string(),
        reason,
    };

    let value: Value = serde_json::from_str(payload).map_err(|e| malformed(format!("invalid JSON: {}", e)))?;

    let records = match value {
        Value::Array(records) => records,
        other => {
            debug!(%source_id, "parse_payload: payload is not a list");
            return Err(malformed(format!("expected a list of templates, found {}", json_kind(&other))));
        }
    };

    if records.is_empty() {
        debug!(%source_id, "parse_payload: empty list");
        return Err(LoadError::EmptyCatalog {
            source_id: source_id.to_string(),
        });
    }

    records
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            serde_json::from_value::<DorkTemplate>(record).map_err(|e| malformed(format!("record {}: {}", index, e)))
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::FetchError;
    use crate::source::fetch::mock::MockSource;

    const TWO_RECORDS: &str = r#"[
        {"label": "First", "query": "site:{input}", "description": "one"},
        {"label": "Second", "query": "inurl:admin", "description": "two"}
    ]"#;

    fn loader(source: MockSource) -> TemplateLoader {
        TemplateLoader::new(Arc::new(source))
    }

    #[tokio::test]
    async fn test_load_preserves_order() {
        let loader = loader(MockSource::new().with_payload("a.json", TWO_RECORDS));
        let templates = loader.load("a.json").await.unwrap();
        assert_eq!(templates.len(), 2);
        assert_eq!(templates[0].label, "First");
        assert_eq!(templates[0].query, "site:{input}");
        assert_eq!(templates[1].label, "Second");
    }

    #[tokio::test]
    async fn test_empty_list_is_empty_catalog() {
        let loader = loader(MockSource::new().with_payload("a.json", "[]"));
        let err = loader.load("a.json").await.unwrap_err();
        assert_eq!(
            err,
            LoadError::EmptyCatalog {
                source_id: "a.json".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_object_is_malformed() {
        let loader = loader(MockSource::new().with_payload("a.json", "{}"));
        let err = loader.load("a.json").await.unwrap_err();
        match err {
            LoadError::MalformedPayload { source_id, reason } => {
                assert_eq!(source_id, "a.json");
                assert!(reason.contains("an object"), "reason: {}", reason);
            }
            other => panic!("expected MalformedPayload, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_not_found_is_source_unavailable() {
        let loader = loader(MockSource::new());
        let err = loader.load("missing.json").await.unwrap_err();
        assert!(matches!(
            err,
            LoadError::SourceUnavailable {
                cause: FetchError::NotFound(_),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_status_error_is_source_unavailable() {
        let loader = loader(MockSource::new().with_error(
            "a.json",
            FetchError::Status {
                status: 500,
                source_id: "a.json".to_string(),
            },
        ));
        let err = loader.load("a.json").await.unwrap_err();
        assert_eq!(err.kind(), "source-unavailable");
    }

    #[test]
    fn test_invalid_json_is_malformed() {
        let err = parse_payload("a.json", "[{").unwrap_err();
        assert_eq!(err.kind(), "malformed-payload");
    }

    #[test]
    fn test_missing_field_names_record() {
        let payload = r#"[
            {"label": "ok", "query": "q", "description": "d"},
            {"label": "bad", "query": "q"}
        ]"#;
        match parse_payload("a.json", payload).unwrap_err() {
            LoadError::MalformedPayload { reason, .. } => {
                assert!(reason.starts_with("record 1:"), "reason: {}", reason);
                assert!(reason.contains("description"), "reason: {}", reason);
            }
            other => panic!("expected MalformedPayload, got {:?}", other),
        }
    }

    #[test]
    fn test_non_text_field_is_malformed() {
        let payload = r#"[{"label": 7, "query": "q", "description": "d"}]"#;
        assert_eq!(parse_payload("a.json", payload).unwrap_err().kind(), "malformed-payload");

        let payload = r#"[{"label": null, "query": "q", "description": "d"}]"#;
        assert_eq!(parse_payload("a.json", payload).unwrap_err().kind(), "malformed-payload");
    }

    #[test]
    fn test_non_object_record_is_malformed() {
        let payload = r#"["site:{input}"]"#;
        assert_eq!(parse_payload("a.json", payload).unwrap_err().kind(), "malformed-payload");
    }

    #[test]
    fn test_scalar_payloads_are_malformed() {
        for payload in ["null", "true", "3", r#""text""#] {
            assert_eq!(
                parse_payload("a.json", payload).unwrap_err().kind(),
                "malformed-payload",
                "payload: {}",
                payload
            );
        }
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let payload = r#"[{"label": "l", "query": "q", "description": "d", "tags": ["x"]}]"#;
        let templates = parse_payload("a.json", payload).unwrap();
        assert_eq!(templates, vec![DorkTemplate::new("l", "q", "d")]);
    }
}
