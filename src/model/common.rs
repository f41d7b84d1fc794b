use serde_json::{Map, Value};
use uuid::Uuid;

pub type Id = String;

/// A stored catalog record. Records stay untyped so that shallow-merge
/// updates can add fields the entity table does not know about.
pub type Record = Map<String, Value>;

pub fn generate_id() -> Id {
    Uuid::new_v4().to_string()
}

/// Returns the field as a string slice when it holds a non-empty string.
pub fn non_empty_str<'a>(record: &'a Record, field: &str) -> Option<&'a str> {
    match record.get(field) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.as_str()),
        _ => None,
    }
}

/// Human-readable label for log lines and reports.
pub fn record_label(record: &Record, field: &str) -> String {
    non_empty_str(record, field)
        .map(str::to_string)
        .unwrap_or_else(|| "<unnamed>".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;

    #[test]
    fn generated_ids_are_distinct() {
        let ids: HashSet<Id> = (0..1000).map(|_| generate_id()).collect();
        assert_eq!(ids.len(), 1000);
        assert!(ids.iter().all(|id| !id.is_empty()));
    }

    #[test]
    fn non_empty_str_rejects_blank_and_non_strings() {
        let record = json!({"a": "x", "b": "", "c": 3, "d": null});
        let record = record.as_object().unwrap();

        assert_eq!(non_empty_str(record, "a"), Some("x"));
        assert_eq!(non_empty_str(record, "b"), None);
        assert_eq!(non_empty_str(record, "c"), None);
        assert_eq!(non_empty_str(record, "d"), None);
        assert_eq!(non_empty_str(record, "missing"), None);
    }
}
