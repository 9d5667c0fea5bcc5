//! Breach records as returned by the Dehashed search API.
//!
//! Records are loosely structured: every field is optional and the API has
//! been seen returning strings, nulls, numbers and lists for the same key.
//! The four fields the extractor cares about are normalized to optional
//! text; the original JSON object is kept for raw passthrough.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// One row of compromised-credential data.
#[derive(Debug, Clone, PartialEq)]
pub struct BreachRecord {
    email: Option<String>,
    password: Option<String>,
    hashed_password: Option<String>,
    obtained_from: Option<String>,
    raw: Value,
}

#[derive(Deserialize)]
struct RecordFields {
    #[serde(default, deserialize_with = "loose_text")]
    email: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    password: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    hashed_password: Option<String>,
    #[serde(default, deserialize_with = "loose_text")]
    obtained_from: Option<String>,
}

impl BreachRecord {
    /// Build a record from one element of the `entries` array.
    ///
    /// Returns `None` when the element is not a JSON object.
    #[must_use]
    pub fn from_value(value: Value) -> Option<Self> {
        if !value.is_object() {
            return None;
        }

        let fields: RecordFields = serde_json::from_value(value.clone()).ok()?;
        Some(Self {
            email: fields.email,
            password: fields.password,
            hashed_password: fields.hashed_password,
            obtained_from: fields.obtained_from,
            raw: value,
        })
    }

    /// Email address, if present and not blank.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        non_blank(self.email.as_deref())
    }

    /// Plaintext password, if present and not blank.
    #[must_use]
    pub fn password(&self) -> Option<&str> {
        non_blank(self.password.as_deref())
    }

    /// Password hash, if present and not blank.
    #[must_use]
    pub fn hashed_password(&self) -> Option<&str> {
        non_blank(self.hashed_password.as_deref())
    }

    /// Name of the breach the record came from, if present and not blank.
    #[must_use]
    pub fn obtained_from(&self) -> Option<&str> {
        non_blank(self.obtained_from.as_deref())
    }

    /// Any field of the original record.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.raw.get(name)
    }

    /// The record exactly as received.
    #[must_use]
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// The record serialized as compact JSON text.
    #[must_use]
    pub fn to_raw_text(&self) -> String {
        self.raw.to_string()
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}

fn loose_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(text_of))
}

fn text_of(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .into_iter()
                .filter_map(text_of)
                .filter(|s| !s.trim().is_empty())
                .collect();
            if parts.is_empty() {
                None
            } else {
                Some(parts.join(", "))
            }
        }
        other => Some(other.to_string()),
    }
}

/// Body of a successful search response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchResponse {
    /// Raw result rows; the API sends `null` when nothing matched
    #[serde(default)]
    pub entries: Option<Vec<Value>>,
}

/// Records decoded from one page.
#[derive(Debug, Clone, Default)]
pub struct ResultBatch {
    /// Records that decoded as objects
    pub records: Vec<BreachRecord>,
    /// Number of rows the page carried, decodable or not
    pub entry_count: usize,
}

impl SearchResponse {
    /// Create a response carrying the given rows.
    #[must_use]
    pub fn from_entries(entries: Vec<Value>) -> Self {
        Self {
            entries: Some(entries),
        }
    }

    /// Number of rows in the response.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.entries.as_ref().map_or(0, Vec::len)
    }

    /// Decode the rows, skipping any that are not JSON objects.
    #[must_use]
    pub fn into_batch(self) -> ResultBatch {
        let entries = self.entries.unwrap_or_default();
        let entry_count = entries.len();

        let records: Vec<BreachRecord> = entries
            .into_iter()
            .filter_map(BreachRecord::from_value)
            .collect();

        let skipped = entry_count - records.len();
        if skipped > 0 {
            tracing::warn!("Skipped {} malformed Dehashed entries", skipped);
        }

        ResultBatch {
            records,
            entry_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_fields() {
        let record = BreachRecord::from_value(json!({
            "id": "123",
            "email": "x@example.com",
            "password": "p1",
            "hashed_password": "h1",
            "obtained_from": "BreachCo",
            "username": "xuser"
        }))
        .expect("object record");

        assert_eq!(record.email(), Some("x@example.com"));
        assert_eq!(record.password(), Some("p1"));
        assert_eq!(record.hashed_password(), Some("h1"));
        assert_eq!(record.obtained_from(), Some("BreachCo"));
        assert_eq!(record.field("username"), Some(&json!("xuser")));
    }

    #[test]
    fn test_blank_and_null_fields_are_absent() {
        let record = BreachRecord::from_value(json!({
            "email": "   ",
            "password": null,
            "hashed_password": "",
        }))
        .expect("object record");

        assert_eq!(record.email(), None);
        assert_eq!(record.password(), None);
        assert_eq!(record.hashed_password(), None);
        assert_eq!(record.obtained_from(), None);
    }

    #[test]
    fn test_loose_field_types() {
        let record = BreachRecord::from_value(json!({
            "email": ["x@example.com", ""],
            "password": 12345,
            "obtained_from": [],
        }))
        .expect("object record");

        assert_eq!(record.email(), Some("x@example.com"));
        assert_eq!(record.password(), Some("12345"));
        assert_eq!(record.obtained_from(), None);
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(BreachRecord::from_value(json!("x@example.com")).is_none());
        assert!(BreachRecord::from_value(json!(null)).is_none());
        assert!(BreachRecord::from_value(json!([1, 2])).is_none());
    }

    #[test]
    fn test_raw_text_keeps_original_shape() {
        let value = json!({"email": ["a@example.com", "b@example.com"], "extra": 1});
        let record = BreachRecord::from_value(value.clone()).expect("object record");
        let reparsed: Value = serde_json::from_str(&record.to_raw_text()).expect("valid JSON");
        assert_eq!(reparsed, value);
    }

    #[test]
    fn test_search_response_null_entries() {
        let response: SearchResponse =
            serde_json::from_str(r#"{"balance": 10, "entries": null, "success": true}"#)
                .expect("parse response");
        assert_eq!(response.entry_count(), 0);

        let batch = response.into_batch();
        assert!(batch.records.is_empty());
        assert_eq!(batch.entry_count, 0);
    }

    #[test]
    fn test_batch_counts_malformed_rows() {
        let response = SearchResponse::from_entries(vec![
            json!({"email": "a@example.com"}),
            json!("garbage"),
            json!({"email": "b@example.com"}),
        ]);

        let batch = response.into_batch();
        assert_eq!(batch.entry_count, 3);
        assert_eq!(batch.records.len(), 2);
    }
}
