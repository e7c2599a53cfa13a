//! Envelope types: the unit of storage in the inbox.
//!
//! An envelope pairs a discriminator (the name of the payload schema) with a
//! JSON document holding the complete payload tree. Stores treat the document
//! as opaque apart from field-equality filtering.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Store-assigned envelope identifier. Immutable once assigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EnvelopeId(i64);

impl EnvelopeId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for EnvelopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EnvelopeId {
    fn from(raw: i64) -> Self {
        Self(raw)
    }
}

/// Serialized payload document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(Value);

impl Document {
    /// Wraps a JSON value.
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// Borrows the underlying JSON value.
    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Looks up a nested field by object keys, e.g. `["contact", "address", "city"]`.
    #[must_use]
    pub fn field<S: AsRef<str>>(&self, path: &[S]) -> Option<&Value> {
        path.iter()
            .try_fold(&self.0, |node, key| node.as_object()?.get(key.as_ref()))
    }
}

impl From<Value> for Document {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

/// An envelope that has not yet been persisted.
#[derive(Debug, Clone)]
pub struct NewEnvelope {
    /// Payload schema name.
    pub discriminator: String,
    /// Serialized payload.
    pub document: Document,
    /// Creation timestamp, taken from the caller's clock.
    pub created_at: DateTime<Utc>,
}

/// A stored envelope.
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    /// Store-assigned identifier.
    pub id: EnvelopeId,
    /// Payload schema name.
    pub discriminator: String,
    /// Serialized payload.
    pub document: Document,
    /// When the envelope was inserted.
    pub created_at: DateTime<Utc>,
    /// When the document was last replaced (equal to `created_at` until then).
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_field_walks_nested_objects() {
        let doc = Document::new(json!({
            "name": "Maddy Montaquila",
            "contact": {"address": {"city": "Camberwick Green"}}
        }));

        assert_eq!(
            doc.field(&["contact", "address", "city"]),
            Some(&json!("Camberwick Green"))
        );
        assert_eq!(doc.field(&["name"]), Some(&json!("Maddy Montaquila")));
    }

    #[test]
    fn test_field_returns_none_for_missing_or_non_object_segments() {
        let doc = Document::new(json!({"name": "x", "tags": ["a"]}));

        assert_eq!(doc.field(&["contact", "phone"]), None);
        assert_eq!(doc.field(&["name", "first"]), None);
        assert_eq!(doc.field(&["tags", "0"]), None);
    }

    #[test]
    fn test_empty_path_returns_root() {
        let doc = Document::new(json!({"a": 1}));
        let empty: [&str; 0] = [];
        assert_eq!(doc.field(&empty), Some(doc.as_value()));
    }

    #[test]
    fn test_envelope_id_serializes_as_bare_integer() {
        let id = EnvelopeId::new(7);
        assert_eq!(serde_json::to_value(id).unwrap(), json!(7));
        assert_eq!(id.to_string(), "7");
        assert_eq!(EnvelopeId::from(7).get(), 7);
    }
}
