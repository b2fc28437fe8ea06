//! Evidence reference model.
//!
//! A reference is a document identifier plus short text excerpts
//! supporting a given answer. The backend may return partially-populated
//! payloads, so deserialization applies defaults: a missing snippet
//! collection becomes empty and a missing document name falls back to a
//! placeholder label. The UI never breaks on a sparse payload.

use serde::{Deserialize, Serialize};

fn default_document_name() -> String {
    "Document".to_string()
}

/// Evidence tied to an answered question or to a source document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reference {
    /// Backend identifier of the source document.
    pub document_id: i64,
    /// Display name of the source document.
    #[serde(default = "default_document_name")]
    pub document_name: String,
    /// Short text excerpts, in backend order.
    #[serde(default)]
    pub snippets: Vec<String>,
}

/// A previously saved question/answer exchange, as listed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedExchange {
    pub id: i64,
    pub question: String,
    pub answer: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_get_defaults() {
        let reference: Reference = serde_json::from_str(r#"{"document_id": 7}"#).unwrap();
        assert_eq!(reference.document_name, "Document");
        assert!(reference.snippets.is_empty());
    }

    #[test]
    fn fully_populated_reference_round_trips() {
        let json = r#"{"document_id":1,"document_name":"doc.pdf","snippets":["..."]}"#;
        let reference: Reference = serde_json::from_str(json).unwrap();
        assert_eq!(reference.document_name, "doc.pdf");
        assert_eq!(reference.snippets, vec!["...".to_string()]);
    }
}
