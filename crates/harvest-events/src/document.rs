//! Persistence Document
//!
//! The record a remote store keeps per session. Stores only need read and
//! replace semantics for it.

use serde::{Deserialize, Serialize};

/// Generates a fresh session identity.
pub fn generate_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Per-session document shared with the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionDocument {
    pub session_id: String,
    pub day: u32,
    pub public_pool: i64,
    pub sentiment_label: String,
}

impl SessionDocument {
    /// Parses a document from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serializes the document to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_uses_camel_case_keys() {
        let doc = SessionDocument {
            session_id: "s-1".to_string(),
            day: 4,
            public_pool: 180,
            sentiment_label: "fear".to_string(),
        };
        let json = doc.to_json().unwrap();
        assert!(json.contains("\"publicPool\": 180"));
        assert!(json.contains("\"sentimentLabel\": \"fear\""));
        assert_eq!(SessionDocument::from_json(&json).unwrap(), doc);
    }

    #[test]
    fn test_session_ids_are_unique() {
        let a = generate_session_id();
        let b = generate_session_id();
        assert_ne!(a, b);
        assert_eq!(a.len(), 36);
    }
}
