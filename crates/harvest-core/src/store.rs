//! Session Persistence
//!
//! Read/replace storage for [`SessionDocument`]s. There are no transactions:
//! a replace overwrites whatever was stored under the same session id.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use harvest_events::SessionDocument;
use thiserror::Error;

/// Errors that can occur while reading or writing session documents.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid session id {0:?}")]
    InvalidId(String),
}

/// A keyed store of session documents.
pub trait SessionStore {
    /// Fetches the document for a session, if one was stored.
    fn read(&self, session_id: &str) -> Result<Option<SessionDocument>, StoreError>;

    /// Stores a document, replacing any previous one for the same session.
    fn replace(&mut self, document: &SessionDocument) -> Result<(), StoreError>;
}

/// In-process store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: HashMap<String, SessionDocument>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}

impl SessionStore for MemoryStore {
    fn read(&self, session_id: &str) -> Result<Option<SessionDocument>, StoreError> {
        Ok(self.documents.get(session_id).cloned())
    }

    fn replace(&mut self, document: &SessionDocument) -> Result<(), StoreError> {
        self.documents
            .insert(document.session_id.clone(), document.clone());
        Ok(())
    }
}

/// One pretty-printed JSON file per session in a directory.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Opens a store rooted at `dir`, creating the directory if needed.
    pub fn new(dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(dir)?;
        Ok(Self {
            dir: dir.to_path_buf(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File holding a session's document.
    pub fn path_for(&self, session_id: &str) -> Result<PathBuf, StoreError> {
        let valid = !session_id.is_empty()
            && session_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StoreError::InvalidId(session_id.to_string()));
        }
        Ok(self.dir.join(format!("{}.json", session_id)))
    }
}

impl SessionStore for JsonFileStore {
    fn read(&self, session_id: &str) -> Result<Option<SessionDocument>, StoreError> {
        let path = self.path_for(session_id)?;
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Ok(Some(SessionDocument::from_json(&content)?))
    }

    fn replace(&mut self, document: &SessionDocument) -> Result<(), StoreError> {
        let path = self.path_for(&document.session_id)?;
        fs::write(path, document.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harvest_events::fixtures;
    use tempfile::TempDir;

    #[test]
    fn test_memory_store_replaces() {
        let mut store = MemoryStore::new();
        let mut doc = fixtures::sample_document();
        assert!(store.read(&doc.session_id).unwrap().is_none());

        store.replace(&doc).unwrap();
        doc.day += 1;
        store.replace(&doc).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.read(&doc.session_id).unwrap(), Some(doc));
    }

    #[test]
    fn test_json_file_store_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::new(temp_dir.path()).unwrap();
        let doc = fixtures::sample_document();

        store.replace(&doc).unwrap();

        let path = store.path_for(&doc.session_id).unwrap();
        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"publicPool\""));
        assert_eq!(store.read(&doc.session_id).unwrap(), Some(doc));
    }

    #[test]
    fn test_json_file_store_missing_session() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(&temp_dir.path().join("nested")).unwrap();

        assert!(store.read("no-such-session").unwrap().is_none());
        assert!(store.dir().exists());
    }

    #[test]
    fn test_json_file_store_rejects_path_ids() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = JsonFileStore::new(temp_dir.path()).unwrap();
        let mut doc = fixtures::sample_document();
        doc.session_id = "../escape".to_string();

        assert!(matches!(
            store.replace(&doc),
            Err(StoreError::InvalidId(_))
        ));
    }

    #[test]
    fn test_corrupt_document_is_json_error() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path()).unwrap();
        fs::write(temp_dir.path().join("broken.json"), "{ not json").unwrap();

        assert!(matches!(store.read("broken"), Err(StoreError::Json(_))));
    }
}
