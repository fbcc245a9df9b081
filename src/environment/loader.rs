//! Loader for exported environment/variable fixtures.
//!
//! The desktop app exports settings as JSON documents holding arrays of
//! environments and variables. This module reads such a document (from a
//! string or a file) into an [`InMemoryStore`](super::InMemoryStore).

use super::models::{Environment, Variable};
use super::InMemoryStore;
use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;

/// Errors raised by variable stores and fixture loading.
#[derive(Debug, Clone, PartialEq)]
pub enum StoreError {
    /// The requested file or record does not exist.
    NotFound(String),

    /// Failed to parse JSON content.
    Parse(String),

    /// IO error occurred while reading.
    Io(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreError::NotFound(what) => write!(f, "Not found: {}", what),
            StoreError::Parse(msg) => write!(f, "Failed to parse store data: {}", msg),
            StoreError::Io(msg) => write!(f, "IO error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

impl From<io::Error> for StoreError {
    fn from(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            StoreError::NotFound(err.to_string())
        } else {
            StoreError::Io(err.to_string())
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        StoreError::Parse(err.to_string())
    }
}

#[derive(Debug, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    environments: Vec<Environment>,
    #[serde(default)]
    variables: Vec<Variable>,
}

/// Parses a JSON document of the form
/// `{"environments": [...], "variables": [...]}` into a store.
pub fn load_store_from_str(content: &str) -> Result<InMemoryStore, StoreError> {
    let doc: StoreDocument = serde_json::from_str(content)?;
    log::debug!(
        "loaded {} environments and {} variables",
        doc.environments.len(),
        doc.variables.len()
    );

    let store = InMemoryStore::new();
    for env in doc.environments {
        store.add_environment(env);
    }
    for variable in doc.variables {
        store.add_variable(variable);
    }
    Ok(store)
}

/// Reads and parses a store document from disk.
pub fn load_store(path: &Path) -> Result<InMemoryStore, StoreError> {
    let content = fs::read_to_string(path)?;
    load_store_from_str(&content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{VariableCategory, VariableStore};
    use tempfile::TempDir;

    const FIXTURE: &str = r#"{
        "environments": [
            {"id": "e1", "collection": "c1", "name": "dev", "enabled": "1"},
            {"id": "e2", "collection": "c1", "name": "prod", "enabled": "0"}
        ],
        "variables": [
            {"id": "v1", "category": "env", "collection": "c1", "environment": "e1",
             "name": "host", "value": "dev.local", "enabled": "1"},
            {"id": "v2", "category": "customize", "collection": "c1", "environment": "",
             "name": "token", "value": "abc", "enabled": "1"}
        ]
    }"#;

    #[tokio::test]
    async fn test_load_store_from_str() {
        let store = load_store_from_str(FIXTURE).unwrap();

        let envs = store.list_environments("c1").await.unwrap();
        assert_eq!(envs.len(), 2);

        let vars = store
            .list_variables("c1", VariableCategory::Environment)
            .await
            .unwrap();
        assert_eq!(vars.len(), 1);
        assert_eq!(vars[0].value, "dev.local");
    }

    #[test]
    fn test_load_store_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("store.json");
        std::fs::write(&path, FIXTURE).unwrap();

        assert!(load_store(&path).is_ok());
    }

    #[test]
    fn test_load_store_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = load_store(&dir.path().join("nope.json"));
        assert!(matches!(result, Err(StoreError::NotFound(_))));
    }

    #[test]
    fn test_load_store_invalid_json() {
        let result = load_store_from_str("{not json");
        assert!(matches!(result, Err(StoreError::Parse(_))));
    }

    #[test]
    fn test_empty_document() {
        assert!(load_store_from_str("{}").is_ok());
    }
}
