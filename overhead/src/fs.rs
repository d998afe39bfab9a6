//! Whole-file JSON persistence helpers.
//!
//! History, the published export document and the aircraft database are all
//! small JSON files that are read or rewritten in one piece. Writes go to a
//! temporary file in the same directory and are renamed over the target, so
//! a reader never observes a half-written document.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Errors reading or writing a persisted document.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// Filesystem operation failed.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document could not be encoded or decoded.
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl PersistenceError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        PersistenceError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn json(path: &Path, source: serde_json::Error) -> Self {
        PersistenceError::Json {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Serialize `value` as pretty JSON and atomically replace `path`.
///
/// Creates the parent directory if it does not exist.
pub fn write_json_atomic<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> Result<(), PersistenceError> {
    let bytes = serde_json::to_vec_pretty(value).map_err(|e| PersistenceError::json(path, e))?;

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    };
    std::fs::create_dir_all(&dir).map_err(|e| PersistenceError::io(&dir, e))?;

    let mut tmp = tempfile::NamedTempFile::new_in(&dir).map_err(|e| PersistenceError::io(path, e))?;
    tmp.write_all(&bytes)
        .and_then(|_| tmp.flush())
        .map_err(|e| PersistenceError::io(path, e))?;
    tmp.persist(path)
        .map_err(|e| PersistenceError::io(path, e.error))?;

    Ok(())
}

/// Read a JSON document, returning `None` if the file does not exist.
pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, PersistenceError> {
    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(PersistenceError::io(path, e)),
    };

    serde_json::from_slice(&bytes)
        .map(Some)
        .map_err(|e| PersistenceError::json(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.json");

        let mut doc = BTreeMap::new();
        doc.insert("ASA416".to_string(), 0.42);
        write_json_atomic(&path, &doc).unwrap();

        let loaded: BTreeMap<String, f64> = read_json(&path).unwrap().unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_write_replaces_existing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("doc.json");

        write_json_atomic(&path, &vec![1, 2, 3]).unwrap();
        write_json_atomic(&path, &vec![4]).unwrap();

        let loaded: Vec<i32> = read_json(&path).unwrap().unwrap();
        assert_eq!(loaded, vec![4]);
    }

    #[test]
    fn test_write_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/deeper/doc.json");

        write_json_atomic(&path, "hello").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_read_missing_is_none() {
        let dir = TempDir::new().unwrap();
        let loaded: Option<Vec<i32>> = read_json(&dir.path().join("missing.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_read_invalid_json_is_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();

        let result: Result<Option<Vec<i32>>, _> = read_json(&path);
        assert!(matches!(result, Err(PersistenceError::Json { .. })));
    }
}
