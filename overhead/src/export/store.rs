//! Export document persistence.

use std::path::{Path, PathBuf};

use crate::fs::{write_json_atomic, PersistenceError};

use super::model::WebExportSnapshot;

/// Destination for the published document.
pub trait ExportStore: Send + Sync {
    /// Replace the published document.
    fn write(&self, snapshot: &WebExportSnapshot) -> Result<(), PersistenceError>;
}

/// Writes the document as pretty JSON, atomically.
#[derive(Debug, Clone)]
pub struct JsonExportStore {
    path: PathBuf,
}

impl JsonExportStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ExportStore for JsonExportStore {
    fn write(&self, snapshot: &WebExportSnapshot) -> Result<(), PersistenceError> {
        write_json_atomic(&self.path, snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::model::ExportStatus;
    use crate::fs::read_json;
    use chrono::Utc;
    use tempfile::TempDir;

    #[test]
    fn test_write_replaces_document() {
        let dir = TempDir::new().unwrap();
        let store = JsonExportStore::new(dir.path().join("web/flights-web.json"));

        store.write(&WebExportSnapshot::waiting(Utc::now())).unwrap();
        let doc: WebExportSnapshot = read_json(store.path()).unwrap().unwrap();
        assert_eq!(doc.status, ExportStatus::Waiting);
    }
}
