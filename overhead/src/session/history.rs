//! Durable session history.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::fs::{read_json, write_json_atomic, PersistenceError};

use super::model::FlightSession;

/// Full session table keyed by resolved identity.
pub type SessionTable = BTreeMap<String, FlightSession>;

/// Whole-collection persistence for session history.
///
/// The table is small, so every save rewrites it completely.
pub trait HistoryStore: Send + Sync {
    /// Load every stored session. A store with nothing saved yet returns
    /// an empty table.
    fn load(&self) -> Result<SessionTable, PersistenceError>;

    /// Replace the stored table.
    fn save(&self, sessions: &SessionTable) -> Result<(), PersistenceError>;
}

/// Pretty-printed JSON object keyed by identity.
#[derive(Debug, Clone)]
pub struct JsonHistoryStore {
    path: PathBuf,
}

impl JsonHistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl HistoryStore for JsonHistoryStore {
    fn load(&self) -> Result<SessionTable, PersistenceError> {
        Ok(read_json(&self.path)?.unwrap_or_default())
    }

    fn save(&self, sessions: &SessionTable) -> Result<(), PersistenceError> {
        write_json_atomic(&self.path, sessions)
    }
}
