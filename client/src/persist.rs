//! Durable sync state.
//!
//! Only the watermark and the bootstrap flag survive a restart, and a
//! state file that fails to load is discarded rather than trusted: the
//! device then simply bootstraps again with a full pull.

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use till_engine::PersistedState;

use crate::error::PersistError;

/// Where a device keeps its persisted sync state.
pub trait StateStore {
    /// Load the stored state; `None` on first run.
    fn load(&self) -> Result<Option<PersistedState>, PersistError>;

    /// Replace the stored state.
    fn save(&self, state: &PersistedState) -> Result<(), PersistError>;
}

/// Sync state persisted to a JSON file.
#[derive(Debug, Clone)]
pub struct FileStateStore {
    path: PathBuf,
}

impl FileStateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl StateStore for FileStateStore {
    fn load(&self) -> Result<Option<PersistedState>, PersistError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(PersistedState::from_json(&raw)?))
    }

    fn save(&self, state: &PersistedState) -> Result<(), PersistError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Write-then-rename so a crash mid-save cannot leave a torn file.
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, state.to_json()?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Sync state held in memory, for tests and ephemeral devices.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    state: Mutex<Option<PersistedState>>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn load(&self) -> Result<Option<PersistedState>, PersistError> {
        let guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(guard.clone())
    }

    fn save(&self, state: &PersistedState) -> Result<(), PersistError> {
        let mut guard = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(state.clone());
        Ok(())
    }
}
