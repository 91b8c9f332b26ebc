//! Per-device sync state and its persisted form.
//!
//! A device carries exactly one [`SyncState`]. Only the watermark and
//! the bootstrap flag survive a restart; the in-flight flag and the last
//! error are session-scoped and reset to their defaults on load.

use crate::{error::Result, Error, Timestamp};
use serde::{Deserialize, Serialize};

/// Version of the persisted state format for future compatibility.
pub const STATE_FORMAT_VERSION: u32 = 1;

/// The live sync status of one device.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncState {
    /// Completion time of the last fully successful cycle. Advances only
    /// on success and never moves backward.
    pub last_sync_at: Option<Timestamp>,
    /// True once any cycle has completed, successfully or not.
    pub has_bootstrapped: bool,
    /// True only while a cycle is in flight.
    pub is_syncing: bool,
    /// Detail of the last failed cycle; cleared by the next success.
    pub last_error: Option<String>,
}

impl SyncState {
    /// Fresh state for a device that has never synced.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rehydrate from the persisted subset.
    pub fn from_persisted(persisted: PersistedState) -> Self {
        Self {
            last_sync_at: persisted.last_sync_at,
            has_bootstrapped: persisted.has_bootstrapped,
            is_syncing: false,
            last_error: None,
        }
    }

    /// The durable subset of this state.
    pub fn to_persisted(&self) -> PersistedState {
        PersistedState {
            format_version: STATE_FORMAT_VERSION,
            last_sync_at: self.last_sync_at,
            has_bootstrapped: self.has_bootstrapped,
        }
    }

    /// Record a successful cycle completed at `at`.
    pub fn complete(&mut self, at: Timestamp) {
        self.last_sync_at = Some(at);
        self.has_bootstrapped = true;
        self.is_syncing = false;
        self.last_error = None;
    }

    /// Record a failed cycle.
    ///
    /// The watermark stays put, but the device still counts as
    /// bootstrapped: one bad first attempt must not force full pulls
    /// forever.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.has_bootstrapped = true;
        self.is_syncing = false;
        self.last_error = Some(message.into());
    }
}

/// What survives a restart: the watermark and the bootstrap flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedState {
    /// Persisted format version.
    #[serde(default = "default_format_version")]
    pub format_version: u32,
    pub last_sync_at: Option<Timestamp>,
    #[serde(default)]
    pub has_bootstrapped: bool,
}

fn default_format_version() -> u32 {
    STATE_FORMAT_VERSION
}

impl PersistedState {
    /// Serialize to JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| Error::InvalidState(e.to_string()))
    }

    /// Deserialize from JSON, rejecting formats newer than this build
    /// understands.
    pub fn from_json(json: &str) -> Result<Self> {
        let state: Self =
            serde_json::from_str(json).map_err(|e| Error::InvalidState(e.to_string()))?;

        if state.format_version > STATE_FORMAT_VERSION {
            return Err(Error::InvalidState(format!(
                "unsupported state format version: {} (max supported: {})",
                state.format_version, STATE_FORMAT_VERSION
            )));
        }

        Ok(state)
    }
}
