//! The sync coordinator: one full push-then-pull cycle per trigger.
//!
//! Triggers arrive from anywhere in the host application (a timer, a
//! reconnect event, a user tapping "sync now"), so the coordinator is
//! shared behind `&self` and guards itself: offline devices are refused,
//! overlapping triggers collapse into the running cycle, and any failed
//! step leaves the watermark untouched for the next attempt.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use till_engine::{
    aggregator, codec, merge, DeviceStore, EntityKind, RawChanges, SyncRecord, SyncState,
};

use crate::connectivity::{AlwaysOnline, Connectivity};
use crate::error::TransportError;
use crate::persist::{FileStateStore, StateStore};
use crate::transport::{HttpTransport, SyncTransport};
use crate::ClientConfig;

/// How a sync trigger ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The full cycle ran. `pushed` records went out, the server
    /// reported `processed` of them applied, `pulled` records came back
    /// and were merged.
    Completed {
        pushed: u64,
        processed: u64,
        pulled: u64,
    },
    /// The device reported no connectivity; nothing was attempted.
    Offline,
    /// Another cycle was already running; this trigger did nothing.
    AlreadyInFlight,
    /// A step failed. The watermark did not move, and the detail is
    /// also kept in [`SyncState::last_error`].
    Failed(String),
}

/// Drives sync cycles against injected transport, connectivity and
/// state storage.
pub struct SyncCoordinator<T, C, P> {
    store: Mutex<DeviceStore>,
    transport: T,
    connectivity: C,
    persist: P,
    state: Mutex<SyncState>,
    in_flight: AtomicBool,
}

impl SyncCoordinator<HttpTransport, AlwaysOnline, FileStateStore> {
    /// Wire up the default production stack: HTTP transport, no
    /// connectivity probe, file-backed state.
    pub fn connect(
        config: &ClientConfig,
        state_path: impl Into<PathBuf>,
    ) -> Result<Self, TransportError> {
        let transport = HttpTransport::new(config)?;
        Ok(Self::new(
            DeviceStore::new(),
            transport,
            AlwaysOnline,
            FileStateStore::new(state_path),
        ))
    }
}

impl<T, C, P> SyncCoordinator<T, C, P>
where
    T: SyncTransport,
    C: Connectivity,
    P: StateStore,
{
    /// Create a coordinator around an existing local dataset.
    ///
    /// Persisted sync state is loaded here; an unreadable state file is
    /// discarded with a warning, and the device bootstraps again.
    pub fn new(store: DeviceStore, transport: T, connectivity: C, persist: P) -> Self {
        let state = match persist.load() {
            Ok(Some(persisted)) => SyncState::from_persisted(persisted),
            Ok(None) => SyncState::new(),
            Err(e) => {
                tracing::warn!("Discarding unreadable sync state: {}", e);
                SyncState::new()
            }
        };

        Self {
            store: Mutex::new(store),
            transport,
            connectivity,
            persist,
            state: Mutex::new(state),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Run `f` against the local dataset.
    ///
    /// This is how the host application records sales, edits products
    /// and reads reference data between cycles.
    pub fn with_store<R>(&self, f: impl FnOnce(&mut DeviceStore) -> R) -> R {
        f(&mut self.store_guard())
    }

    /// Snapshot of the current sync status.
    pub fn status(&self) -> SyncState {
        self.state_guard().clone()
    }

    /// Run one sync cycle: push local changes, then pull and merge
    /// remote ones.
    ///
    /// Never returns an error; failures land in the outcome and in
    /// [`SyncState::last_error`] so a POS terminal keeps trading no
    /// matter what the network does.
    pub async fn sync(&self) -> SyncOutcome {
        if !self.connectivity.is_online() {
            tracing::debug!("Skipping sync, device is offline");
            return SyncOutcome::Offline;
        }

        // Single flight: whoever flips the flag owns the cycle.
        if self.in_flight.swap(true, Ordering::SeqCst) {
            tracing::debug!("Sync already in flight");
            return SyncOutcome::AlreadyInFlight;
        }
        self.state_guard().is_syncing = true;

        let outcome = match self.run_cycle().await {
            Ok((pushed, processed, pulled)) => {
                let mut state = self.state_guard();
                state.complete(Utc::now());
                self.persist_state(&state);
                tracing::info!(
                    "Sync completed: pushed {}, server applied {}, pulled {}",
                    pushed,
                    processed,
                    pulled
                );
                SyncOutcome::Completed {
                    pushed,
                    processed,
                    pulled,
                }
            }
            Err(e) => {
                let message = e.to_string();
                tracing::error!("Sync failed: {}", message);
                let mut state = self.state_guard();
                state.fail(message.clone());
                self.persist_state(&state);
                SyncOutcome::Failed(message)
            }
        };

        self.in_flight.store(false, Ordering::SeqCst);
        outcome
    }

    /// Push first, so the server never hands back changes this device
    /// is about to overwrite in the same cycle.
    async fn run_cycle(&self) -> Result<(u64, u64, u64), TransportError> {
        let watermark = self.state_guard().last_sync_at;

        let changes = aggregator::collect_changes(&self.store_guard(), watermark);
        let pushed = changes.record_count() as u64;
        tracing::debug!("Pushing {} changed records", pushed);

        let receipt = self.transport.push(&changes).await?;
        if !receipt.success {
            return Err(TransportError::InvalidResponse(
                "push was not acknowledged".to_string(),
            ));
        }

        // The pull window is decided independently of the push window:
        // a device that has never completed a cycle, or that lost its
        // reference data, pulls everything.
        let full = !self.state_guard().has_bootstrapped
            || self.store_guard().missing_foundational_data();
        let since = if full {
            tracing::info!("Running a full pull (bootstrap or missing reference data)");
            None
        } else {
            watermark
        };

        let response = self.transport.pull(since).await?;
        if !response.success {
            return Err(TransportError::InvalidResponse(
                "pull was not acknowledged".to_string(),
            ));
        }

        let pulled = self.apply_changes(response.changes);
        Ok((pushed, receipt.processed, pulled))
    }

    /// Decode and merge pulled changes into the local dataset. Entity
    /// types outside the catalog are skipped, never fatal.
    fn apply_changes(&self, changes: RawChanges) -> u64 {
        let mut store = self.store_guard();
        let mut pulled: u64 = 0;

        for (name, records) in changes {
            let Some(entity) = EntityKind::from_name(&name) else {
                tracing::warn!("Ignoring unknown entity type in pull: {}", name);
                continue;
            };

            let decoded: Vec<SyncRecord> = records
                .into_iter()
                .map(|record| codec::decode(entity, record))
                .collect();
            pulled += decoded.len() as u64;

            let merged = merge::merge_records(&store.get_all(entity), &decoded);
            store.replace_all(entity, merged);
        }

        pulled
    }

    fn persist_state(&self, state: &SyncState) {
        if let Err(e) = self.persist.save(&state.to_persisted()) {
            tracing::warn!("Failed to persist sync state: {}", e);
        }
    }

    fn store_guard(&self) -> MutexGuard<'_, DeviceStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn state_guard(&self) -> MutexGuard<'_, SyncState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
