//! # Till Engine
//!
//! The deterministic synchronization core of the Till point-of-sale
//! suite.
//!
//! Till devices work offline-first: every terminal holds a local copy of
//! every business entity and keeps trading with no connection. This
//! crate is the logic that reconciles those copies through a shared
//! server - which records changed, who wins a conflict, how records look
//! on the wire - with no IO of its own.
//!
//! ## Design Principles
//!
//! - **No IO**: the engine knows nothing about HTTP, files or databases
//! - **Deterministic**: timestamps come in as arguments, never from a clock
//! - **Testable**: pure functions over plain data, no mocks needed
//!
//! ## Core Concepts
//!
//! ### Records
//!
//! Every entity type shares one sync shape, [`SyncRecord`]: an immutable
//! id, `createdAt`/`updatedAt`/`deletedAt` timestamps, and an opaque bag
//! of entity fields that rides along untouched.
//!
//! ### The catalog
//!
//! [`EntityKind`] closes over the fifteen synchronized entity types,
//! from `products` to `auditLogs`, and knows which of their fields hold
//! structured data for the [`codec`].
//!
//! ### Conflict resolution
//!
//! [`reconcile::resolve`] picks a winner by wall-clock `updatedAt`
//! (falling back to `createdAt`), strictly: ties keep the stored record.
//! The pull side instead trusts the server outright via
//! [`merge::merge_records`].
//!
//! ### Sync state
//!
//! [`SyncState`] tracks the watermark, bootstrap flag, in-flight flag
//! and last error; [`PersistedState`] is the durable subset.
//!
//! ## Quick Start
//!
//! ```rust
//! use till_engine::{aggregator, codec, reconcile, DeviceStore, EntityKind, SyncRecord, Winner};
//! use chrono::{TimeZone, Utc};
//! use serde_json::json;
//!
//! let mut store = DeviceStore::new();
//!
//! let espresso = SyncRecord::new("prod-1")
//!     .with_created_at(Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap())
//!     .with_field("name", json!("Espresso"))
//!     .with_field("variants", json!([{"size": "double"}]));
//! store.upsert(EntityKind::Products, espresso.clone());
//!
//! // A device that has never synced pushes everything.
//! let changes = aggregator::collect_changes(&store, None);
//! assert_eq!(changes.records(EntityKind::Products).len(), 1);
//!
//! // Structured fields travel as JSON strings.
//! let wire = codec::encode(EntityKind::Products, espresso.clone());
//! assert!(wire.field("variants").unwrap().is_string());
//!
//! // Last write wins, strictly: equal timestamps keep what is stored.
//! assert_eq!(reconcile::resolve(&espresso, &espresso), Winner::Existing);
//! ```

pub mod aggregator;
pub mod audit;
pub mod catalog;
pub mod codec;
pub mod error;
pub mod merge;
pub mod protocol;
pub mod reconcile;
pub mod record;
pub mod state;
pub mod store;

// Re-export main types at crate root
pub use audit::{AuditAction, AuditRecorder};
pub use catalog::EntityKind;
pub use error::Error;
pub use protocol::{ChangeSet, PullResponse, PushReceipt, RawChanges};
pub use reconcile::Winner;
pub use record::SyncRecord;
pub use state::{PersistedState, SyncState, STATE_FORMAT_VERSION};
pub use store::{Collection, DeviceStore};

/// Type aliases for clarity
pub type RecordId = String;
pub type Timestamp = chrono::DateTime<chrono::Utc>;
