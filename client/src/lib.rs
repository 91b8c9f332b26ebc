//! # Till Client
//!
//! The device-side half of Till synchronization: everything the engine
//! deliberately leaves out. This crate talks HTTP to the sync server,
//! persists the watermark between launches, and drives the
//! push-then-pull cycle around a [`till_engine::DeviceStore`].
//!
//! ## Shape
//!
//! - [`SyncCoordinator`] owns the local dataset and runs cycles
//! - [`SyncTransport`] is the wire seam; [`HttpTransport`] is the real one
//! - [`StateStore`] is the durability seam; [`FileStateStore`] writes a
//!   small JSON file atomically
//! - [`Connectivity`] lets the host short-circuit cycles while offline
//!
//! Every seam is a trait so tests (and embedders with exotic platforms)
//! can swap pieces without touching the cycle logic.
//!
//! ## Quick Start
//!
//! ```no_run
//! use till_client::{ClientConfig, SyncCoordinator};
//! use till_engine::{EntityKind, SyncRecord};
//! use chrono::Utc;
//! use serde_json::json;
//!
//! # async fn run() -> Result<(), till_client::TransportError> {
//! let config = ClientConfig::new("http://localhost:3000");
//! let client = SyncCoordinator::connect(&config, "till-state.json")?;
//!
//! // Trade offline: record a sale locally.
//! client.with_store(|store| {
//!     let sale = SyncRecord::new("sale-1")
//!         .with_created_at(Utc::now())
//!         .with_field("total", json!(12.5));
//!     store.upsert(EntityKind::Sales, sale);
//! });
//!
//! // Then sync whenever a trigger fires.
//! let outcome = client.sync().await;
//! println!("{outcome:?}");
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connectivity;
pub mod coordinator;
pub mod error;
pub mod persist;
pub mod transport;

// Re-export main types at crate root
pub use config::ClientConfig;
pub use connectivity::{AlwaysOnline, Connectivity};
pub use coordinator::{SyncCoordinator, SyncOutcome};
pub use error::{PersistError, TransportError};
pub use persist::{FileStateStore, MemoryStateStore, StateStore};
pub use transport::{HttpTransport, SyncTransport};
