//! Wire types shared by the device and the server.
//!
//! Push bodies are typed ([`ChangeSet`]): the sender controls them, so
//! every key must be a catalog entity type. Responses coming back are
//! kept string-keyed ([`RawChanges`]) and matched against the catalog on
//! receipt, so an unknown key from a newer peer is skipped, not fatal.

use crate::{EntityKind, SyncRecord, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Entity-type keyed record lists as they appear on the wire when the
/// receiving side must tolerate unknown keys.
pub type RawChanges = BTreeMap<String, Vec<SyncRecord>>;

/// The push payload: per entity type, the records changed since the
/// watermark.
///
/// Every catalog type is present, empty lists included, which is the
/// push contract; a pull response, by contrast, omits empty types.
/// Backed by a `BTreeMap` so serialization order is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeSet {
    entries: BTreeMap<EntityKind, Vec<SyncRecord>>,
}

impl ChangeSet {
    /// An empty change set. Use [`ChangeSet::insert`] to fill it; the
    /// aggregator seats every catalog type.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the record list for one entity type.
    pub fn insert(&mut self, kind: EntityKind, records: Vec<SyncRecord>) {
        self.entries.insert(kind, records);
    }

    /// The records listed for one entity type; empty slice when the
    /// type is not present.
    pub fn records(&self, kind: EntityKind) -> &[SyncRecord] {
        self.entries.get(&kind).map_or(&[], Vec::as_slice)
    }

    /// Whether the entity type has a key, even with an empty list.
    pub fn contains(&self, kind: EntityKind) -> bool {
        self.entries.contains_key(&kind)
    }

    /// Iterate entity types with their record lists.
    pub fn iter(&self) -> impl Iterator<Item = (EntityKind, &[SyncRecord])> {
        self.entries.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    /// Total records across all entity types.
    pub fn record_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    /// Whether every list is empty.
    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }
}

/// Server acknowledgement of a push.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushReceipt {
    pub success: bool,
    /// Count of records that actually won reconciliation and were
    /// written; replayed pushes come back with 0.
    pub processed: u64,
}

/// Server response to a pull.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullResponse {
    pub success: bool,
    /// Changed records per entity type. Types with no changes are
    /// omitted entirely, never present with an empty list.
    pub changes: RawChanges,
    /// Server time when the response was assembled.
    pub timestamp: Timestamp,
}
