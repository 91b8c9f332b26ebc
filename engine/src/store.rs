//! The in-memory device store.
//!
//! One [`Collection`] per entity type, created empty at process start
//! and filled by local mutations or by pull-and-merge. Records do not
//! persist across restarts; only the sync watermark and bootstrap flag
//! do (see [`crate::state`]), which is why a restarted device full-pulls
//! its reference data back.

use crate::{EntityKind, SyncRecord};
use std::collections::BTreeMap;

/// An ordered collection of records for one entity type.
///
/// Insertion order is kept so pushes and merges stay deterministic.
/// No two records share an id after any mutation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Collection {
    records: Vec<SyncRecord>,
}

impl Collection {
    /// Create an empty collection.
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    /// Get a record by id.
    pub fn get(&self, id: &str) -> Option<&SyncRecord> {
        self.records.iter().find(|r| r.id == id)
    }

    /// Clone out every record.
    pub fn get_all(&self) -> Vec<SyncRecord> {
        self.records.clone()
    }

    /// Iterate over the records in order.
    pub fn iter(&self) -> std::slice::Iter<'_, SyncRecord> {
        self.records.iter()
    }

    /// Insert or replace by id. A new id appends, an existing id is
    /// overwritten in place, keeping its position.
    pub fn upsert(&mut self, record: SyncRecord) {
        match self.records.iter_mut().find(|r| r.id == record.id) {
            Some(slot) => *slot = record,
            None => self.records.push(record),
        }
    }

    /// Replace the whole collection. Duplicate ids in the input collapse
    /// to the last occurrence, keeping the position of the first.
    pub fn replace_all(&mut self, records: Vec<SyncRecord>) {
        self.records.clear();
        for record in records {
            self.upsert(record);
        }
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the collection holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a SyncRecord;
    type IntoIter = std::slice::Iter<'a, SyncRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl FromIterator<SyncRecord> for Collection {
    fn from_iter<I: IntoIterator<Item = SyncRecord>>(iter: I) -> Self {
        let mut collection = Collection::new();
        for record in iter {
            collection.upsert(record);
        }
        collection
    }
}

/// The full local dataset: one collection per catalog entity type.
///
/// This is the repository surface the sync coordinator is handed; it
/// never reaches past it into application state.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceStore {
    collections: BTreeMap<EntityKind, Collection>,
}

impl DeviceStore {
    /// Create a store with every collection present and empty.
    pub fn new() -> Self {
        let mut collections = BTreeMap::new();
        for kind in EntityKind::ALL {
            collections.insert(kind, Collection::new());
        }
        Self { collections }
    }

    /// Borrow one collection.
    pub fn collection(&self, kind: EntityKind) -> &Collection {
        // Every kind is seated in new(), so the entry always exists.
        &self.collections[&kind]
    }

    /// Get a record by entity type and id.
    pub fn get(&self, kind: EntityKind, id: &str) -> Option<&SyncRecord> {
        self.collection(kind).get(id)
    }

    /// Clone out every record of one entity type.
    pub fn get_all(&self, kind: EntityKind) -> Vec<SyncRecord> {
        self.collection(kind).get_all()
    }

    /// Insert or replace a record in its collection.
    pub fn upsert(&mut self, kind: EntityKind, record: SyncRecord) {
        self.collections.entry(kind).or_default().upsert(record);
    }

    /// Replace one collection's contents.
    pub fn replace_all(&mut self, kind: EntityKind, records: Vec<SyncRecord>) {
        self.collections
            .entry(kind)
            .or_default()
            .replace_all(records);
    }

    /// Whether one collection is empty.
    pub fn is_empty(&self, kind: EntityKind) -> bool {
        self.collection(kind).is_empty()
    }

    /// Whether any foundational collection is empty, which is what
    /// forces the coordinator into a full pull.
    pub fn missing_foundational_data(&self) -> bool {
        EntityKind::FOUNDATIONAL
            .into_iter()
            .any(|kind| self.is_empty(kind))
    }

    /// Total records across all collections.
    pub fn record_count(&self) -> usize {
        self.collections.values().map(Collection::len).sum()
    }
}

impl Default for DeviceStore {
    fn default() -> Self {
        Self::new()
    }
}
