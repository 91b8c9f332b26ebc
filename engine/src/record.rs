//! The record shape shared by every synchronized entity type.

use crate::{RecordId, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A synchronizable record.
///
/// Only identity and timestamps are typed; every other field of the
/// underlying entity rides along untouched in [`SyncRecord::fields`] and
/// is flattened on the wire, so the JSON form is the flat object the
/// server and other devices exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRecord {
    /// Globally unique within the record's entity type. Assigned by
    /// whichever side first created the record and never reused.
    /// Wire input without an id deserializes to an empty string and is
    /// skipped by the push handler.
    #[serde(default)]
    pub id: RecordId,
    /// Set once at creation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<Timestamp>,
    /// Re-set on every mutation; the sole ordering signal for conflict
    /// resolution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
    /// Soft-delete marker. Carried and round-tripped, but deliberately
    /// not interpreted by reconciliation or merge.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<Timestamp>,
    /// Everything else the entity carries.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl SyncRecord {
    /// Create an empty record with the given id.
    pub fn new(id: impl Into<RecordId>) -> Self {
        Self {
            id: id.into(),
            created_at: None,
            updated_at: None,
            deleted_at: None,
            fields: Map::new(),
        }
    }

    /// Builder-style creation timestamp.
    pub fn with_created_at(mut self, at: Timestamp) -> Self {
        self.created_at = Some(at);
        self
    }

    /// Builder-style update timestamp.
    pub fn with_updated_at(mut self, at: Timestamp) -> Self {
        self.updated_at = Some(at);
        self
    }

    /// Builder-style field assignment.
    pub fn with_field(mut self, name: impl Into<String>, value: Value) -> Self {
        self.fields.insert(name.into(), value);
        self
    }

    /// Get a non-timestamp field by name.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Set a non-timestamp field.
    pub fn set_field(&mut self, name: impl Into<String>, value: Value) {
        self.fields.insert(name.into(), value);
    }

    /// Mark the record as mutated at `at`.
    pub fn touch(&mut self, at: Timestamp) {
        self.updated_at = Some(at);
    }

    /// The timestamp conflict resolution orders by: `updatedAt`, falling
    /// back to `createdAt`.
    ///
    /// `None` sorts below every concrete timestamp, so a record missing
    /// both is excluded from incremental pushes and never overwrites a
    /// timestamped record under last-write-wins.
    pub fn effective_timestamp(&self) -> Option<Timestamp> {
        self.updated_at.or(self.created_at)
    }
}
