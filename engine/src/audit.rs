//! Audit trail entries for local mutations.
//!
//! Every local create, update and delete of a business record gets a
//! companion entry in the `auditLogs` collection. Entries are ordinary
//! syncable records: they are pushed, pulled and merged like everything
//! else, and are never mutated after creation. Pull-side merge writes
//! are replication, not operator intent, and are not audited.

use crate::{DeviceStore, EntityKind, SyncRecord, Timestamp};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use uuid::Uuid;

/// What happened to the audited record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditAction {
    Create,
    Update,
    Delete,
}

impl AuditAction {
    /// The wire name of this action.
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Create => "create",
            AuditAction::Update => "update",
            AuditAction::Delete => "delete",
        }
    }
}

/// Builds audit entries for one operator session.
///
/// Carries the operator identity and optional branch so call sites only
/// supply what changed.
#[derive(Debug, Clone)]
pub struct AuditRecorder {
    operator_id: String,
    branch_id: Option<String>,
}

impl AuditRecorder {
    /// Recorder for the given operator.
    pub fn new(operator_id: impl Into<String>) -> Self {
        Self {
            operator_id: operator_id.into(),
            branch_id: None,
        }
    }

    /// Builder-style branch context.
    pub fn with_branch(mut self, branch_id: impl Into<String>) -> Self {
        self.branch_id = Some(branch_id.into());
        self
    }

    /// Build one audit entry.
    ///
    /// `before` and `after` are snapshots of the audited record around
    /// the mutation; each is serialized to a JSON string once, here, and
    /// never re-encoded by the codec. Creates carry no `previousState`,
    /// deletes no `newState`.
    pub fn entry(
        &self,
        entity: EntityKind,
        action: AuditAction,
        before: Option<&Value>,
        after: Option<&Value>,
        at: Timestamp,
    ) -> SyncRecord {
        let mut record = SyncRecord::new(Uuid::new_v4().to_string())
            .with_created_at(at)
            .with_updated_at(at)
            .with_field("entityType", json!(entity.as_str()))
            .with_field("action", json!(action.as_str()))
            .with_field("operatorId", json!(self.operator_id));

        if let Some(branch_id) = &self.branch_id {
            record.set_field("branchId", json!(branch_id));
        }
        if let Some(before) = before {
            record.set_field("previousState", Value::String(before.to_string()));
        }
        if let Some(after) = after {
            record.set_field("newState", Value::String(after.to_string()));
        }

        record
    }

    /// Build an entry and append it to the store's audit collection.
    pub fn append(
        &self,
        store: &mut DeviceStore,
        entity: EntityKind,
        action: AuditAction,
        before: Option<&Value>,
        after: Option<&Value>,
        at: Timestamp,
    ) -> SyncRecord {
        let entry = self.entry(entity, action, before, after, at);
        store.upsert(EntityKind::AuditLogs, entry.clone());
        entry
    }
}
