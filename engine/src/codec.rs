//! Wire codec for structured fields.
//!
//! The transport predates this engine and carries structured fields
//! (arrays, nested objects) as JSON strings inside the record object.
//! The codec is the single place that knows which fields those are, per
//! entity type, via [`EntityKind::structured_fields`].
//!
//! Decoding fails closed per field: a string that does not parse back
//! into an array or object is left exactly as it arrived. One corrupt
//! field never blocks the record, let alone the cycle.

use crate::{EntityKind, SyncRecord};
use serde_json::Value;

/// Prepare a record for the wire: structured fields become JSON strings.
///
/// Fields already carrying strings or scalars pass through untouched, so
/// encoding an already-encoded record is a no-op.
pub fn encode(kind: EntityKind, mut record: SyncRecord) -> SyncRecord {
    for &field in kind.structured_fields() {
        if let Some(value) = record.fields.get_mut(field) {
            if value.is_array() || value.is_object() {
                *value = Value::String(value.to_string());
            }
        }
    }
    record
}

/// Restore structured fields from their wire form.
///
/// A string value is replaced only when it parses to an array or object;
/// already-structured values pass through (decoding twice is safe), and
/// anything else, including malformed JSON, keeps its raw value.
pub fn decode(kind: EntityKind, mut record: SyncRecord) -> SyncRecord {
    for &field in kind.structured_fields() {
        if let Some(value) = record.fields.get_mut(field) {
            if let Value::String(raw) = value {
                match serde_json::from_str::<Value>(raw) {
                    Ok(parsed @ (Value::Array(_) | Value::Object(_))) => *value = parsed,
                    _ => {}
                }
            }
        }
    }
    record
}
