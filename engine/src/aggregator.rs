//! Change aggregation: what a device sends when it pushes.

use crate::{codec, ChangeSet, DeviceStore, EntityKind, SyncRecord, Timestamp};

/// Collect every record changed since the watermark, per entity type,
/// already encoded for the wire.
///
/// A record counts as changed when its effective timestamp is strictly
/// after `since`; with no watermark at all, every record of every type
/// is changed. Every catalog type gets a key in the result, empty list
/// or not, so the server always sees the device's full type coverage.
pub fn collect_changes(store: &DeviceStore, since: Option<Timestamp>) -> ChangeSet {
    let mut changes = ChangeSet::new();
    for kind in EntityKind::ALL {
        let records = store
            .collection(kind)
            .iter()
            .filter(|record| changed_since(record, since))
            .cloned()
            .map(|record| codec::encode(kind, record))
            .collect();
        changes.insert(kind, records);
    }
    changes
}

fn changed_since(record: &SyncRecord, since: Option<Timestamp>) -> bool {
    match since {
        None => true,
        Some(since) => record
            .effective_timestamp()
            .is_some_and(|at| at > since),
    }
}
