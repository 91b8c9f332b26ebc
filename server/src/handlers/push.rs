//! Push handler - applies device changes to stored records.

use till_engine::{reconcile, EntityKind, PushReceipt, RawChanges};

use crate::error::Result;
use crate::store::RecordStore;

/// Process a push request from a device.
///
/// The body maps entity type names to record lists. Every record is
/// resolved independently against the stored copy under last-write-wins,
/// and `processed` counts only the records that were actually written.
/// Replaying a push is therefore harmless: the second run applies
/// nothing and reports 0.
pub async fn handle_push<S: RecordStore>(store: &S, changes: RawChanges) -> Result<PushReceipt> {
    let mut processed: u64 = 0;

    for (name, records) in &changes {
        let Some(entity) = EntityKind::from_name(name) else {
            tracing::warn!("Ignoring unknown entity type in push: {}", name);
            continue;
        };

        for record in records {
            if record.id.is_empty() {
                tracing::warn!("Ignoring {} record without an id", entity);
                continue;
            }

            let existing = store.get(entity, &record.id).await?;
            if reconcile::applies(existing.as_ref(), record) {
                store.upsert(entity, record).await?;
                processed += 1;
            }
        }
    }

    tracing::debug!("Push applied {} records", processed);

    Ok(PushReceipt {
        success: true,
        processed,
    })
}
