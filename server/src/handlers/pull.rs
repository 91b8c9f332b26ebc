//! Pull handler - serves changed records back to devices.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use till_engine::{EntityKind, PullResponse, RawChanges, Timestamp};

use crate::error::Result;
use crate::store::RecordStore;

/// Query parameters for pull sync.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PullQuery {
    /// Watermark from the device's last successful sync, RFC 3339.
    /// Omitted (or unparseable) means a full pull.
    pub since: Option<String>,
}

/// Process a pull request from a device.
///
/// Returns, per entity type, every record updated strictly after
/// `since`. Entity types with nothing to report are left out of the
/// response entirely. The filter looks at `updatedAt` alone; records
/// carrying only `createdAt` travel exclusively in full pulls.
pub async fn handle_pull<S: RecordStore>(store: &S, query: PullQuery) -> Result<PullResponse> {
    let since = parse_since(query.since.as_deref());

    let mut changes = RawChanges::new();
    for entity in EntityKind::ALL {
        let records = match since {
            Some(at) => store.list_since(entity, at).await?,
            None => store.list_all(entity).await?,
        };
        if !records.is_empty() {
            changes.insert(entity.as_str().to_string(), records);
        }
    }

    Ok(PullResponse {
        success: true,
        changes,
        timestamp: Utc::now(),
    })
}

/// Parse the `since` watermark, falling back to a full pull when it
/// does not parse. A device with a corrupt watermark recovers on its
/// own that way instead of being locked out.
fn parse_since(raw: Option<&str>) -> Option<Timestamp> {
    let raw = raw?;
    match DateTime::parse_from_rfc3339(raw) {
        Ok(at) => Some(at.with_timezone(&Utc)),
        Err(e) => {
            tracing::warn!("Malformed since parameter {:?}, serving a full pull: {}", raw, e);
            None
        }
    }
}
