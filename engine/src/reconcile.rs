//! Conflict resolution between a stored record and an incoming one.
//!
//! Last write wins on wall-clock time, nothing else: no vector clocks,
//! no field-level merging. The policy lives behind [`resolve`] so the
//! push path and any future alternative strategy share one seam.

use crate::SyncRecord;

/// Which side of a conflict survives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Winner {
    /// The stored record is kept; the incoming write is discarded.
    Existing,
    /// The incoming record replaces the stored one.
    Incoming,
}

/// Resolve one conflict by effective timestamp.
///
/// The incoming record wins only with a strictly newer
/// [`SyncRecord::effective_timestamp`]. Equal timestamps keep the stored
/// record, as does an incoming record with no timestamp at all; two
/// untimestamped records are a tie, which also keeps the stored one.
pub fn resolve(existing: &SyncRecord, incoming: &SyncRecord) -> Winner {
    if incoming.effective_timestamp() > existing.effective_timestamp() {
        Winner::Incoming
    } else {
        Winner::Existing
    }
}

/// Whether an incoming record should be written at all: yes when nothing
/// is stored under its id, otherwise only when it wins [`resolve`].
pub fn applies(existing: Option<&SyncRecord>, incoming: &SyncRecord) -> bool {
    match existing {
        None => true,
        Some(existing) => resolve(existing, incoming) == Winner::Incoming,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Timestamp;
    use chrono::{TimeZone, Utc};

    fn ts(secs: i64) -> Timestamp {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn newer_incoming_wins() {
        let existing = SyncRecord::new("a").with_updated_at(ts(1000));
        let incoming = SyncRecord::new("a").with_updated_at(ts(2000));
        assert_eq!(resolve(&existing, &incoming), Winner::Incoming);
    }

    #[test]
    fn older_incoming_loses() {
        let existing = SyncRecord::new("a").with_updated_at(ts(2000));
        let incoming = SyncRecord::new("a").with_updated_at(ts(1000));
        assert_eq!(resolve(&existing, &incoming), Winner::Existing);
    }

    #[test]
    fn equal_timestamps_keep_existing() {
        // The tie-break is strict on purpose: replaying the same write
        // must be a no-op, whichever device sent it.
        let existing = SyncRecord::new("a").with_updated_at(ts(1500));
        let incoming = SyncRecord::new("a").with_updated_at(ts(1500));
        assert_eq!(resolve(&existing, &incoming), Winner::Existing);
    }

    #[test]
    fn created_at_is_the_fallback_signal() {
        let existing = SyncRecord::new("a").with_created_at(ts(1000));
        let incoming = SyncRecord::new("a").with_created_at(ts(3000));
        assert_eq!(resolve(&existing, &incoming), Winner::Incoming);

        // updatedAt outranks a later createdAt on the other side.
        let existing = SyncRecord::new("a").with_updated_at(ts(5000));
        let incoming = SyncRecord::new("a").with_created_at(ts(3000));
        assert_eq!(resolve(&existing, &incoming), Winner::Existing);
    }

    #[test]
    fn untimestamped_incoming_never_wins() {
        let existing = SyncRecord::new("a").with_updated_at(ts(1));
        let incoming = SyncRecord::new("a");
        assert_eq!(resolve(&existing, &incoming), Winner::Existing);

        // Two untimestamped records tie, keeping the stored one.
        let existing = SyncRecord::new("a");
        let incoming = SyncRecord::new("a");
        assert_eq!(resolve(&existing, &incoming), Winner::Existing);
    }

    #[test]
    fn timestamped_incoming_beats_untimestamped_existing() {
        let existing = SyncRecord::new("a");
        let incoming = SyncRecord::new("a").with_created_at(ts(1));
        assert_eq!(resolve(&existing, &incoming), Winner::Incoming);
    }

    #[test]
    fn applies_fills_a_gap() {
        let incoming = SyncRecord::new("a");
        assert!(applies(None, &incoming));

        let existing = SyncRecord::new("a").with_updated_at(ts(10));
        assert!(!applies(Some(&existing), &incoming));
    }

    #[test]
    fn resolution_is_deterministic() {
        let left = SyncRecord::new("a").with_updated_at(ts(1234));
        let right = SyncRecord::new("a").with_updated_at(ts(1234));
        for _ in 0..10 {
            assert_eq!(resolve(&left, &right), Winner::Existing);
            assert_eq!(resolve(&right, &left), Winner::Existing);
        }
    }

    // Property-based tests using proptest
    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        fn record(updated: Option<i64>) -> SyncRecord {
            let mut record = SyncRecord::new("x");
            record.updated_at = updated.map(ts);
            record
        }

        proptest! {
            #[test]
            fn prop_incoming_needs_a_strictly_newer_timestamp(
                existing in proptest::option::of(0i64..100_000),
                incoming in proptest::option::of(0i64..100_000),
            ) {
                // Option<i64> orders exactly like the optional timestamps.
                match resolve(&record(existing), &record(incoming)) {
                    Winner::Incoming => prop_assert!(incoming > existing),
                    Winner::Existing => prop_assert!(incoming <= existing),
                }
            }

            #[test]
            fn prop_at_most_one_side_wins(
                existing in proptest::option::of(0i64..100_000),
                incoming in proptest::option::of(0i64..100_000),
            ) {
                let a = record(existing);
                let b = record(incoming);
                // The incoming slot cannot win from both directions.
                let forward = resolve(&a, &b);
                let backward = resolve(&b, &a);
                prop_assert!(!(forward == Winner::Incoming && backward == Winner::Incoming));
            }
        }
    }
}
