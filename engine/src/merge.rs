//! Pull-side merge of remote changes into a local collection.
//!
//! This is not a second conflict policy. By the time a pull lands, the
//! server has already arbitrated this device's own push, so the pulled
//! record IS the resolved truth and overwrites the local copy by id,
//! regardless of timestamps.

use crate::SyncRecord;
use std::collections::HashMap;

/// Merge pulled records into a local collection.
///
/// Returns the union by id: every local record survives unless a remote
/// record shares its id, in which case the remote one replaces it in
/// place; remote records with new ids append in arrival order. Duplicate
/// ids inside either input collapse to the last occurrence, so the
/// result never holds two records with one id.
pub fn merge_records(local: &[SyncRecord], remote: &[SyncRecord]) -> Vec<SyncRecord> {
    let mut merged: Vec<SyncRecord> = Vec::with_capacity(local.len() + remote.len());
    let mut slots: HashMap<String, usize> = HashMap::with_capacity(local.len() + remote.len());

    for record in local.iter().chain(remote) {
        match slots.get(&record.id) {
            Some(&slot) => merged[slot] = record.clone(),
            None => {
                slots.insert(record.id.clone(), merged.len());
                merged.push(record.clone());
            }
        }
    }

    merged
}
