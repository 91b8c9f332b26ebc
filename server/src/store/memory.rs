//! In-memory record storage for running without a database.

use dashmap::DashMap;
use std::sync::Arc;
use till_engine::{EntityKind, SyncRecord, Timestamp};

use super::{RecordStore, StoreError};

/// Record storage backed by a concurrent in-process map.
///
/// Clones share the same map. Nothing survives a restart, which the
/// server warns about loudly at startup.
#[derive(Debug, Clone, Default)]
pub struct MemoryRecordStore {
    records: Arc<DashMap<(EntityKind, String), SyncRecord>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held across all entity types.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryRecordStore {
    async fn get(
        &self,
        entity: EntityKind,
        record_id: &str,
    ) -> Result<Option<SyncRecord>, StoreError> {
        Ok(self
            .records
            .get(&(entity, record_id.to_string()))
            .map(|entry| entry.value().clone()))
    }

    async fn upsert(&self, entity: EntityKind, record: &SyncRecord) -> Result<(), StoreError> {
        self.records
            .insert((entity, record.id.clone()), record.clone());
        Ok(())
    }

    async fn list_all(&self, entity: EntityKind) -> Result<Vec<SyncRecord>, StoreError> {
        let mut records: Vec<SyncRecord> = self
            .records
            .iter()
            .filter(|entry| entry.key().0 == entity)
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records)
    }

    async fn list_since(
        &self,
        entity: EntityKind,
        since: Timestamp,
    ) -> Result<Vec<SyncRecord>, StoreError> {
        // Mirrors the SQL filter: records without updatedAt only appear
        // in full pulls.
        let mut records: Vec<SyncRecord> = self
            .records
            .iter()
            .filter(|entry| entry.key().0 == entity)
            .filter(|entry| entry.value().updated_at.is_some_and(|at| at > since))
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn at(secs: i64) -> Timestamp {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[tokio::test]
    async fn upsert_and_get() {
        let store = MemoryRecordStore::new();
        let record = SyncRecord::new("p1").with_updated_at(at(100));

        store.upsert(EntityKind::Products, &record).await.unwrap();

        let found = store.get(EntityKind::Products, "p1").await.unwrap();
        assert_eq!(found, Some(record));
        assert!(store.get(EntityKind::Sales, "p1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn upsert_replaces_by_id() {
        let store = MemoryRecordStore::new();
        store
            .upsert(EntityKind::Products, &SyncRecord::new("p1").with_updated_at(at(100)))
            .await
            .unwrap();
        store
            .upsert(EntityKind::Products, &SyncRecord::new("p1").with_updated_at(at(200)))
            .await
            .unwrap();

        assert_eq!(store.len(), 1);
        let found = store.get(EntityKind::Products, "p1").await.unwrap().unwrap();
        assert_eq!(found.updated_at, Some(at(200)));
    }

    #[tokio::test]
    async fn list_all_is_ordered_by_id() {
        let store = MemoryRecordStore::new();
        for id in ["b", "c", "a"] {
            store
                .upsert(EntityKind::Sales, &SyncRecord::new(id))
                .await
                .unwrap();
        }

        let all = store.list_all(EntityKind::Sales).await.unwrap();
        let ids: Vec<&str> = all.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn list_since_is_strictly_after() {
        let store = MemoryRecordStore::new();
        store
            .upsert(EntityKind::Sales, &SyncRecord::new("on").with_updated_at(at(100)))
            .await
            .unwrap();
        store
            .upsert(EntityKind::Sales, &SyncRecord::new("after").with_updated_at(at(101)))
            .await
            .unwrap();
        store
            .upsert(EntityKind::Sales, &SyncRecord::new("untimestamped"))
            .await
            .unwrap();

        let since = store.list_since(EntityKind::Sales, at(100)).await.unwrap();
        let ids: Vec<&str> = since.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["after"]);

        // The untimestamped record still shows up in a full listing.
        assert_eq!(store.list_all(EntityKind::Sales).await.unwrap().len(), 3);
    }
}
