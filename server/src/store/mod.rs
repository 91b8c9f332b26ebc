//! Record storage backends.
//!
//! Handlers talk to storage through [`RecordStore`], so the sync
//! endpoints run against PostgreSQL in production and an in-memory map
//! in tests or when no database is configured.

mod memory;
mod postgres;

pub use memory::MemoryRecordStore;
pub use postgres::{create_pool, run_migrations, PgRecordStore, Pool};

use till_engine::{EntityKind, SyncRecord, Timestamp};

/// Storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Per-record storage operations used by the sync handlers.
#[allow(async_fn_in_trait)]
pub trait RecordStore {
    /// Fetch one record by entity type and id.
    async fn get(
        &self,
        entity: EntityKind,
        record_id: &str,
    ) -> Result<Option<SyncRecord>, StoreError>;

    /// Insert or replace a record.
    async fn upsert(&self, entity: EntityKind, record: &SyncRecord) -> Result<(), StoreError>;

    /// Every record of one entity type, ordered by id.
    async fn list_all(&self, entity: EntityKind) -> Result<Vec<SyncRecord>, StoreError>;

    /// Records of one entity type updated strictly after `since`,
    /// ordered by id. Records without `updatedAt` never match.
    async fn list_since(
        &self,
        entity: EntityKind,
        since: Timestamp,
    ) -> Result<Vec<SyncRecord>, StoreError>;
}

/// The storage backend picked at startup.
#[derive(Debug, Clone)]
pub enum AnyStore {
    Postgres(PgRecordStore),
    Memory(MemoryRecordStore),
}

impl AnyStore {
    pub fn postgres(pool: Pool) -> Self {
        AnyStore::Postgres(PgRecordStore::new(pool))
    }

    pub fn memory() -> Self {
        AnyStore::Memory(MemoryRecordStore::new())
    }
}

impl RecordStore for AnyStore {
    async fn get(
        &self,
        entity: EntityKind,
        record_id: &str,
    ) -> Result<Option<SyncRecord>, StoreError> {
        match self {
            AnyStore::Postgres(store) => store.get(entity, record_id).await,
            AnyStore::Memory(store) => store.get(entity, record_id).await,
        }
    }

    async fn upsert(&self, entity: EntityKind, record: &SyncRecord) -> Result<(), StoreError> {
        match self {
            AnyStore::Postgres(store) => store.upsert(entity, record).await,
            AnyStore::Memory(store) => store.upsert(entity, record).await,
        }
    }

    async fn list_all(&self, entity: EntityKind) -> Result<Vec<SyncRecord>, StoreError> {
        match self {
            AnyStore::Postgres(store) => store.list_all(entity).await,
            AnyStore::Memory(store) => store.list_all(entity).await,
        }
    }

    async fn list_since(
        &self,
        entity: EntityKind,
        since: Timestamp,
    ) -> Result<Vec<SyncRecord>, StoreError> {
        match self {
            AnyStore::Postgres(store) => store.list_since(entity, since).await,
            AnyStore::Memory(store) => store.list_since(entity, since).await,
        }
    }
}
