//! PostgreSQL-backed record storage.

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use till_engine::{EntityKind, SyncRecord, Timestamp};

use super::{RecordStore, StoreError};

/// Type alias for the database pool.
pub type Pool = PgPool;

/// Create a new database connection pool.
pub async fn create_pool(database_url: &str) -> Result<Pool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Run database migrations.
pub async fn run_migrations(pool: &Pool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

/// Record storage on top of PostgreSQL.
///
/// One row per (entity, record id). Timestamps live in their own columns
/// so the pull filter runs in SQL; everything else the record carries
/// sits in a JSONB payload.
#[derive(Debug, Clone)]
pub struct PgRecordStore {
    pool: Pool,
}

impl PgRecordStore {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }
}

/// A stored record row from the database.
#[derive(Debug)]
struct RecordRow {
    record_id: String,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    deleted_at: Option<DateTime<Utc>>,
    payload: Value,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for RecordRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> Result<Self, sqlx::Error> {
        Ok(RecordRow {
            record_id: row.try_get("record_id")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
            deleted_at: row.try_get("deleted_at")?,
            payload: row.try_get("payload")?,
        })
    }
}

impl RecordRow {
    /// Convert a database row back into the wire record shape.
    fn into_record(self) -> SyncRecord {
        let fields = match self.payload {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        SyncRecord {
            id: self.record_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
            fields,
        }
    }
}

impl RecordStore for PgRecordStore {
    async fn get(
        &self,
        entity: EntityKind,
        record_id: &str,
    ) -> Result<Option<SyncRecord>, StoreError> {
        let row = sqlx::query_as::<_, RecordRow>(
            r#"
            SELECT record_id, created_at, updated_at, deleted_at, payload
            FROM records
            WHERE entity = $1 AND record_id = $2
            "#,
        )
        .bind(entity.as_str())
        .bind(record_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(RecordRow::into_record))
    }

    async fn upsert(&self, entity: EntityKind, record: &SyncRecord) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO records (entity, record_id, created_at, updated_at, deleted_at, payload)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (entity, record_id) DO UPDATE SET
                created_at = EXCLUDED.created_at,
                updated_at = EXCLUDED.updated_at,
                deleted_at = EXCLUDED.deleted_at,
                payload = EXCLUDED.payload,
                received_at = now()
            "#,
        )
        .bind(entity.as_str())
        .bind(&record.id)
        .bind(record.created_at)
        .bind(record.updated_at)
        .bind(record.deleted_at)
        .bind(Value::Object(record.fields.clone()))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_all(&self, entity: EntityKind) -> Result<Vec<SyncRecord>, StoreError> {
        let rows = sqlx::query_as::<_, RecordRow>(
            r#"
            SELECT record_id, created_at, updated_at, deleted_at, payload
            FROM records
            WHERE entity = $1
            ORDER BY record_id
            "#,
        )
        .bind(entity.as_str())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RecordRow::into_record).collect())
    }

    async fn list_since(
        &self,
        entity: EntityKind,
        since: Timestamp,
    ) -> Result<Vec<SyncRecord>, StoreError> {
        // NULL updated_at never compares greater, so untimestamped
        // records only ever come back from a full pull.
        let rows = sqlx::query_as::<_, RecordRow>(
            r#"
            SELECT record_id, created_at, updated_at, deleted_at, payload
            FROM records
            WHERE entity = $1 AND updated_at > $2
            ORDER BY record_id
            "#,
        )
        .bind(entity.as_str())
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(RecordRow::into_record).collect())
    }
}
