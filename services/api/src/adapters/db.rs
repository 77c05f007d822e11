//! services/api/src/adapters/db.rs
//!
//! Postgres-backed feedback storage. Queries are built at runtime so the table name
//! can come from configuration; `seq` breaks ties between equal timestamps.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use smart_city_core::domain::{FeedbackRecord, FeedbackStatus};
use smart_city_core::ports::{FeedbackRepository, PortError, PortResult};
use sqlx::{FromRow, PgPool};
use tracing::info;
use uuid::Uuid;

//=========================================================================================
// Adapter
//=========================================================================================

/// A database adapter that implements the `FeedbackRepository` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
    table: String,
}

impl DbAdapter {
    /// Creates a new `DbAdapter` writing to `table`.
    ///
    /// The table name is interpolated into SQL, so it must already be validated
    /// as a plain identifier (see `Config`).
    pub fn new(pool: PgPool, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
        }
    }

    /// Creates the feedback table and its ordering index if they are missing.
    pub async fn ensure_schema(&self) -> Result<(), sqlx::Error> {
        let create_table = format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                seq BIGSERIAL UNIQUE,
                id UUID PRIMARY KEY,
                citizen TEXT NOT NULL,
                contact TEXT NOT NULL,
                category TEXT NOT NULL,
                location TEXT NOT NULL,
                description TEXT NOT NULL,
                status TEXT NOT NULL,
                created_at TIMESTAMPTZ NOT NULL
            )",
            table = self.table
        );
        let create_index = format!(
            "CREATE INDEX IF NOT EXISTS {table}_created_at_idx ON {table} (created_at DESC, seq DESC)",
            table = self.table
        );
        sqlx::query(&create_table).execute(&self.pool).await?;
        sqlx::query(&create_index).execute(&self.pool).await?;
        info!(table = %self.table, "feedback schema ready");
        Ok(())
    }
}

fn map_sqlx_error(e: sqlx::Error) -> PortError {
    match e {
        sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
            PortError::Unavailable(e.to_string())
        }
        sqlx::Error::Database(_) => PortError::Rejected(e.to_string()),
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => PortError::Malformed(e.to_string()),
        _ => PortError::Unexpected(e.to_string()),
    }
}

//=========================================================================================
// Row mapping
//=========================================================================================

#[derive(FromRow)]
struct FeedbackRow {
    id: Uuid,
    citizen: String,
    contact: String,
    category: String,
    location: String,
    description: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl FeedbackRow {
    fn to_domain(self) -> PortResult<FeedbackRecord> {
        let status = FeedbackStatus::parse(&self.status).ok_or_else(|| {
            PortError::Malformed(format!("feedback {} has unknown status '{}'", self.id, self.status))
        })?;
        Ok(FeedbackRecord {
            id: self.id,
            citizen: self.citizen,
            contact: self.contact,
            category: self.category,
            location: self.location,
            description: self.description,
            status,
            created_at: self.created_at,
        })
    }
}

//=========================================================================================
// `FeedbackRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl FeedbackRepository for DbAdapter {
    async fn insert(&self, record: &FeedbackRecord) -> PortResult<()> {
        let sql = format!(
            "INSERT INTO {} (id, citizen, contact, category, location, description, status, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
            self.table
        );
        sqlx::query(&sql)
            .bind(record.id)
            .bind(&record.citizen)
            .bind(&record.contact)
            .bind(&record.category)
            .bind(&record.location)
            .bind(&record.description)
            .bind(record.status.as_str())
            .bind(record.created_at)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn list_recent(&self, limit: usize) -> PortResult<Vec<FeedbackRecord>> {
        let sql = format!(
            "SELECT id, citizen, contact, category, location, description, status, created_at
             FROM {} ORDER BY created_at DESC, seq DESC LIMIT $1",
            self.table
        );
        let rows = sqlx::query_as::<_, FeedbackRow>(&sql)
            .bind(limit as i64)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        rows.into_iter().map(FeedbackRow::to_domain).collect()
    }
}
