use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::files::models::{FileRecord, NewFileRecord};

/// Persistence seam for file metadata records.
#[async_trait]
pub trait FileRecordStore: Send + Sync {
    async fn insert(&self, record: NewFileRecord) -> Result<FileRecord>;

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FileRecord>>;

    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<FileRecord>>;

    async fn find_by_short_code(&self, code: &str) -> Result<Option<FileRecord>>;

    /// Set or clear the share code on a record, returning the updated row.
    ///
    /// Fails with `NotFound` when the record no longer exists and with
    /// `Conflict` when the code is already taken by another record.
    async fn set_short_code(&self, id: Uuid, code: Option<&str>) -> Result<FileRecord>;

    async fn delete(&self, id: Uuid) -> Result<()>;
}

/// PostgreSQL-backed file record store
pub struct PgFileRecordStore {
    pool: PgPool,
}

impl PgFileRecordStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FileRecordStore for PgFileRecordStore {
    async fn insert(&self, record: NewFileRecord) -> Result<FileRecord> {
        let created = sqlx::query_as::<_, FileRecord>(
            "INSERT INTO file_records (owner_id, title, description, storage_key, content_type, file_size)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING *",
        )
        .bind(record.owner_id)
        .bind(&record.title)
        .bind(&record.description)
        .bind(&record.storage_key)
        .bind(&record.content_type)
        .bind(record.file_size)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<FileRecord>> {
        let record =
            sqlx::query_as::<_, FileRecord>("SELECT * FROM file_records WHERE id = $1")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(record)
    }

    async fn find_by_owner(&self, owner_id: Uuid) -> Result<Vec<FileRecord>> {
        let records = sqlx::query_as::<_, FileRecord>(
            "SELECT * FROM file_records WHERE owner_id = $1 ORDER BY created_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }

    async fn find_by_short_code(&self, code: &str) -> Result<Option<FileRecord>> {
        let record =
            sqlx::query_as::<_, FileRecord>("SELECT * FROM file_records WHERE short_code = $1")
                .bind(code)
                .fetch_optional(&self.pool)
                .await?;

        Ok(record)
    }

    async fn set_short_code(&self, id: Uuid, code: Option<&str>) -> Result<FileRecord> {
        let updated = sqlx::query_as::<_, FileRecord>(
            "UPDATE file_records SET short_code = $2, updated_at = NOW()
             WHERE id = $1
             RETURNING *",
        )
        .bind(id)
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            // The unique index on short_code arbitrates concurrent shares
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return AppError::Conflict("Short code already in use".to_string());
                }
            }
            AppError::Database(e)
        })?;

        updated.ok_or_else(|| AppError::NotFound("File not found".to_string()))
    }

    async fn delete(&self, id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM file_records WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("File not found".to_string()));
        }

        Ok(())
    }
}
