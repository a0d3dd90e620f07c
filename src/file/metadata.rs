//! File metadata types and repository for Filekeep.

use crate::db::DbPool;
use crate::{FilekeepError, Result};

/// Metadata recorded for a stored file.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct FileRecord {
    /// Unique record ID.
    pub id: i64,
    /// User-visible filename (unique).
    pub filename: String,
    /// Path of the blob inside the namespace directory.
    pub storage_path: String,
    /// MIME type reported at upload time.
    pub content_type: String,
    /// File size in bytes.
    pub size: i64,
    /// User ID of the uploader.
    pub owner_id: i64,
    /// When the file was first stored.
    pub created_at: String,
    /// When the record last changed.
    pub updated_at: String,
}

/// Data for creating or replacing a file record.
#[derive(Debug, Clone)]
pub struct NewFile {
    pub filename: String,
    pub storage_path: String,
    pub content_type: String,
    pub size: i64,
    pub owner_id: i64,
}

impl NewFile {
    /// Create a new NewFile.
    pub fn new(
        filename: impl Into<String>,
        storage_path: impl Into<String>,
        content_type: impl Into<String>,
        size: i64,
        owner_id: i64,
    ) -> Self {
        Self {
            filename: filename.into(),
            storage_path: storage_path.into(),
            content_type: content_type.into(),
            size,
            owner_id,
        }
    }
}

const SELECT_COLUMNS: &str =
    "SELECT id, filename, storage_path, content_type, size, owner_id, created_at, updated_at FROM files";

/// Repository for file metadata operations.
pub struct FileRepository<'a> {
    pool: &'a DbPool,
}

impl<'a> FileRepository<'a> {
    /// Create a new FileRepository with the given pool reference.
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    /// Insert a record, or replace the one with the same filename.
    pub async fn upsert(&self, file: &NewFile) -> Result<FileRecord> {
        sqlx::query(
            "INSERT INTO files (filename, storage_path, content_type, size, owner_id)
             VALUES (?, ?, ?, ?, ?)
             ON CONFLICT(filename) DO UPDATE SET
                 storage_path = excluded.storage_path,
                 content_type = excluded.content_type,
                 size = excluded.size,
                 owner_id = excluded.owner_id,
                 updated_at = datetime('now')",
        )
        .bind(&file.filename)
        .bind(&file.storage_path)
        .bind(&file.content_type)
        .bind(file.size)
        .bind(file.owner_id)
        .execute(self.pool)
        .await?;

        self.get_by_filename(&file.filename)
            .await?
            .ok_or_else(|| FilekeepError::NotFound(format!("File record {}", file.filename)))
    }

    /// Get a record by filename.
    pub async fn get_by_filename(&self, filename: &str) -> Result<Option<FileRecord>> {
        let file = sqlx::query_as::<_, FileRecord>(&format!("{SELECT_COLUMNS} WHERE filename = ?"))
            .bind(filename)
            .fetch_optional(self.pool)
            .await?;

        Ok(file)
    }

    /// Move a record to a new filename and storage path.
    ///
    /// Returns `false` if no record had the old filename.
    pub async fn rename(&self, from: &str, to: &str, storage_path: &str) -> Result<bool> {
        let result = sqlx::query(
            "UPDATE files SET filename = ?, storage_path = ?, updated_at = datetime('now')
             WHERE filename = ?",
        )
        .bind(to)
        .bind(storage_path)
        .bind(from)
        .execute(self.pool)
        .await
        .map_err(|e| match e.as_database_error() {
            Some(db_err) if db_err.is_unique_violation() => {
                FilekeepError::AlreadyExists(format!("File record {to}"))
            }
            _ => FilekeepError::Database(e.to_string()),
        })?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a record by filename.
    pub async fn delete_by_filename(&self, filename: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM files WHERE filename = ?")
            .bind(filename)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count all records.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM files")
            .fetch_one(self.pool)
            .await?;

        Ok(count)
    }
}
