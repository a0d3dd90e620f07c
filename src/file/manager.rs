//! File lifecycle operations.
//!
//! `FileManager` ties the namespace directory to the metadata table. A
//! metadata write only happens after the blob is in place; if it fails the
//! blob is removed again.

use std::path::Path;

use futures::Stream;
use tokio::fs::File;
use tracing::{error, info, warn};

use super::metadata::{FileRecord, FileRepository, NewFile};
use super::name::{extension_of, title_to_filename, validate_filename, FileKind};
use super::storage::FileStorage;
use crate::db::Database;
use crate::{FilekeepError, Result};

/// Content type recorded for files made with `create`.
const CREATED_CONTENT_TYPE: &str = "text/plain";

/// A file's content prepared for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileContent {
    pub filename: String,
    /// Text content; invalid UTF-8 is replaced.
    pub content: String,
    /// Extension with leading dot, or empty.
    pub extension: String,
    pub kind: FileKind,
}

/// An open blob ready to be streamed to a client.
#[derive(Debug)]
pub struct Download {
    pub filename: String,
    pub file: File,
    pub size: u64,
    pub content_type: String,
}

/// File lifecycle manager.
#[derive(Debug, Clone)]
pub struct FileManager {
    storage: FileStorage,
    db: Database,
    enforce_ownership: bool,
}

impl FileManager {
    /// Create a new FileManager.
    ///
    /// With `enforce_ownership` set, only the owner recorded in a file's
    /// metadata may read, rename, delete or download it.
    pub fn new(storage: FileStorage, db: Database, enforce_ownership: bool) -> Self {
        Self {
            storage,
            db,
            enforce_ownership,
        }
    }

    /// Get the underlying storage.
    pub fn storage(&self) -> &FileStorage {
        &self.storage
    }

    fn repo(&self) -> FileRepository<'_> {
        FileRepository::new(self.db.pool())
    }

    /// Look up a file's record, failing if another user owns it and
    /// ownership is enforced.
    async fn check_access(&self, filename: &str, user_id: i64) -> Result<Option<FileRecord>> {
        let record = self.repo().get_by_filename(filename).await?;

        if self.enforce_ownership {
            if let Some(ref r) = record {
                if r.owner_id != user_id {
                    warn!(filename = %filename, user_id, owner_id = r.owner_id, "Access denied");
                    return Err(FilekeepError::AccessDenied(format!(
                        "file {filename} belongs to another user"
                    )));
                }
            }
        }

        Ok(record)
    }

    /// Write a record for a blob that is already in place, removing the blob
    /// if the write fails.
    async fn record_or_discard(&self, file: NewFile) -> Result<FileRecord> {
        match self.repo().upsert(&file).await {
            Ok(record) => Ok(record),
            Err(e) => {
                error!(filename = %file.filename, error = %e, "Metadata write failed, removing blob");
                if let Err(cleanup) = self.storage.remove(&file.filename).await {
                    error!(filename = %file.filename, error = %cleanup, "Failed to remove orphaned blob");
                }
                Err(e)
            }
        }
    }

    /// Move an uploaded temp file into the namespace and record it.
    ///
    /// An existing file with the same name is overwritten.
    pub async fn upload(
        &self,
        temp_path: &Path,
        original_name: &str,
        content_type: &str,
        size: u64,
        owner_id: i64,
    ) -> Result<FileRecord> {
        validate_filename(original_name)?;
        self.check_access(original_name, owner_id).await?;

        let stored = self
            .storage
            .move_in(temp_path, original_name)
            .await
            .inspect_err(|e| error!(filename = %original_name, error = %e, "Upload move failed"))?;

        let size = i64::try_from(size).unwrap_or(i64::MAX);
        let record = self
            .record_or_discard(NewFile::new(
                original_name,
                stored.to_string_lossy(),
                content_type,
                size,
                owner_id,
            ))
            .await?;

        info!(filename = %record.filename, size, owner_id, "File uploaded");
        Ok(record)
    }

    /// Stream the names of all files in the namespace.
    ///
    /// The directory is enumerated afresh on each call; the metadata table
    /// is not consulted.
    pub fn list(&self) -> impl Stream<Item = Result<String>> + Send + 'static {
        self.storage.list()
    }

    /// Read a file as text.
    pub async fn read(&self, filename: &str, user_id: i64) -> Result<FileContent> {
        validate_filename(filename)?;
        self.check_access(filename, user_id).await?;

        let bytes = self.storage.read(filename).await?;

        Ok(FileContent {
            filename: filename.to_string(),
            content: String::from_utf8_lossy(&bytes).into_owned(),
            extension: extension_of(filename),
            kind: FileKind::from_filename(filename),
        })
    }

    /// Rename a file and its record.
    pub async fn rename(&self, from: &str, to: &str, user_id: i64) -> Result<()> {
        validate_filename(from)?;
        validate_filename(to)?;
        self.check_access(from, user_id).await?;

        let target = self.storage.rename(from, to).await?;

        if let Err(e) = self
            .repo()
            .rename(from, to, &target.to_string_lossy())
            .await
        {
            error!(from = %from, to = %to, error = %e, "Metadata rename failed, restoring blob");
            if let Err(restore) = self.storage.rename(to, from).await {
                error!(from = %to, to = %from, error = %restore, "Failed to restore renamed blob");
            }
            return Err(e);
        }

        info!(from = %from, to = %to, user_id, "File renamed");
        Ok(())
    }

    /// Delete a file and its record.
    ///
    /// The record goes first so a failed metadata delete leaves both in
    /// place. If the blob then cannot be removed, the record is put back.
    pub async fn delete(&self, filename: &str, user_id: i64) -> Result<()> {
        validate_filename(filename)?;
        let record = self.check_access(filename, user_id).await?;

        if !self.storage.exists(filename).await? {
            return Err(FilekeepError::NotFound(format!("File {filename}")));
        }

        self.repo()
            .delete_by_filename(filename)
            .await
            .inspect_err(|e| error!(filename = %filename, error = %e, "Metadata delete failed"))?;

        if let Err(e) = self.storage.remove(filename).await {
            error!(filename = %filename, error = %e, "Blob removal failed, restoring record");
            if let Some(r) = record {
                let restored = NewFile::new(
                    r.filename,
                    r.storage_path,
                    r.content_type,
                    r.size,
                    r.owner_id,
                );
                if let Err(restore) = self.repo().upsert(&restored).await {
                    error!(filename = %filename, error = %restore, "Failed to restore file record");
                }
            }
            return Err(e);
        }

        info!(filename = %filename, user_id, "File deleted");
        Ok(())
    }

    /// Create a text file from a title and body.
    ///
    /// The filename is the title with all whitespace removed plus `.txt`.
    /// An existing file with that name is overwritten.
    pub async fn create(&self, title: &str, body: &str, owner_id: i64) -> Result<FileRecord> {
        if title.chars().all(char::is_whitespace) {
            return Err(FilekeepError::InvalidFilename(
                "title must contain a non-whitespace character".to_string(),
            ));
        }
        let filename = title_to_filename(title);
        validate_filename(&filename)?;
        self.check_access(&filename, owner_id).await?;

        let stored = self
            .storage
            .write(&filename, body.as_bytes())
            .await
            .inspect_err(|e| error!(filename = %filename, error = %e, "Create failed"))?;

        let size = i64::try_from(body.len()).unwrap_or(i64::MAX);
        let record = self
            .record_or_discard(NewFile::new(
                &filename,
                stored.to_string_lossy(),
                CREATED_CONTENT_TYPE,
                size,
                owner_id,
            ))
            .await?;

        info!(filename = %record.filename, owner_id, "File created");
        Ok(record)
    }

    /// Open a file for download.
    ///
    /// The content type comes from the file's record when there is one,
    /// otherwise it is guessed from the extension.
    pub async fn download(&self, filename: &str, user_id: i64) -> Result<Download> {
        validate_filename(filename)?;
        let record = self.check_access(filename, user_id).await?;

        let (file, size) = self.storage.open(filename).await?;

        let content_type = match record {
            Some(r) => r.content_type,
            None => mime_guess::from_path(filename)
                .first_or_octet_stream()
                .essence_str()
                .to_string(),
        };

        Ok(Download {
            filename: filename.to_string(),
            file,
            size,
            content_type,
        })
    }
}
