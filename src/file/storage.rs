//! Physical file storage for Filekeep.
//!
//! Every blob lives directly under the namespace root, stored under its
//! user-visible filename:
//! ```text
//! {root}/
//! ├── report.txt
//! ├── MyTitle.txt
//! └── photo.png
//! ```
//! Names are checked with [`validate_filename`] before any path is built, so
//! a resolved path never leaves the root.

use std::io;
use std::path::{Path, PathBuf};

use futures::stream::{self, Stream};
use tokio::fs::{self, File, ReadDir};
use tracing::{debug, warn};

use super::name::validate_filename;
use crate::{FilekeepError, Result};

/// Namespace directory holding one blob per filename.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

enum ListState {
    Start(PathBuf),
    Reading(ReadDir),
}

impl FileStorage {
    /// Create a FileStorage rooted at `root`, creating the directory if needed.
    pub async fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await?;

        Ok(Self { root })
    }

    /// Get the namespace root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a filename to its path inside the root.
    pub fn path_of(&self, name: &str) -> Result<PathBuf> {
        validate_filename(name)?;
        Ok(self.root.join(name))
    }

    /// Check whether a regular file with this name exists.
    pub async fn exists(&self, name: &str) -> Result<bool> {
        let path = self.path_of(name)?;

        match fs::metadata(&path).await {
            Ok(m) => Ok(m.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Move a file from outside the namespace in under `name`.
    ///
    /// Tries a rename first and falls back to copy + remove when the source
    /// sits on another filesystem. An existing blob with the same name is
    /// replaced.
    pub async fn move_in(&self, source: &Path, name: &str) -> Result<PathBuf> {
        let target = self.path_of(name)?;

        if let Err(rename_err) = fs::rename(source, &target).await {
            debug!(error = %rename_err, "Rename failed, copying instead");

            fs::copy(source, &target).await.map_err(|e| {
                FilekeepError::Storage(format!("failed to move upload into {name}: {e}"))
            })?;

            if let Err(e) = fs::remove_file(source).await {
                warn!(path = %source.display(), error = %e, "Failed to remove upload temp file");
            }
        }

        Ok(target)
    }

    /// Write `content` to `name`, replacing any existing blob.
    pub async fn write(&self, name: &str, content: &[u8]) -> Result<PathBuf> {
        let target = self.path_of(name)?;

        fs::write(&target, content)
            .await
            .map_err(|e| FilekeepError::Storage(format!("failed to write {name}: {e}")))?;

        Ok(target)
    }

    /// Read a blob's bytes.
    pub async fn read(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.path_of(name)?;

        if !self.exists(name).await? {
            return Err(FilekeepError::NotFound(format!("File {name}")));
        }

        match fs::read(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(FilekeepError::NotFound(format!("File {name}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Rename a blob. The target must not exist.
    pub async fn rename(&self, from: &str, to: &str) -> Result<PathBuf> {
        let source = self.path_of(from)?;
        let target = self.path_of(to)?;

        if !self.exists(from).await? {
            return Err(FilekeepError::NotFound(format!("File {from}")));
        }
        if fs::try_exists(&target).await? {
            return Err(FilekeepError::AlreadyExists(format!("File {to}")));
        }

        fs::rename(&source, &target)
            .await
            .map_err(|e| FilekeepError::Storage(format!("failed to rename {from} to {to}: {e}")))?;

        Ok(target)
    }

    /// Remove a blob.
    ///
    /// Returns `true` if the file was deleted, `false` if no regular file
    /// has that name.
    pub async fn remove(&self, name: &str) -> Result<bool> {
        let path = self.path_of(name)?;

        if !self.exists(name).await? {
            return Ok(false);
        }

        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Open a blob for streaming, returning the handle and its size.
    pub async fn open(&self, name: &str) -> Result<(File, u64)> {
        let path = self.path_of(name)?;

        let file = match File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(FilekeepError::NotFound(format!("File {name}")));
            }
            Err(e) => return Err(e.into()),
        };

        let metadata = file.metadata().await?;
        if !metadata.is_file() {
            return Err(FilekeepError::NotFound(format!("File {name}")));
        }

        Ok((file, metadata.len()))
    }

    /// Stream the names of the regular files in the root.
    ///
    /// Nothing is read until the stream is polled, and every call starts a
    /// fresh directory enumeration. Names that are not valid UTF-8 are skipped.
    pub fn list(&self) -> impl Stream<Item = Result<String>> + Send + 'static {
        stream::try_unfold(ListState::Start(self.root.clone()), next_listed)
    }
}

async fn next_listed(state: ListState) -> Result<Option<(String, ListState)>> {
    let mut dir = match state {
        ListState::Start(root) => fs::read_dir(&root).await?,
        ListState::Reading(dir) => dir,
    };

    while let Some(entry) = dir.next_entry().await? {
        if !entry.file_type().await?.is_file() {
            continue;
        }
        match entry.file_name().into_string() {
            Ok(name) => return Ok(Some((name, ListState::Reading(dir)))),
            Err(raw) => debug!(name = ?raw, "Skipping non UTF-8 filename"),
        }
    }

    Ok(None)
}
