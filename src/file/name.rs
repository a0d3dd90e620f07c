//! Filename rules for the managed namespace.

use std::path::Path;

use serde::Serialize;

use crate::{FilekeepError, Result};

/// Maximum filename length (in bytes).
pub const MAX_FILENAME_BYTES: usize = 255;

/// Extension given to files made with `create`.
pub const CREATED_FILE_EXTENSION: &str = ".txt";

/// Check that a filename names exactly one entry inside the namespace.
///
/// # Examples
///
/// ```
/// use filekeep::file::validate_filename;
///
/// assert!(validate_filename("report.txt").is_ok());
/// assert!(validate_filename("../etc/passwd").is_err());
/// assert!(validate_filename("..").is_err());
/// ```
pub fn validate_filename(name: &str) -> Result<()> {
    let reason = if name.is_empty() {
        "filename must not be empty"
    } else if name == "." || name == ".." {
        "filename must not be a directory reference"
    } else if name.contains(['/', '\\']) {
        "filename must not contain path separators"
    } else if name.contains('\0') {
        "filename must not contain NUL"
    } else if name.len() > MAX_FILENAME_BYTES {
        "filename is too long"
    } else {
        return Ok(());
    };

    Err(FilekeepError::InvalidFilename(format!("{reason}: {name:?}")))
}

/// Turn a free-form title into the filename `create` writes.
///
/// All whitespace is removed and `.txt` appended.
pub fn title_to_filename(title: &str) -> String {
    let mut name: String = title.chars().filter(|c| !c.is_whitespace()).collect();
    name.push_str(CREATED_FILE_EXTENSION);
    name
}

/// Extension of a filename including the leading dot, or empty.
pub fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| format!(".{e}"))
        .unwrap_or_default()
}

/// Rough classification of a file for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileKind {
    Text,
    Image,
    Pdf,
    Other,
}

impl FileKind {
    /// Classify a file by its extension.
    pub fn from_filename(name: &str) -> Self {
        let ext = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("txt" | "md" | "csv" | "log" | "json" | "toml" | "yaml" | "yml" | "xml"
            | "html" | "htm" | "css" | "js" | "rs") => FileKind::Text,
            Some("png" | "jpg" | "jpeg" | "gif" | "bmp" | "webp" | "svg") => FileKind::Image,
            Some("pdf") => FileKind::Pdf,
            _ => FileKind::Other,
        }
    }
}
