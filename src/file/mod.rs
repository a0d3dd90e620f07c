//! File management module for Filekeep.
//!
//! This module provides the file lifecycle:
//! - Filename validation and classification
//! - Blob storage in a single namespace directory
//! - File metadata records
//! - Upload, list, read, rename, delete, create and download

mod manager;
mod metadata;
mod name;
mod storage;

pub use manager::{Download, FileContent, FileManager};
pub use metadata::{FileRecord, FileRepository, NewFile};
pub use name::{
    extension_of, title_to_filename, validate_filename, FileKind, MAX_FILENAME_BYTES,
};
pub use storage::FileStorage;
