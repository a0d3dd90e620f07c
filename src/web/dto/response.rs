//! View models returned by the web layer.

use serde::Serialize;

use crate::file::{FileContent, FileKind};

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// File listing for the index page.
#[derive(Debug, Serialize)]
pub struct FileListResponse {
    pub files: Vec<String>,
}

/// A file's content for the show page.
#[derive(Debug, Serialize)]
pub struct FileViewResponse {
    pub filename: String,
    pub content: String,
    /// Extension with leading dot, or empty.
    pub extension: String,
    pub kind: FileKind,
}

impl From<FileContent> for FileViewResponse {
    fn from(file: FileContent) -> Self {
        Self {
            filename: file.filename,
            content: file.content,
            extension: file.extension,
            kind: file.kind,
        }
    }
}

/// Model for the rename and delete confirmation pages.
#[derive(Debug, Serialize)]
pub struct FileNameResponse {
    pub filename: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_view_serialization() {
        let view = FileViewResponse::from(FileContent {
            filename: "report.txt".to_string(),
            content: "hello".to_string(),
            extension: ".txt".to_string(),
            kind: FileKind::Text,
        });

        let json = serde_json::to_value(ApiResponse::new(view)).unwrap();
        assert_eq!(json["data"]["filename"], "report.txt");
        assert_eq!(json["data"]["content"], "hello");
        assert_eq!(json["data"]["extension"], ".txt");
        assert_eq!(json["data"]["kind"], "text");
    }
}
