//! File handlers.

use std::path::Path as FsPath;
use std::sync::Arc;

use axum::{
    body::Body,
    extract::{
        multipart::{Field, MultipartError},
        Multipart, Path, State,
    },
    http::header,
    response::{Redirect, Response},
    Json,
};
use futures::TryStreamExt;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;

use crate::web::dto::{
    ApiResponse, CreateForm, DeleteForm, FileListResponse, FileNameResponse, FileViewResponse,
    RenameForm, ValidatedForm,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// Multipart field carrying the uploaded file.
const UPLOAD_FIELD: &str = "file";

/// Generate a safe Content-Disposition header value for file downloads.
///
/// Control characters are removed, quotes and backslashes replaced in the
/// plain `filename` parameter, and non-ASCII names are also sent as an
/// RFC 5987 `filename*` parameter.
fn content_disposition_header(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '"' | '\\' => '_',
            _ => c,
        })
        .collect();

    if filename.is_ascii() && sanitized == filename {
        return format!("attachment; filename=\"{}\"", filename);
    }

    let encoded = urlencoding::encode(filename);

    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        sanitized, encoded
    )
}

/// GET / - List all files.
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    AuthUser(_user): AuthUser,
) -> Result<Json<ApiResponse<FileListResponse>>, ApiError> {
    let mut files: Vec<String> = state
        .files
        .list()
        .try_collect()
        .await
        .map_err(|e| ApiError::from(e).during("list files"))?;
    files.sort();

    Ok(Json(ApiResponse::new(FileListResponse { files })))
}

/// GET /file/:filename - Show a file's content.
pub async fn view_file(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(filename): Path<String>,
) -> Result<Json<ApiResponse<FileViewResponse>>, ApiError> {
    let content = state
        .files
        .read(&filename, user.id)
        .await
        .map_err(|e| ApiError::from(e).during("read file"))?;
    Ok(Json(ApiResponse::new(content.into())))
}

/// GET /edit/:filename - Rename form model.
pub async fn edit_form(
    AuthUser(_user): AuthUser,
    Path(filename): Path<String>,
) -> Json<ApiResponse<FileNameResponse>> {
    Json(ApiResponse::new(FileNameResponse { filename }))
}

/// POST /edit - Rename a file.
pub async fn rename_file(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ValidatedForm(form): ValidatedForm<RenameForm>,
) -> Result<Redirect, ApiError> {
    state
        .files
        .rename(&form.previous, &form.new, user.id)
        .await
        .map_err(|e| ApiError::from(e).during("rename file"))?;
    Ok(Redirect::to("/"))
}

/// GET /delete/:filename - Delete confirmation model.
pub async fn delete_form(
    AuthUser(_user): AuthUser,
    Path(filename): Path<String>,
) -> Json<ApiResponse<FileNameResponse>> {
    Json(ApiResponse::new(FileNameResponse { filename }))
}

/// POST /delete - Delete a file.
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ValidatedForm(form): ValidatedForm<DeleteForm>,
) -> Result<Redirect, ApiError> {
    state
        .files
        .delete(&form.previous, user.id)
        .await
        .map_err(|e| ApiError::from(e).during("delete file"))?;
    Ok(Redirect::to("/"))
}

/// POST /create - Create a text file from a title and body.
pub async fn create_file(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ValidatedForm(form): ValidatedForm<CreateForm>,
) -> Result<Redirect, ApiError> {
    state
        .files
        .create(&form.title, &form.details, user.id)
        .await
        .map_err(|e| ApiError::from(e).during("create file"))?;
    Ok(Redirect::to("/"))
}

fn multipart_error(e: MultipartError) -> ApiError {
    tracing::warn!("Failed to read multipart data: {}", e);
    if e.status() == axum::http::StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::payload_too_large("Upload exceeds the size limit")
    } else {
        ApiError::bad_request("Invalid multipart data")
    }
}

/// Write a multipart field to `path`, returning the number of bytes written.
async fn spool_field(field: &mut Field<'_>, path: &FsPath) -> Result<u64, ApiError> {
    let mut file = tokio::fs::File::create(path).await.map_err(|e| {
        tracing::error!("Failed to create upload temp file: {}", e);
        ApiError::internal("Failed to store upload")
    })?;

    let mut size: u64 = 0;
    while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
        file.write_all(&chunk).await.map_err(|e| {
            tracing::error!("Failed to write upload temp file: {}", e);
            ApiError::internal("Failed to store upload")
        })?;
        size += chunk.len() as u64;
    }
    file.flush().await.map_err(|e| {
        tracing::error!("Failed to flush upload temp file: {}", e);
        ApiError::internal("Failed to store upload")
    })?;

    Ok(size)
}

async fn discard_temp(path: &FsPath) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => tracing::warn!(path = %path.display(), error = %e, "Failed to remove upload temp file"),
    }
}

/// POST /upload - Upload a file from the multipart field `file`.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    mut multipart: Multipart,
) -> Result<Redirect, ApiError> {
    while let Some(mut field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .map(str::to_string)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| ApiError::bad_request("No file provided"))?;
        let content_type = field
            .content_type()
            .map(str::to_string)
            .unwrap_or_else(|| {
                mime_guess::from_path(&filename)
                    .first_or_octet_stream()
                    .essence_str()
                    .to_string()
            });

        let temp_path = state.upload_tmp_path.join(uuid::Uuid::new_v4().to_string());
        let result = match spool_field(&mut field, &temp_path).await {
            Ok(size) => state
                .files
                .upload(&temp_path, &filename, &content_type, size, user.id)
                .await
                .map_err(|e| ApiError::from(e).during("store upload")),
            Err(e) => Err(e),
        };
        discard_temp(&temp_path).await;

        result?;
        return Ok(Redirect::to("/"));
    }

    Err(ApiError::bad_request("No file provided"))
}

/// GET /download/:filename - Stream a file to the client.
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    Path(filename): Path<String>,
) -> Result<Response<Body>, ApiError> {
    let download = state
        .files
        .download(&filename, user.id)
        .await
        .map_err(|e| ApiError::from(e).during("open file"))?;

    let response = Response::builder()
        .header(header::CONTENT_TYPE, download.content_type)
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_header(&download.filename),
        )
        .header(header::CONTENT_LENGTH, download.size)
        .body(Body::from_stream(ReaderStream::new(download.file)))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("Failed to build response")
        })?;

    Ok(response)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition_header_simple_ascii() {
        let result = content_disposition_header("document.txt");
        assert_eq!(result, "attachment; filename=\"document.txt\"");
    }

    #[test]
    fn test_content_disposition_header_with_spaces() {
        let result = content_disposition_header("my document.txt");
        assert_eq!(result, "attachment; filename=\"my document.txt\"");
    }

    #[test]
    fn test_content_disposition_header_non_ascii() {
        let result = content_disposition_header("résumé.pdf");
        assert_eq!(
            result,
            "attachment; filename=\"résumé.pdf\"; filename*=UTF-8''r%C3%A9sum%C3%A9.pdf"
        );
    }

    #[test]
    fn test_content_disposition_header_double_quote() {
        let result = content_disposition_header("test\"file.txt");
        assert!(result.contains("filename=\"test_file.txt\""));
        assert!(result.contains("%22"));
    }

    #[test]
    fn test_content_disposition_header_control_characters() {
        let result = content_disposition_header("file\"\r\nX-Evil: header\r\n.txt");
        assert!(!result.contains('\r'));
        assert!(!result.contains('\n'));
        assert!(result.starts_with("attachment; filename="));
    }
}
