//! File upload handlers.

use axum::Json;
use axum::extract::{Multipart, Path, State};
use axum::http::header;
use axum::response::IntoResponse;
use tracing::info;

use crate::AppState;
use crate::error::{AppError, AppResult};
use crate::models::{MessageResponse, UploadResponse};

/// Multipart field carrying the upload.
const FILE_FIELD: &str = "file";

/// Content type served for a stored file, by extension. Only inert formats
/// get their own type; anything that can carry script is served as bytes.
fn content_type_for(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "pdf" => "application/pdf",
        "txt" => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

/// `POST /api/upload`: store the `file` part and return its public URL.
pub async fn upload_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<UploadResponse>> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let original_name = field.file_name().map(str::to_owned);
        let bytes = field.bytes().await?;
        let filename = state.files.store(original_name.as_deref(), &bytes).await?;
        info!(filename = %filename, size = bytes.len(), "file uploaded");
        return Ok(Json(UploadResponse {
            url: format!("/uploads/{filename}"),
            filename,
            message: "File uploaded successfully".to_string(),
        }));
    }
    Err(AppError::Validation(format!(
        "Multipart field '{FILE_FIELD}' is required"
    )))
}

/// `GET /uploads/{filename}`
pub async fn serve_upload_handler(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> AppResult<impl IntoResponse> {
    let bytes = state.files.read(&filename).await?;
    Ok((
        [
            (header::CONTENT_TYPE, content_type_for(&filename)),
            (header::X_CONTENT_TYPE_OPTIONS, "nosniff"),
        ],
        bytes,
    ))
}

/// `DELETE /api/upload/{filename}`
pub async fn delete_upload_handler(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    state.files.delete(&filename).await?;
    info!(filename = %filename, "file deleted");
    Ok(Json(MessageResponse {
        message: "File deleted successfully".to_string(),
    }))
}
