use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

use crate::models::ErrorResponse;
use crate::utils::sandbox;
use crate::AppState;

/// Download a single file as an attachment
pub async fn download_file(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    let uploads = state.config.uploads_path();
    let full_path = sandbox::resolve_safe(&uploads, &path)
        .map_err(|e| ErrorResponse::with_status(StatusCode::BAD_REQUEST, e.to_string()))?;

    let metadata = tokio::fs::metadata(&full_path).await.map_err(|_| {
        ErrorResponse::with_status(StatusCode::NOT_FOUND, "File not found")
    })?;
    if metadata.is_dir() {
        return Err(ErrorResponse::with_status(
            StatusCode::NOT_FOUND,
            "File not found",
        ));
    }

    let bytes = tokio::fs::read(&full_path).await.map_err(|e| {
        error!("Download error for {}: {}", full_path.display(), e);
        ErrorResponse::with_status(StatusCode::INTERNAL_SERVER_ERROR, "Download failed")
    })?;

    let filename = full_path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "download".to_string());

    Ok((
        [
            (
                header::CONTENT_TYPE,
                "application/octet-stream".to_string(),
            ),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        bytes,
    )
        .into_response())
}
