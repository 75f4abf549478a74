use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::error;

use crate::models::{ErrorResponse, FileContentResponse, SaveContentRequest, SuccessResponse};
use crate::utils::sandbox;
use crate::AppState;

/// Extensions allowed through the in-browser text editor.
const EDITABLE_EXTENSIONS: &[&str] = &[
    // Text and markup
    "txt", "md", "markdown", "rst", "html", "htm", "xml", "tex",
    // Web code
    "css", "scss", "sass", "less", "js", "jsx", "ts", "tsx", "vue", "svelte",
    // Backend code
    "py", "rb", "go", "rs", "java", "kt", "cs", "cpp", "c", "h", "hpp", "php", "swift",
    // Shell and scripts
    "sh", "bash", "zsh", "fish", "ps1", "bat", "cmd",
    // Data and config
    "json", "yaml", "yml", "toml", "ini", "cfg", "conf", "csv", "tsv", "properties", "env",
    // SQL
    "sql",
    // Logs
    "log",
];

fn is_editable(path: &std::path::Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| EDITABLE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Read a text file's content for editing
pub async fn file_content(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Json<FileContentResponse>, (StatusCode, Json<ErrorResponse>)> {
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

    if !is_editable(&full_path) {
        return Err(ErrorResponse::with_status(
            StatusCode::BAD_REQUEST,
            "File is not editable",
        ));
    }

    let content = tokio::fs::read_to_string(&full_path).await.map_err(|e| {
        error!("Error reading file {}: {}", full_path.display(), e);
        ErrorResponse::with_status(StatusCode::INTERNAL_SERVER_ERROR, "Failed to read file")
    })?;

    Ok(Json(FileContentResponse { content }))
}

/// Write edited content back to a file
pub async fn save_file(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Json(request): Json<SaveContentRequest>,
) -> Result<Json<SuccessResponse>, (StatusCode, Json<ErrorResponse>)> {
    let uploads = state.config.uploads_path();
    let full_path = sandbox::resolve_safe(&uploads, &path)
        .map_err(|e| ErrorResponse::with_status(StatusCode::BAD_REQUEST, e.to_string()))?;

    tokio::fs::write(&full_path, &request.content)
        .await
        .map_err(|e| {
            error!("Error saving file {}: {}", full_path.display(), e);
            ErrorResponse::with_status(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save file")
        })?;

    Ok(Json(SuccessResponse { success: true }))
}
