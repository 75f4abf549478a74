use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::{error, info};

use crate::models::{
    CreateFileRequest, CreateFileResponse, CreateFolderRequest, ErrorResponse, RenameRequest,
    SuccessResponse, UploadedFile,
};
use crate::utils::sandbox;
use crate::AppState;

/// Create a new file with optional initial content
pub async fn create_file(
    State(state): State<AppState>,
    Json(request): Json<CreateFileRequest>,
) -> Result<Json<CreateFileResponse>, (StatusCode, Json<ErrorResponse>)> {
    let name = request.name.trim();
    sandbox::validate_name(name)
        .map_err(|e| ErrorResponse::with_status(StatusCode::BAD_REQUEST, e.to_string()))?;

    let uploads = state.config.uploads_path();
    let parent = sandbox::resolve_safe(&uploads, &request.current_path)
        .map_err(|e| ErrorResponse::with_status(StatusCode::BAD_REQUEST, e.to_string()))?;
    let full_path = parent.join(name);

    if tokio::fs::try_exists(&full_path).await.unwrap_or(false) {
        return Err(ErrorResponse::with_status(
            StatusCode::BAD_REQUEST,
            "File already exists",
        ));
    }

    if let Err(e) = tokio::fs::create_dir_all(&parent).await {
        error!("Create file error for {}: {}", full_path.display(), e);
        return Err(ErrorResponse::with_status(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to create file",
        ));
    }
    tokio::fs::write(&full_path, &request.content)
        .await
        .map_err(|e| {
            error!("Create file error for {}: {}", full_path.display(), e);
            ErrorResponse::with_status(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create file")
        })?;

    Ok(Json(CreateFileResponse {
        success: true,
        file: UploadedFile {
            name: name.to_string(),
            size: request.content.len() as u64,
            path: sandbox::relative_display(&uploads, &full_path),
        },
    }))
}

/// Create a new folder
pub async fn create_folder(
    State(state): State<AppState>,
    Json(request): Json<CreateFolderRequest>,
) -> Result<Json<SuccessResponse>, (StatusCode, Json<ErrorResponse>)> {
    let name = request.name.trim();
    sandbox::validate_name(name)
        .map_err(|e| ErrorResponse::with_status(StatusCode::BAD_REQUEST, e.to_string()))?;

    let uploads = state.config.uploads_path();
    let parent = sandbox::resolve_safe(&uploads, &request.current_path)
        .map_err(|e| ErrorResponse::with_status(StatusCode::BAD_REQUEST, e.to_string()))?;
    let full_path = parent.join(name);

    if tokio::fs::try_exists(&full_path).await.unwrap_or(false) {
        return Err(ErrorResponse::with_status(
            StatusCode::BAD_REQUEST,
            "Folder already exists",
        ));
    }

    tokio::fs::create_dir_all(&full_path).await.map_err(|e| {
        error!("Create folder error for {}: {}", full_path.display(), e);
        ErrorResponse::with_status(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create folder")
    })?;

    Ok(Json(SuccessResponse { success: true }))
}

/// Rename a file or folder in place
pub async fn rename_item(
    State(state): State<AppState>,
    Path(path): Path<String>,
    Json(request): Json<RenameRequest>,
) -> Result<Json<SuccessResponse>, (StatusCode, Json<ErrorResponse>)> {
    let new_name = request.new_name.trim();
    sandbox::validate_name(new_name)
        .map_err(|e| ErrorResponse::with_status(StatusCode::BAD_REQUEST, e.to_string()))?;

    let uploads = state.config.uploads_path();
    let old_path = sandbox::resolve_safe(&uploads, &path)
        .map_err(|e| ErrorResponse::with_status(StatusCode::BAD_REQUEST, e.to_string()))?;

    if !tokio::fs::try_exists(&old_path).await.unwrap_or(false) {
        return Err(ErrorResponse::with_status(
            StatusCode::NOT_FOUND,
            "File or folder not found",
        ));
    }

    let new_path = old_path
        .parent()
        .unwrap_or(&uploads)
        .join(new_name);
    if tokio::fs::try_exists(&new_path).await.unwrap_or(false) {
        return Err(ErrorResponse::with_status(
            StatusCode::BAD_REQUEST,
            "A file or folder with that name already exists",
        ));
    }

    tokio::fs::rename(&old_path, &new_path).await.map_err(|e| {
        error!(
            "Rename error {} -> {}: {}",
            old_path.display(),
            new_path.display(),
            e
        );
        ErrorResponse::with_status(StatusCode::INTERNAL_SERVER_ERROR, "Failed to rename item")
    })?;

    Ok(Json(SuccessResponse { success: true }))
}

/// Delete a file or recursively delete a folder
pub async fn delete_item(
    State(state): State<AppState>,
    Path(path): Path<String>,
) -> Result<Json<SuccessResponse>, (StatusCode, Json<ErrorResponse>)> {
    let uploads = state.config.uploads_path();
    let full_path = sandbox::resolve_safe(&uploads, &path)
        .map_err(|e| ErrorResponse::with_status(StatusCode::BAD_REQUEST, e.to_string()))?;

    let metadata = tokio::fs::metadata(&full_path).await.map_err(|_| {
        ErrorResponse::with_status(StatusCode::NOT_FOUND, "File or folder not found")
    })?;

    let result = if metadata.is_dir() {
        tokio::fs::remove_dir_all(&full_path).await
    } else {
        tokio::fs::remove_file(&full_path).await
    };
    result.map_err(|e| {
        error!("Delete error for {}: {}", full_path.display(), e);
        ErrorResponse::with_status(StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete item")
    })?;

    info!("Deleted {}", full_path.display());
    Ok(Json(SuccessResponse { success: true }))
}
