use std::path::Path;

use axum::{
    body::Bytes,
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use tracing::{error, info};

use crate::models::{ErrorResponse, UploadResponse, UploadedFile};
use crate::utils::sandbox;
use crate::AppState;

/// Receive a multipart upload into the current directory.
///
/// Text fields: `currentPath` (target directory relative to the uploads
/// root), `preserveStructure` ("true" to honor client-side folder
/// structure) and one `relativePaths` entry per file, in file order.
/// File fields are named `files`.
pub async fn upload_files(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, (StatusCode, Json<ErrorResponse>)> {
    let mut current_path = String::new();
    let mut preserve_structure = false;
    let mut relative_paths: Vec<String> = Vec::new();
    let mut staged: Vec<(String, Bytes)> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        error!("Upload error: {}", e);
        ErrorResponse::with_status(StatusCode::BAD_REQUEST, format!("Upload failed: {}", e))
    })? {
        match field.name() {
            Some("currentPath") => {
                current_path = field.text().await.map_err(upload_error)?;
            }
            Some("preserveStructure") => {
                preserve_structure = field.text().await.map_err(upload_error)? == "true";
            }
            Some("relativePaths") => {
                relative_paths.push(field.text().await.map_err(upload_error)?);
            }
            Some("files") => {
                let name = field
                    .file_name()
                    .unwrap_or("upload.bin")
                    .to_string();
                let data = field.bytes().await.map_err(upload_error)?;
                staged.push((name, data));
            }
            _ => {}
        }
    }

    let uploads = state.config.uploads_path();
    let target_dir = sandbox::resolve_safe(&uploads, &current_path)
        .map_err(|e| ErrorResponse::with_status(StatusCode::BAD_REQUEST, e.to_string()))?;
    tokio::fs::create_dir_all(&target_dir).await.map_err(|e| {
        error!("Upload error creating {}: {}", target_dir.display(), e);
        ErrorResponse::with_status(StatusCode::INTERNAL_SERVER_ERROR, "Upload failed")
    })?;

    let mut uploaded = Vec::new();
    for (index, (original_name, data)) in staged.into_iter().enumerate() {
        let mut dir = target_dir.clone();
        let mut file_name = original_name;

        // Recreate the client's folder structure when requested.
        if preserve_structure {
            if let Some(relative) = relative_paths.get(index) {
                if let Some(parent) = Path::new(relative).parent() {
                    if !parent.as_os_str().is_empty() {
                        dir = sandbox::resolve_safe(&target_dir, &parent.to_string_lossy())
                            .map_err(|e| {
                                ErrorResponse::with_status(StatusCode::BAD_REQUEST, e.to_string())
                            })?;
                        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
                            error!("Upload error creating {}: {}", dir.display(), e);
                            ErrorResponse::with_status(
                                StatusCode::INTERNAL_SERVER_ERROR,
                                "Upload failed",
                            )
                        })?;
                    }
                }
                if let Some(base) = Path::new(relative).file_name() {
                    file_name = base.to_string_lossy().into_owned();
                }
            }
        }

        sandbox::validate_name(&file_name)
            .map_err(|e| ErrorResponse::with_status(StatusCode::BAD_REQUEST, e.to_string()))?;
        let dest = dir.join(&file_name);
        tokio::fs::write(&dest, &data).await.map_err(|e| {
            error!("Upload error writing {}: {}", dest.display(), e);
            ErrorResponse::with_status(StatusCode::INTERNAL_SERVER_ERROR, "Upload failed")
        })?;

        uploaded.push(UploadedFile {
            name: file_name,
            size: data.len() as u64,
            path: sandbox::relative_display(&uploads, &dest),
        });
    }

    info!("Uploaded {} files to {}", uploaded.len(), target_dir.display());
    Ok(Json(UploadResponse {
        success: true,
        files: uploaded,
    }))
}

fn upload_error(e: axum::extract::multipart::MultipartError) -> (StatusCode, Json<ErrorResponse>) {
    error!("Upload error: {}", e);
    ErrorResponse::with_status(StatusCode::BAD_REQUEST, format!("Upload failed: {}", e))
}
