use std::io::{Cursor, Write};

use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use tracing::{error, warn};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::models::{ErrorResponse, ZipRequest};
use crate::utils::sandbox;
use crate::AppState;

/// Bundle a selection of files into a ZIP attachment.
///
/// Directories, unreadable entries and paths outside the sandbox are
/// skipped with a log, matching the behavior of adding what can be added.
pub async fn download_zip(
    State(state): State<AppState>,
    Json(request): Json<ZipRequest>,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    if request.files.is_empty() {
        return Err(ErrorResponse::with_status(
            StatusCode::BAD_REQUEST,
            "No files specified",
        ));
    }

    let uploads = state.config.uploads_path();
    let mut entries: Vec<(String, Vec<u8>)> = Vec::new();
    for path in &request.files {
        let full_path = match sandbox::resolve_safe(&uploads, path) {
            Ok(full_path) => full_path,
            Err(e) => {
                warn!("Skipping {} in archive: {}", path, e);
                continue;
            }
        };
        match tokio::fs::metadata(&full_path).await {
            Ok(metadata) if metadata.is_file() => {}
            Ok(_) => continue,
            Err(e) => {
                warn!("Skipping {} in archive: {}", path, e);
                continue;
            }
        }
        match tokio::fs::read(&full_path).await {
            Ok(data) => {
                let name = full_path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| "file".to_string());
                entries.push((name, data));
            }
            Err(e) => warn!("Error adding file {} to archive: {}", path, e),
        }
    }

    let archive = build_archive(entries).map_err(|e| {
        error!("Archive error: {}", e);
        ErrorResponse::with_status(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create archive")
    })?;

    let filename = format!("selected-files-{}.zip", Utc::now().timestamp_millis());
    Ok((
        [
            (header::CONTENT_TYPE, "application/zip".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        archive,
    )
        .into_response())
}

fn build_archive(entries: Vec<(String, Vec<u8>)>) -> zip::result::ZipResult<Vec<u8>> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, data) in entries {
        writer.start_file(name, options)?;
        writer.write_all(&data)?;
    }
    Ok(writer.finish()?.into_inner())
}
