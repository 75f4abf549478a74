use std::io;
use std::path::Path;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{error, warn};

use crate::models::{ErrorResponse, FileEntry, ListFilesResponse};
use crate::utils::sandbox;
use crate::AppState;

#[derive(Deserialize)]
pub struct ListFilesQuery {
    #[serde(default)]
    pub path: String,
}

/// List files and folders under one directory of the sandboxed tree
pub async fn list_files(
    State(state): State<AppState>,
    Query(query): Query<ListFilesQuery>,
) -> Result<Json<ListFilesResponse>, (StatusCode, Json<ErrorResponse>)> {
    let uploads = state.config.uploads_path();
    let full_path = sandbox::resolve_safe(&uploads, &query.path)
        .map_err(|e| ErrorResponse::with_status(StatusCode::BAD_REQUEST, e.to_string()))?;

    let mut dir = match tokio::fs::read_dir(&full_path).await {
        Ok(dir) => dir,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(ErrorResponse::with_status(
                StatusCode::NOT_FOUND,
                "Directory not found",
            ));
        }
        Err(e) => {
            error!("Error reading directory {}: {}", full_path.display(), e);
            return Err(ErrorResponse::with_status(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to read directory",
            ));
        }
    };

    let mut items = Vec::new();
    loop {
        let entry = match dir.next_entry().await {
            Ok(Some(entry)) => entry,
            Ok(None) => break,
            Err(e) => {
                error!("Error reading directory {}: {}", full_path.display(), e);
                return Err(ErrorResponse::with_status(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to read directory",
                ));
            }
        };
        let metadata = match entry.metadata().await {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!("Skipping unreadable entry {:?}: {}", entry.file_name(), e);
                continue;
            }
        };
        let name = entry.file_name().to_string_lossy().into_owned();
        let extension = Path::new(&name)
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
            .unwrap_or_default();
        let modified = metadata
            .modified()
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(|_| Utc::now());

        items.push(FileEntry {
            path: sandbox::relative_display(&uploads, &entry.path()),
            is_directory: metadata.is_dir(),
            size: metadata.len(),
            modified,
            extension,
            name,
        });
    }

    // Directories first, then case-insensitive name order.
    items.sort_by(|a, b| {
        b.is_directory
            .cmp(&a.is_directory)
            .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });

    Ok(Json(ListFilesResponse {
        current_path: query.path,
        items,
    }))
}
