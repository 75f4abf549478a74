use std::path::Path;

use axum::{extract::State, http::StatusCode, Json};
use tracing::{error, info};

use crate::models::{ErrorResponse, SaveEditorFileRequest, SaveEditorFileResponse};
use crate::utils::sandbox;
use crate::ws::registry::{RoomRegistry, DEFAULT_ROOM};
use crate::AppState;

/// Manually export editor content to a file under Saved/.
///
/// Non-default rooms get a `_room-<id>` suffix; name collisions resolve
/// with an `_<n>` counter.
pub async fn save_editor_file(
    State(state): State<AppState>,
    Json(request): Json<SaveEditorFileRequest>,
) -> Result<Json<SaveEditorFileResponse>, (StatusCode, Json<ErrorResponse>)> {
    let filename = request.filename.trim();
    if filename.is_empty() {
        return Err(ErrorResponse::with_status(
            StatusCode::BAD_REQUEST,
            "Filename is required",
        ));
    }
    sandbox::validate_name(filename)
        .map_err(|e| ErrorResponse::with_status(StatusCode::BAD_REQUEST, e.to_string()))?;

    let saved_dir = state.config.saved_path();
    tokio::fs::create_dir_all(&saved_dir).await.map_err(|e| {
        error!("Save editor file error: {}", e);
        ErrorResponse::with_status(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save file")
    })?;

    let room_id = RoomRegistry::normalize_room_id(&request.room_id);
    let mut final_name = if room_id != DEFAULT_ROOM {
        let (stem, ext) = split_name(filename);
        format!("{stem}_room-{room_id}{ext}")
    } else {
        filename.to_string()
    };

    let (base_stem, base_ext) = split_name(&final_name);
    let mut full_path = saved_dir.join(&final_name);
    let mut counter = 1;
    while tokio::fs::try_exists(&full_path).await.unwrap_or(false) {
        final_name = format!("{base_stem}_{counter}{base_ext}");
        full_path = saved_dir.join(&final_name);
        counter += 1;
    }

    tokio::fs::write(&full_path, &request.content)
        .await
        .map_err(|e| {
            error!("Save editor file error for {}: {}", full_path.display(), e);
            ErrorResponse::with_status(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save file")
        })?;

    info!("Editor content saved to {}", full_path.display());
    Ok(Json(SaveEditorFileResponse {
        success: true,
        path: sandbox::relative_display(&state.config.uploads_path(), &full_path),
        size: request.content.len() as u64,
        filename: final_name,
    }))
}

fn split_name(name: &str) -> (String, String) {
    let path = Path::new(name);
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) => (
            path.file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default(),
            format!(".{ext}"),
        ),
        None => (name.to_string(), String::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_name_separates_stem_and_extension() {
        assert_eq!(
            split_name("notes.txt"),
            ("notes".to_string(), ".txt".to_string())
        );
        assert_eq!(split_name("README"), ("README".to_string(), String::new()));
        assert_eq!(
            split_name("a.b.c"),
            ("a.b".to_string(), ".c".to_string())
        );
    }
}
