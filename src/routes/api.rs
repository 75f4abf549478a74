use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::handlers::{
    auth_status, create_file, create_folder, delete_item, diagnostics, download_file,
    download_zip, file_content, health_check, list_files, login, logout, ready_check,
    rename_item, save_editor_file, save_file, upload_files,
};
use crate::routes::auth_middleware::auth_middleware;
use crate::AppState;

/// Create API routes
pub fn create_api_routes(state: AppState) -> Router {
    // Reachable without a session.
    let public = Router::new()
        .route("/health", get(health_check))
        .route("/ready", get(ready_check))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/auth-status", get(auth_status));

    let protected = Router::new()
        .route("/files", get(list_files))
        .route(
            "/upload",
            post(upload_files).layer(DefaultBodyLimit::disable()),
        )
        .route("/download/*path", get(download_file))
        .route("/file-content/*path", get(file_content))
        .route("/save-file/*path", post(save_file))
        .route("/create-file", post(create_file))
        .route("/create-folder", post(create_folder))
        .route("/rename/*path", post(rename_item))
        .route("/delete/*path", delete(delete_item))
        .route("/download-zip", post(download_zip))
        .route("/save-editor-file", post(save_editor_file))
        .route("/diagnostics", get(diagnostics))
        // Applies to all routes added above
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    public.merge(protected).with_state(state)
}
