use utoipa::OpenApi;

use crate::models::*;

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
#[allow(dead_code)]
pub async fn health_check_doc() {}

/// Log in with admin credentials
#[utoipa::path(
    post,
    path = "/api/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Session created", body = LoginResponse),
        (status = 401, description = "Invalid credentials", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn login_doc() {}

/// Authentication status for the current session
#[utoipa::path(
    get,
    path = "/api/auth-status",
    responses(
        (status = 200, description = "Current status", body = AuthStatusResponse)
    )
)]
#[allow(dead_code)]
pub async fn auth_status_doc() {}

/// List files and folders
#[utoipa::path(
    get,
    path = "/api/files",
    params(("path" = Option<String>, Query, description = "Directory relative to the uploads root")),
    responses(
        (status = 200, description = "Directory listing", body = ListFilesResponse),
        (status = 404, description = "Directory not found", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn list_files_doc() {}

/// Create a folder
#[utoipa::path(
    post,
    path = "/api/create-folder",
    request_body = CreateFolderRequest,
    responses(
        (status = 200, description = "Folder created", body = SuccessResponse),
        (status = 400, description = "Invalid name or folder exists", body = ErrorResponse)
    )
)]
#[allow(dead_code)]
pub async fn create_folder_doc() {}

/// Live editor and process statistics
#[utoipa::path(
    get,
    path = "/api/diagnostics",
    responses(
        (status = 200, description = "Current statistics", body = DiagnosticsResponse)
    )
)]
#[allow(dead_code)]
pub async fn diagnostics_doc() {}

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check_doc,
        login_doc,
        auth_status_doc,
        list_files_doc,
        create_folder_doc,
        diagnostics_doc,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorResponse,
            LoginRequest,
            LoginResponse,
            AuthStatusResponse,
            FileEntry,
            ListFilesResponse,
            CreateFolderRequest,
            SuccessResponse,
            DiagnosticsResponse,
        )
    ),
    tags(
        (name = "api", description = "File manager and editor API")
    )
)]
pub struct ApiDoc;
