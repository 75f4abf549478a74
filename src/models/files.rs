use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One entry in a directory listing
#[derive(Serialize, Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileEntry {
    pub name: String,
    /// Path relative to the uploads root, with `/` separators
    pub path: String,
    pub is_directory: bool,
    pub size: u64,
    pub modified: DateTime<Utc>,
    /// Lowercased extension including the leading dot, empty if none
    pub extension: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ListFilesResponse {
    pub current_path: String,
    pub items: Vec<FileEntry>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct UploadedFile {
    pub name: String,
    pub size: u64,
    pub path: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct UploadResponse {
    pub success: bool,
    pub files: Vec<UploadedFile>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct FileContentResponse {
    pub content: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct SaveContentRequest {
    pub content: String,
}

/// Generic success acknowledgment
#[derive(Serialize, Deserialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFileRequest {
    pub name: String,
    #[serde(default)]
    pub current_path: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct CreateFileResponse {
    pub success: bool,
    pub file: UploadedFile,
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateFolderRequest {
    pub name: String,
    #[serde(default)]
    pub current_path: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RenameRequest {
    pub new_name: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ZipRequest {
    pub files: Vec<String>,
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SaveEditorFileRequest {
    pub filename: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub room_id: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct SaveEditorFileResponse {
    pub success: bool,
    pub filename: String,
    pub path: String,
    pub size: u64,
}
