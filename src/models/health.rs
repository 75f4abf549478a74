use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Response for a health or readiness check
#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}
