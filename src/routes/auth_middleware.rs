use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::Response,
    Json,
};

use crate::auth::session;
use crate::models::ErrorResponse;
use crate::AppState;

/// Require a valid session for everything behind this layer.
///
/// With authentication disabled in the configuration every request passes
/// straight through. The authenticated username lands in the request
/// extensions for downstream handlers.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, (StatusCode, Json<ErrorResponse>)> {
    if !state.config.auth_enabled {
        return Ok(next.run(req).await);
    }

    let session = session::token_from_headers(req.headers())
        .and_then(|token| state.sessions.validate(&token));

    match session {
        Some(session) => {
            req.extensions_mut().insert(session.username);
            Ok(next.run(req).await)
        }
        None => Err(ErrorResponse::with_status(
            StatusCode::UNAUTHORIZED,
            "Authentication required",
        )),
    }
}
