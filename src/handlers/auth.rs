use axum::{
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use tracing::{info, warn};

use crate::auth::session;
use crate::models::{AuthStatusResponse, ErrorResponse, LoginRequest, LoginResponse};
use crate::AppState;

use axum::extract::State;

/// Check credentials and issue a session cookie
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorResponse>)> {
    if request.username == state.config.admin_username
        && request.password == state.config.admin_password
    {
        let token = state.sessions.create(&request.username, request.remember_me);
        info!("User {} logged in", request.username);
        Ok((
            StatusCode::OK,
            [(
                header::SET_COOKIE,
                session::session_cookie(&token, request.remember_me),
            )],
            Json(LoginResponse { success: true }),
        ))
    } else {
        warn!("Failed login attempt for user {}", request.username);
        Err(ErrorResponse::with_status(
            StatusCode::UNAUTHORIZED,
            "Invalid credentials",
        ))
    }
}

/// Revoke the current session and clear the cookie
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> impl IntoResponse {
    if let Some(token) = session::token_from_headers(&headers) {
        state.sessions.revoke(&token);
    }
    (
        StatusCode::OK,
        [(header::SET_COOKIE, session::clear_session_cookie())],
        Json(LoginResponse { success: true }),
    )
}

/// Report whether the caller is authenticated. Never returns 401.
pub async fn auth_status(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Json<AuthStatusResponse> {
    let authenticated = !state.config.auth_enabled
        || session::token_from_headers(&headers)
            .and_then(|token| state.sessions.validate(&token))
            .is_some();
    Json(AuthStatusResponse {
        authenticated,
        auth_enabled: state.config.auth_enabled,
    })
}
