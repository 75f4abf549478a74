use std::path::Path;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::error;

use crate::auth::session;
use crate::AppState;

fn is_authenticated(state: &AppState, headers: &HeaderMap) -> bool {
    !state.config.auth_enabled
        || session::token_from_headers(headers)
            .and_then(|token| state.sessions.validate(&token))
            .is_some()
}

async fn serve_page(public_dir: &str, file: &str) -> Response {
    match tokio::fs::read_to_string(Path::new(public_dir).join(file)).await {
        Ok(body) => Html(body).into_response(),
        Err(e) => {
            error!("Failed to serve page {}: {}", file, e);
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Main file manager page, gated by the session
pub async fn index_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if !is_authenticated(&state, &headers) {
        return Redirect::to("/login").into_response();
    }
    serve_page(&state.config.public_dir, "index.html").await
}

/// Login page; sends authenticated users back to the app
pub async fn login_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if is_authenticated(&state, &headers) {
        return Redirect::to("/").into_response();
    }
    serve_page(&state.config.public_dir, "login.html").await
}

/// Realtime editor page, with or without an explicit room id in the URL
pub async fn editor_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if !is_authenticated(&state, &headers) {
        return Redirect::to("/login").into_response();
    }
    serve_page(&state.config.public_dir, "editor.html").await
}
