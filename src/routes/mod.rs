pub mod api;
pub mod auth_middleware;

use axum::{routing::get, Router};
use tower_http::{services::ServeDir, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::docs::ApiDoc;
use crate::handlers::{editor_page, index_page, login_page};
use crate::ws;
use crate::AppState;

/// Assemble the full application router: API, pages, WebSocket, Swagger
/// UI and static assets.
pub fn build_app(state: AppState) -> Router {
    let public_dir = state.config.public_dir.clone();

    let pages = Router::new()
        .route("/", get(index_page))
        .route("/login", get(login_page))
        .route("/editor", get(editor_page))
        .route("/editor/:room_id", get(editor_page))
        .with_state(state.clone());

    Router::new()
        .nest("/api", api::create_api_routes(state.clone()))
        .merge(pages)
        .merge(ws::handler::router(state))
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .fallback_service(ServeDir::new(public_dir))
        .layer(TraceLayer::new_for_http())
}
