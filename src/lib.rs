pub mod auth;
pub mod config;
pub mod docs;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod utils;
pub mod ws;

use std::sync::Arc;

use auth::session::SessionStore;
use config::Config;
use ws::registry::RoomRegistry;

/// Shared application state available to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sessions: SessionStore,
    pub registry: Arc<RoomRegistry>,
}
