use std::panic;
use std::sync::Arc;

use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use filedock::auth::session::SessionStore;
use filedock::config::Config;
use filedock::routes;
use filedock::ws::registry::RoomRegistry;
use filedock::ws::store::RoomStore;
use filedock::AppState;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Set panic hook for better error messages
    panic::set_hook(Box::new(|info| {
        eprintln!("PANIC: {info}");
    }));

    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "filedock=debug,tower_http=debug,axum::rejection=trace,info".into()
        }))
        .init();

    info!("Starting server...");

    // Load configuration
    let config = Config::load().unwrap_or_else(|e| {
        error!("Failed to load configuration: {}", e);
        warn!("Using default configuration");
        Config::default()
    });

    // Make sure the storage directories exist before serving
    for dir in [
        config.uploads_path(),
        config.editor_path(),
        config.saved_path(),
    ] {
        if let Err(e) = tokio::fs::create_dir_all(&dir).await {
            error!("Failed to create directory {}: {}", dir.display(), e);
        }
    }

    let store = RoomStore::new(config.editor_path());
    let registry = Arc::new(RoomRegistry::new(store));
    let state = AppState {
        config: Arc::new(config),
        sessions: SessionStore::new(),
        registry,
    };

    let app = routes::build_app(state.clone());

    let address = state.config.server_address();
    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .unwrap_or_else(|_| panic!("Failed to bind to {}", address));

    info!("🚀 Server running on http://{}", address);
    info!("📡 Realtime editor WebSocket available at ws://{}/ws", address);
    info!("📚 Swagger UI available at http://{}/swagger", address);
    info!(
        "Authentication: {}",
        if state.config.auth_enabled {
            "ENABLED"
        } else {
            "DISABLED"
        }
    );

    axum::serve(listener, app)
        .await
        .expect("Server failed to start");
}
