use std::net::SocketAddr;
use std::sync::Arc;

use filedock::auth::session::SessionStore;
use filedock::config::Config;
use filedock::ws::registry::RoomRegistry;
use filedock::ws::store::RoomStore;
use filedock::AppState;

/// Build an isolated application state rooted in a fresh temp directory.
/// The returned TempDir must stay alive for the duration of the test.
pub fn test_state(auth_enabled: bool) -> (AppState, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let uploads = dir.path().join("uploads");
    std::fs::create_dir_all(uploads.join("Editor")).expect("editor dir");

    let config = Config {
        uploads_dir: uploads.to_string_lossy().into_owned(),
        public_dir: dir.path().join("public").to_string_lossy().into_owned(),
        auth_enabled,
        ..Config::default()
    };
    let store = RoomStore::new(config.editor_path());
    let state = AppState {
        config: Arc::new(config),
        sessions: SessionStore::new(),
        registry: Arc::new(RoomRegistry::new(store)),
    };
    (state, dir)
}

/// Start the app on an ephemeral port. The server runs in the background.
pub async fn start_server(state: AppState) -> SocketAddr {
    let app = filedock::routes::build_app(state);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    addr
}
