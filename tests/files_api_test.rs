mod common;

use std::net::SocketAddr;

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .cookie_store(true)
        .build()
        .expect("client")
}

fn url(addr: SocketAddr, path: &str) -> String {
    format!("http://{addr}{path}")
}

async fn login(client: &reqwest::Client, addr: SocketAddr) {
    let res = client
        .post(url(addr, "/api/login"))
        .json(&serde_json::json!({ "username": "admin", "password": "admin123" }))
        .send()
        .await
        .expect("login");
    assert_eq!(res.status(), 200);
}

#[tokio::test]
async fn login_flow_grants_and_revokes_access() {
    let (state, _dir) = common::test_state(true);
    let addr = common::start_server(state).await;
    let client = client();

    let status: serde_json::Value = client
        .get(url(addr, "/api/auth-status"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["authenticated"], false);

    let res = client
        .get(url(addr, "/api/files"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);

    let res = client
        .post(url(addr, "/api/login"))
        .json(&serde_json::json!({ "username": "admin", "password": "wrong" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 401);

    login(&client, addr).await;

    let status: serde_json::Value = client
        .get(url(addr, "/api/auth-status"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(status["authenticated"], true);
    assert_eq!(status["authEnabled"], true);

    let res = client.get(url(addr, "/api/files")).send().await.unwrap();
    assert_eq!(res.status(), 200);

    let res = client.post(url(addr, "/api/logout")).send().await.unwrap();
    assert_eq!(res.status(), 200);

    let res = client.get(url(addr, "/api/files")).send().await.unwrap();
    assert_eq!(res.status(), 401);
}

#[tokio::test]
async fn file_lifecycle_create_edit_rename_delete() {
    let (state, _dir) = common::test_state(false);
    let addr = common::start_server(state).await;
    let client = client();

    let res = client
        .post(url(addr, "/api/create-folder"))
        .json(&serde_json::json!({ "currentPath": "", "name": "docs" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let res = client
        .post(url(addr, "/api/create-file"))
        .json(&serde_json::json!({ "currentPath": "docs", "name": "notes.txt" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let created: serde_json::Value = res.json().await.unwrap();
    assert_eq!(created["file"]["path"], "docs/notes.txt");

    let listing: serde_json::Value = client
        .get(url(addr, "/api/files?path=docs"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listing["currentPath"], "docs");
    assert_eq!(listing["items"][0]["name"], "notes.txt");
    assert_eq!(listing["items"][0]["isDirectory"], false);

    let res = client
        .post(url(addr, "/api/save-file/docs/notes.txt"))
        .json(&serde_json::json!({ "content": "line one" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let content: serde_json::Value = client
        .get(url(addr, "/api/file-content/docs/notes.txt"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(content["content"], "line one");

    let res = client
        .post(url(addr, "/api/rename/docs/notes.txt"))
        .json(&serde_json::json!({ "newName": "renamed.txt" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let res = client
        .get(url(addr, "/api/download/docs/renamed.txt"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(res.bytes().await.unwrap().as_ref(), b"line one");

    let res = client
        .delete(url(addr, "/api/delete/docs/renamed.txt"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let res = client
        .get(url(addr, "/api/download/docs/renamed.txt"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);
}

#[tokio::test]
async fn path_traversal_attempts_are_rejected() {
    let (state, _dir) = common::test_state(false);
    let addr = common::start_server(state).await;
    let client = client();

    let res = client
        .get(url(addr, "/api/files?path=../outside"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);

    let res = client
        .post(url(addr, "/api/create-file"))
        .json(&serde_json::json!({ "currentPath": "", "name": "../evil.txt" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);

    let res = client
        .post(url(addr, "/api/rename/a.txt"))
        .json(&serde_json::json!({ "newName": "b/c.txt" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
}

#[tokio::test]
async fn multipart_upload_lands_in_the_current_path() {
    let (state, _dir) = common::test_state(false);
    let addr = common::start_server(state).await;
    let client = client();

    let res = client
        .post(url(addr, "/api/create-folder"))
        .json(&serde_json::json!({ "currentPath": "", "name": "inbox" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);

    let form = reqwest::multipart::Form::new()
        .text("currentPath", "inbox")
        .part(
            "files",
            reqwest::multipart::Part::bytes(b"payload".to_vec()).file_name("report.txt"),
        );
    let res = client
        .post(url(addr, "/api/upload"))
        .multipart(form)
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let body: serde_json::Value = res.json().await.unwrap();
    assert_eq!(body["files"][0]["name"], "report.txt");

    let res = client
        .get(url(addr, "/api/download/inbox/report.txt"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.bytes().await.unwrap().as_ref(), b"payload");
}

#[tokio::test]
async fn zip_download_bundles_the_selection() {
    let (state, _dir) = common::test_state(false);
    let addr = common::start_server(state).await;
    let client = client();

    for name in ["a.txt", "b.txt"] {
        let res = client
            .post(url(addr, "/api/create-file"))
            .json(&serde_json::json!({ "currentPath": "", "name": name }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
    }

    let res = client
        .post(url(addr, "/api/download-zip"))
        .json(&serde_json::json!({ "files": ["a.txt", "b.txt"] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    assert_eq!(
        res.headers()["content-type"].to_str().unwrap(),
        "application/zip"
    );
    let bytes = res.bytes().await.unwrap();
    assert_eq!(&bytes[..2], b"PK");

    // An empty selection is an error, not an empty archive.
    let res = client
        .post(url(addr, "/api/download-zip"))
        .json(&serde_json::json!({ "files": [] }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 400);
}

#[tokio::test]
async fn editor_save_suffixes_room_and_deduplicates() {
    let (state, _dir) = common::test_state(false);
    let addr = common::start_server(state).await;
    let client = client();

    let res = client
        .post(url(addr, "/api/save-editor-file"))
        .json(&serde_json::json!({
            "filename": "notes.txt",
            "content": "draft",
            "roomId": "7"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let first: serde_json::Value = res.json().await.unwrap();
    assert_eq!(first["filename"], "notes_room-7.txt");

    let res = client
        .post(url(addr, "/api/save-editor-file"))
        .json(&serde_json::json!({
            "filename": "notes.txt",
            "content": "second draft",
            "roomId": "7"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 200);
    let second: serde_json::Value = res.json().await.unwrap();
    assert_eq!(second["filename"], "notes_room-7_1.txt");
}
