//! Web File Tests
//!
//! Integration tests for the file lifecycle endpoints.

mod common;

use axum::http::{header, StatusCode};
use axum_test::multipart::{MultipartForm, Part};
use serde_json::Value;

use common::{create_test_app, create_test_app_with};

#[tokio::test]
async fn test_upload_then_view() {
    let app = create_test_app().await;
    let session = app.register_and_login("alice", "secret").await;

    let response = app.upload(&session, "report.txt", b"hello").await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/");

    let response = app
        .server
        .get("/file/report.txt")
        .add_cookie(session.clone())
        .await;
    response.assert_status_ok();

    let body = response.json::<Value>();
    assert_eq!(body["data"]["filename"], "report.txt");
    assert_eq!(body["data"]["content"], "hello");
    assert_eq!(body["data"]["extension"], ".txt");
    assert_eq!(body["data"]["kind"], "text");

    assert_eq!(app.list(&session).await, vec!["report.txt"]);
}

#[tokio::test]
async fn test_upload_leaves_no_temp_files() {
    let app = create_test_app().await;
    let session = app.register_and_login("alice", "secret").await;

    app.upload(&session, "report.txt", b"hello")
        .await
        .assert_status(StatusCode::SEE_OTHER);

    let mut spool = std::fs::read_dir(app.temp_dir.path().join("uploads")).unwrap();
    assert!(spool.next().is_none());
}

#[tokio::test]
async fn test_upload_overwrites_same_name() {
    let app = create_test_app().await;
    let session = app.register_and_login("alice", "secret").await;

    app.upload(&session, "report.txt", b"first").await;
    app.upload(&session, "report.txt", b"second").await;

    let body = app
        .server
        .get("/file/report.txt")
        .add_cookie(session.clone())
        .await
        .json::<Value>();
    assert_eq!(body["data"]["content"], "second");
    assert_eq!(app.list(&session).await, vec!["report.txt"]);
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let app = create_test_app().await;
    let session = app.register_and_login("alice", "secret").await;

    let form = MultipartForm::new().add_text("note", "no file here");
    let response = app
        .server
        .post("/upload")
        .add_cookie(session.clone())
        .multipart(form)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(app.list(&session).await.is_empty());
}

#[tokio::test]
async fn test_upload_over_size_limit() {
    let app = create_test_app_with(|config| config.files.max_upload_size_mb = 1).await;
    let session = app.register_and_login("alice", "secret").await;

    let form = MultipartForm::new().add_part(
        "file",
        Part::bytes(vec![b'x'; 2 * 1024 * 1024]).file_name("big.bin"),
    );
    let response = app
        .server
        .post("/upload")
        .add_cookie(session.clone())
        .multipart(form)
        .await;

    response.assert_status(StatusCode::PAYLOAD_TOO_LARGE);
    assert!(app.list(&session).await.is_empty());
}

#[tokio::test]
async fn test_view_missing_file() {
    let app = create_test_app().await;
    let session = app.register_and_login("alice", "secret").await;

    let response = app
        .server
        .get("/file/missing.txt")
        .add_cookie(session)
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_directory_in_namespace_is_not_a_file() {
    let app = create_test_app().await;
    let session = app.register_and_login("alice", "secret").await;
    std::fs::create_dir(app.temp_dir.path().join("files").join("sub")).unwrap();

    app.server
        .get("/file/sub")
        .add_cookie(session.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);
    app.server
        .post("/delete")
        .add_cookie(session.clone())
        .form(&[("previous", "sub")])
        .await
        .assert_status(StatusCode::NOT_FOUND);

    assert!(app.list(&session).await.is_empty());
}

#[tokio::test]
async fn test_view_traversal_name_rejected() {
    let app = create_test_app().await;
    let session = app.register_and_login("alice", "secret").await;

    let response = app
        .server
        .get("/file/..%2Fsecret.txt")
        .add_cookie(session)
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_edit_and_delete_form_models() {
    let app = create_test_app().await;
    let session = app.register_and_login("alice", "secret").await;

    let body = app
        .server
        .get("/edit/a.txt")
        .add_cookie(session.clone())
        .await
        .json::<Value>();
    assert_eq!(body["data"]["filename"], "a.txt");

    let body = app
        .server
        .get("/delete/a.txt")
        .add_cookie(session)
        .await
        .json::<Value>();
    assert_eq!(body["data"]["filename"], "a.txt");
}

#[tokio::test]
async fn test_rename() {
    let app = create_test_app().await;
    let session = app.register_and_login("alice", "secret").await;
    app.upload(&session, "a.txt", b"data").await;

    let response = app
        .server
        .post("/edit")
        .add_cookie(session.clone())
        .form(&[("previous", "a.txt"), ("new", "b.txt")])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/");

    assert_eq!(app.list(&session).await, vec!["b.txt"]);
    app.server
        .get("/file/a.txt")
        .add_cookie(session.clone())
        .await
        .assert_status(StatusCode::NOT_FOUND);
    let body = app
        .server
        .get("/file/b.txt")
        .add_cookie(session)
        .await
        .json::<Value>();
    assert_eq!(body["data"]["content"], "data");
}

#[tokio::test]
async fn test_rename_onto_existing_name() {
    let app = create_test_app().await;
    let session = app.register_and_login("alice", "secret").await;
    app.upload(&session, "a.txt", b"a").await;
    app.upload(&session, "b.txt", b"b").await;

    let response = app
        .server
        .post("/edit")
        .add_cookie(session.clone())
        .form(&[("previous", "a.txt"), ("new", "b.txt")])
        .await;

    response.assert_status(StatusCode::CONFLICT);
    assert_eq!(app.list(&session).await, vec!["a.txt", "b.txt"]);
}

#[tokio::test]
async fn test_rename_to_traversal_name() {
    let app = create_test_app().await;
    let session = app.register_and_login("alice", "secret").await;
    app.upload(&session, "a.txt", b"a").await;

    let response = app
        .server
        .post("/edit")
        .add_cookie(session.clone())
        .form(&[("previous", "a.txt"), ("new", "../x")])
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(app.list(&session).await, vec!["a.txt"]);
    assert!(!app.temp_dir.path().join("x").exists());
}

#[tokio::test]
async fn test_delete() {
    let app = create_test_app().await;
    let session = app.register_and_login("alice", "secret").await;
    app.upload(&session, "b.txt", b"data").await;

    let response = app
        .server
        .post("/delete")
        .add_cookie(session.clone())
        .form(&[("previous", "b.txt")])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert!(app.list(&session).await.is_empty());

    let response = app
        .server
        .post("/delete")
        .add_cookie(session)
        .form(&[("previous", "b.txt")])
        .await;
    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create() {
    let app = create_test_app().await;
    let session = app.register_and_login("alice", "secret").await;

    let response = app
        .server
        .post("/create")
        .add_cookie(session.clone())
        .form(&[("title", "My Title"), ("details", "body text")])
        .await;
    response.assert_status(StatusCode::SEE_OTHER);

    assert_eq!(app.list(&session).await, vec!["MyTitle.txt"]);
    let body = app
        .server
        .get("/file/MyTitle.txt")
        .add_cookie(session)
        .await
        .json::<Value>();
    assert_eq!(body["data"]["content"], "body text");
}

#[tokio::test]
async fn test_create_blank_title() {
    let app = create_test_app().await;
    let session = app.register_and_login("alice", "secret").await;

    let response = app
        .server
        .post("/create")
        .add_cookie(session.clone())
        .form(&[("title", "   "), ("details", "body")])
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(app.list(&session).await.is_empty());
}

#[tokio::test]
async fn test_download() {
    let app = create_test_app().await;
    let session = app.register_and_login("alice", "secret").await;
    app.upload(&session, "report.txt", b"hello").await;

    let response = app
        .server
        .get("/download/report.txt")
        .add_cookie(session)
        .await;

    response.assert_status_ok();
    assert_eq!(response.as_bytes().as_ref(), b"hello");
    assert_eq!(response.header(header::CONTENT_TYPE), "text/plain");
    assert_eq!(
        response.header(header::CONTENT_DISPOSITION),
        "attachment; filename=\"report.txt\""
    );
    assert_eq!(response.header(header::CONTENT_LENGTH), "5");
}

#[tokio::test]
async fn test_download_missing_file() {
    let app = create_test_app().await;
    let session = app.register_and_login("alice", "secret").await;

    let response = app
        .server
        .get("/download/missing.bin")
        .add_cookie(session)
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_any_user_may_act_by_default() {
    let app = create_test_app().await;
    let alice = app.register_and_login("alice", "secret").await;
    let bob = app.register_and_login("bob", "hunter2").await;
    app.upload(&alice, "a.txt", b"alice's").await;

    let body = app
        .server
        .get("/file/a.txt")
        .add_cookie(bob.clone())
        .await
        .json::<Value>();
    assert_eq!(body["data"]["content"], "alice's");

    app.server
        .post("/delete")
        .add_cookie(bob.clone())
        .form(&[("previous", "a.txt")])
        .await
        .assert_status(StatusCode::SEE_OTHER);
    assert!(app.list(&bob).await.is_empty());
}

#[tokio::test]
async fn test_ownership_enforced() {
    let app = create_test_app_with(|config| config.files.enforce_ownership = true).await;
    let alice = app.register_and_login("alice", "secret").await;
    let bob = app.register_and_login("bob", "hunter2").await;
    app.upload(&alice, "a.txt", b"alice's").await;

    let response = app.server.get("/file/a.txt").add_cookie(bob.clone()).await;
    response.assert_status(StatusCode::FORBIDDEN);

    app.server
        .get("/download/a.txt")
        .add_cookie(bob.clone())
        .await
        .assert_status(StatusCode::FORBIDDEN);

    app.server
        .post("/delete")
        .add_cookie(bob.clone())
        .form(&[("previous", "a.txt")])
        .await
        .assert_status(StatusCode::FORBIDDEN);

    // Listing is not filtered by owner
    assert_eq!(app.list(&bob).await, vec!["a.txt"]);

    app.server
        .get("/file/a.txt")
        .add_cookie(alice)
        .await
        .assert_status_ok();
}
