//! Web Auth Tests
//!
//! Integration tests for registration, login, logout and the session guard.

mod common;

use axum::http::StatusCode;
use axum_extra::extract::cookie::Cookie;
use serde_json::Value;

use common::{create_test_app, SESSION_COOKIE};

#[tokio::test]
async fn test_login_and_register_forms() {
    let app = create_test_app().await;

    let response = app.server.get("/login").await;
    response.assert_status_ok();
    assert!(response.text().contains("action=\"/login\""));

    let response = app.server.get("/register").await;
    response.assert_status_ok();
    assert!(response.text().contains("action=\"/register\""));
}

#[tokio::test]
async fn test_register_redirects_to_login() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/register")
        .form(&[("username", "alice"), ("password", "secret")])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/login");
}

#[tokio::test]
async fn test_register_duplicate_username() {
    let app = create_test_app().await;
    app.register("alice", "secret").await;

    let response = app
        .server
        .post("/register")
        .form(&[("username", "alice"), ("password", "other")])
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_register_empty_username() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/register")
        .form(&[("username", ""), ("password", "secret")])
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(body["error"]["details"]["username"].is_array());
}

#[tokio::test]
async fn test_register_missing_field() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/register")
        .form(&[("username", "alice")])
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_login_sets_session_cookie() {
    let app = create_test_app().await;
    app.register("alice", "secret").await;

    let response = app
        .server
        .post("/login")
        .form(&[("username", "alice"), ("password", "secret")])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/");

    let cookie = response.cookie(SESSION_COOKIE);
    assert!(!cookie.value().is_empty());
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.path(), Some("/"));
}

#[tokio::test]
async fn test_login_wrong_password() {
    let app = create_test_app().await;
    app.register("alice", "secret").await;

    let response = app
        .server
        .post("/login")
        .form(&[("username", "alice"), ("password", "wrong")])
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    let body = response.json::<Value>();
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");
    assert_eq!(body["error"]["message"], "invalid username or password");
}

#[tokio::test]
async fn test_login_unknown_user() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/login")
        .form(&[("username", "ghost"), ("password", "secret")])
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_session_grants_access() {
    let app = create_test_app().await;
    let session = app.register_and_login("alice", "secret").await;

    let response = app.server.get("/").add_cookie(session).await;

    response.assert_status_ok();
    let body = response.json::<Value>();
    assert!(body["data"]["files"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_protected_routes_redirect_without_session() {
    let app = create_test_app().await;

    for path in [
        "/",
        "/file/report.txt",
        "/edit/report.txt",
        "/delete/report.txt",
        "/download/report.txt",
    ] {
        let response = app.server.get(path).await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/login", "GET {path}");
    }

    for path in ["/edit", "/delete", "/create", "/upload"] {
        let response = app.server.post(path).await;
        response.assert_status(StatusCode::SEE_OTHER);
        assert_eq!(response.header("location"), "/login", "POST {path}");
    }
}

#[tokio::test]
async fn test_unknown_session_token_redirects() {
    let app = create_test_app().await;

    let response = app
        .server
        .get("/")
        .add_cookie(Cookie::new(SESSION_COOKIE, "not-a-real-token"))
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/login");
}

#[tokio::test]
async fn test_guard_runs_before_handler() {
    let app = create_test_app().await;

    let response = app
        .server
        .post("/create")
        .form(&[("title", "Sneaky"), ("details", "body")])
        .await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert!(!app.temp_dir.path().join("files").join("Sneaky.txt").exists());
}

#[tokio::test]
async fn test_logout_invalidates_session() {
    let app = create_test_app().await;
    let session = app.register_and_login("alice", "secret").await;

    let response = app.server.get("/logout").add_cookie(session.clone()).await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/login");

    let response = app.server.get("/").add_cookie(session).await;
    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/login");
}

#[tokio::test]
async fn test_logout_without_session() {
    let app = create_test_app().await;

    let response = app.server.get("/logout").await;

    response.assert_status(StatusCode::SEE_OTHER);
    assert_eq!(response.header("location"), "/login");
}

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app().await;

    let response = app.server.get("/health").await;

    response.assert_status_ok();
    assert_eq!(response.text(), "OK");
}
