//! Test helpers for HTTP integration tests.
//!
//! Builds the router over an in-memory database and a temporary namespace
//! directory, and drives it with `axum-test`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::http::StatusCode;
use axum_extra::extract::cookie::Cookie;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::TestServer;
use tempfile::TempDir;

use filekeep::{create_router, AppState, Config, Database};

/// Session cookie name used by the default configuration.
pub const SESSION_COOKIE: &str = "filekeep_session";

/// A running test application.
pub struct TestApp {
    pub server: TestServer,
    pub state: Arc<AppState>,
    // Keeps the namespace and spool directories alive.
    pub temp_dir: TempDir,
}

/// Create a test application with the default configuration.
pub async fn create_test_app() -> TestApp {
    create_test_app_with(|_| {}).await
}

/// Create a test application after adjusting the configuration.
pub async fn create_test_app_with(configure: impl FnOnce(&mut Config)) -> TestApp {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");

    let mut config = Config::default();
    config.files.storage_path = temp_dir.path().join("files").display().to_string();
    config.files.upload_tmp_path = temp_dir.path().join("uploads").display().to_string();
    configure(&mut config);

    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");
    let state = Arc::new(
        AppState::from_config(&config, db)
            .await
            .expect("Failed to build app state"),
    );

    let router = create_router(state.clone());
    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        state,
        temp_dir,
    }
}

impl TestApp {
    /// Register a user through the HTTP interface.
    pub async fn register(&self, username: &str, password: &str) {
        let response = self
            .server
            .post("/register")
            .form(&[("username", username), ("password", password)])
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
    }

    /// Log in and return the session cookie.
    pub async fn login(&self, username: &str, password: &str) -> Cookie<'static> {
        let response = self
            .server
            .post("/login")
            .form(&[("username", username), ("password", password)])
            .await;
        response.assert_status(StatusCode::SEE_OTHER);
        response.cookie(SESSION_COOKIE)
    }

    /// Register a user and log them in.
    pub async fn register_and_login(&self, username: &str, password: &str) -> Cookie<'static> {
        self.register(username, password).await;
        self.login(username, password).await
    }

    /// Upload a file as the given session.
    pub async fn upload(
        &self,
        session: &Cookie<'static>,
        filename: &str,
        content: &[u8],
    ) -> axum_test::TestResponse {
        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(content.to_vec())
                .file_name(filename.to_string())
                .mime_type("text/plain"),
        );

        self.server
            .post("/upload")
            .add_cookie(session.clone())
            .multipart(form)
            .await
    }

    /// Filenames listed by `GET /`.
    pub async fn list(&self, session: &Cookie<'static>) -> Vec<String> {
        let response = self.server.get("/").add_cookie(session.clone()).await;
        response.assert_status_ok();

        let body = response.json::<serde_json::Value>();
        body["data"]["files"]
            .as_array()
            .expect("files array")
            .iter()
            .map(|v| v.as_str().expect("filename").to_string())
            .collect()
    }
}
