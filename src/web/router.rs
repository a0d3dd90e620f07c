//! Router configuration for the web layer.

use axum::{
    extract::{DefaultBodyLimit, State},
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::error::ApiError;
use super::handlers::{
    create_file, delete_file, delete_form, download_file, edit_form, list_files, login,
    login_form, logout, register, register_form, rename_file, upload_file, view_file, AppState,
};
use super::middleware::require_session;

/// Create the application router.
pub fn create_router(state: Arc<AppState>) -> Router {
    // Reachable without a session
    let public_routes = Router::new()
        .route("/login", get(login_form).post(login))
        .route("/register", get(register_form).post(register))
        .route("/logout", get(logout))
        .route("/health", get(health_check));

    // Everything else goes through the session guard
    let protected_routes = Router::new()
        .route("/", get(list_files))
        .route("/file/:filename", get(view_file))
        .route("/edit/:filename", get(edit_form))
        .route("/edit", post(rename_file))
        .route("/delete/:filename", get(delete_form))
        .route("/delete", post(delete_file))
        .route("/create", post(create_file))
        .route("/upload", post(upload_file))
        .route("/download/:filename", get(download_file))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_session,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(state.max_upload_size)),
        )
        .with_state(state)
}

/// Health check handler.
async fn health_check(State(state): State<Arc<AppState>>) -> Result<&'static str, ApiError> {
    state.db.schema_version().await?;
    Ok("OK")
}
