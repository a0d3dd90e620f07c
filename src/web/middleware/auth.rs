//! Session authentication guard.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::request::Parts,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;

use crate::db::User;
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::{FilekeepError, Result};

/// Where requests without a valid session are sent.
pub const LOGIN_PATH: &str = "/login";

/// Resolve the request's session cookie to a user.
///
/// Fails with `NoSession` when the cookie is missing or does not name a live
/// session.
pub async fn authorize(state: &AppState, jar: &CookieJar) -> Result<User> {
    let token = state.cookie.token(jar).ok_or(FilekeepError::NoSession)?;
    state.auth.resolve_session(&token).await
}

/// Route layer that only lets requests with a valid session through.
///
/// The resolved user is stored in the request extensions for [`AuthUser`].
/// Anything else is redirected to the login form and the handler never runs.
pub async fn require_session(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    mut req: Request,
    next: Next,
) -> Response {
    match authorize(&state, &jar).await {
        Ok(user) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Err(FilekeepError::NoSession) => {
            tracing::debug!(path = %req.uri().path(), "No session, redirecting to login");
            Redirect::to(LOGIN_PATH).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// Extractor for the user resolved by [`require_session`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> std::result::Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<User>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| ApiError::unauthorized("Not logged in"))
    }
}
