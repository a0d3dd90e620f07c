//! Authentication handlers.

use axum::{
    extract::State,
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;

use crate::web::dto::{CredentialsForm, ValidatedForm};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

const LOGIN_FORM: &str = r#"<!DOCTYPE html>
<html>
<head><title>Log in</title></head>
<body>
<h1>Log in</h1>
<form method="post" action="/login">
  <label>Username <input name="username" required></label>
  <label>Password <input name="password" type="password" required></label>
  <button type="submit">Log in</button>
</form>
<p><a href="/register">Register</a></p>
</body>
</html>
"#;

const REGISTER_FORM: &str = r#"<!DOCTYPE html>
<html>
<head><title>Register</title></head>
<body>
<h1>Register</h1>
<form method="post" action="/register">
  <label>Username <input name="username" maxlength="32" required></label>
  <label>Password <input name="password" type="password" maxlength="128" required></label>
  <button type="submit">Register</button>
</form>
<p><a href="/login">Log in</a></p>
</body>
</html>
"#;

/// GET /login - Login form.
pub async fn login_form() -> Html<&'static str> {
    Html(LOGIN_FORM)
}

/// GET /register - Registration form.
pub async fn register_form() -> Html<&'static str> {
    Html(REGISTER_FORM)
}

/// POST /register - Create a user, then send them to the login form.
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedForm(form): ValidatedForm<CredentialsForm>,
) -> Result<Redirect, ApiError> {
    state
        .auth
        .register(&form.username, &form.password)
        .await
        .map_err(|e| ApiError::from(e).during("register user"))?;
    Ok(Redirect::to("/login"))
}

/// POST /login - Open a session and set the session cookie.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    ValidatedForm(form): ValidatedForm<CredentialsForm>,
) -> Result<(CookieJar, Redirect), ApiError> {
    let session = state
        .auth
        .login(&form.username, &form.password)
        .await
        .map_err(|e| ApiError::from(e).during("log in"))?;
    let jar = jar.add(state.cookie.issue(&session.token));

    Ok((jar, Redirect::to("/")))
}

/// GET /logout - Destroy the session, if any, and clear the cookie.
pub async fn logout(State(state): State<Arc<AppState>>, jar: CookieJar) -> (CookieJar, Redirect) {
    if let Some(token) = state.cookie.token(&jar) {
        if let Err(e) = state.auth.logout(&token).await {
            tracing::warn!(error = %e, "Failed to destroy session");
        }
    }

    (jar.remove(state.cookie.removal()), Redirect::to("/login"))
}
