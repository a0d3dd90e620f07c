//! Form bodies accepted by the web layer.

use serde::Deserialize;
use validator::Validate;

/// Username and password, posted to `/login` and `/register`.
#[derive(Debug, Deserialize, Validate)]
pub struct CredentialsForm {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Rename request, posted to `/edit`.
#[derive(Debug, Deserialize, Validate)]
pub struct RenameForm {
    /// Current filename.
    #[validate(length(min = 1, max = 255))]
    pub previous: String,
    /// Desired filename.
    #[validate(length(min = 1, max = 255))]
    pub new: String,
}

/// Delete request, posted to `/delete`.
#[derive(Debug, Deserialize, Validate)]
pub struct DeleteForm {
    #[validate(length(min = 1, max = 255))]
    pub previous: String,
}

/// Text file creation, posted to `/create`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateForm {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    /// File body. May be empty.
    #[serde(default)]
    pub details: String,
}
