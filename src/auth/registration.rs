//! User registration for Filekeep.

use tracing::info;

use crate::auth::hash_password;
use crate::auth::validation::validate_username;
use crate::db::{NewUser, User, UserRepository};
use crate::{FilekeepError, Result};

/// Registration request data.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    /// Desired username (1-32 characters).
    pub username: String,
    /// Password (1-128 characters).
    pub password: String,
}

impl RegistrationRequest {
    /// Create a new registration request.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

/// Register a new user.
///
/// This function:
/// 1. Validates the username
/// 2. Checks if the username already exists
/// 3. Hashes the password
/// 4. Creates the user in the credential store
pub async fn register(repo: &UserRepository<'_>, request: RegistrationRequest) -> Result<User> {
    validate_username(&request.username)
        .map_err(|e| FilekeepError::Validation(e.to_string()))?;

    if repo.username_exists(&request.username).await? {
        return Err(FilekeepError::DuplicateUser(request.username));
    }

    let password_hash =
        hash_password(&request.password).map_err(|e| FilekeepError::Validation(e.to_string()))?;

    let user = repo
        .create(&NewUser::new(&request.username, password_hash))
        .await?;

    info!(
        username = %user.username,
        user_id = user.id,
        "New user registered"
    );

    Ok(user)
}
