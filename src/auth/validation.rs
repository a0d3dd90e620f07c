//! Username validation for registration.

use thiserror::Error;

/// Maximum username length (in characters).
pub const MAX_USERNAME_LENGTH: usize = 32;

/// Username validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Username is empty.
    #[error("username must not be empty")]
    UsernameEmpty,

    /// Username is too long.
    #[error("username must be at most {MAX_USERNAME_LENGTH} characters")]
    UsernameTooLong,

    /// Username has leading or trailing whitespace.
    #[error("username must not start or end with whitespace")]
    UsernameUntrimmed,

    /// Username contains control characters.
    #[error("username contains invalid characters")]
    UsernameInvalidChars,
}

/// Validate a username.
///
/// # Examples
///
/// ```
/// use filekeep::auth::validation::validate_username;
///
/// assert!(validate_username("alice").is_ok());
/// assert!(validate_username("").is_err());
/// assert!(validate_username(" alice").is_err());
/// ```
pub fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username.is_empty() {
        return Err(ValidationError::UsernameEmpty);
    }
    if username.chars().count() > MAX_USERNAME_LENGTH {
        return Err(ValidationError::UsernameTooLong);
    }
    if username.trim() != username {
        return Err(ValidationError::UsernameUntrimmed);
    }
    if username.chars().any(char::is_control) {
        return Err(ValidationError::UsernameInvalidChars);
    }
    Ok(())
}
