//! Authentication module for Filekeep.
//!
//! This module provides password hashing, user registration, server-side
//! sessions and the `Authenticator` strategy used by the web layer.

mod authenticator;
mod password;
mod registration;
mod session;
pub mod validation;

pub use authenticator::{Authenticator, LocalAuthenticator};
pub use password::{hash_password, validate_password, verify_password, PasswordError};
pub use registration::{register, RegistrationRequest};
pub use session::{Session, SessionStore, DEFAULT_SESSION_DURATION_SECS};
pub use validation::ValidationError;
