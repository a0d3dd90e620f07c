//! Filekeep - authenticated file management over HTTP
//!
//! Users register, log in, and then upload, list, view, rename, delete,
//! create and download files in a single managed directory.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod file;
pub mod logging;
pub mod web;

pub use auth::{
    hash_password, register, validate_password, verify_password, Authenticator,
    LocalAuthenticator, PasswordError, RegistrationRequest, Session, SessionStore,
    ValidationError,
};
pub use config::Config;
pub use db::{Database, NewUser, User, UserRepository};
pub use error::{FilekeepError, Result};
pub use file::{FileKind, FileManager, FileRecord, FileRepository, FileStorage};
pub use web::{create_router, AppState, WebServer};
