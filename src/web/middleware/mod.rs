//! Middleware for the web layer.

pub mod auth;

pub use auth::{authorize, require_session, AuthUser};
