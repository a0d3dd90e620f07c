//! Web module for Filekeep.
//!
//! This module provides the HTTP interface: login and registration forms,
//! the session guard, and the file routes.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::{AppState, SessionCookie};
pub use router::create_router;
pub use server::WebServer;
