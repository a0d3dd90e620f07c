//! HTTP handlers and the state they share.

pub mod auth;
pub mod file;

pub use auth::*;
pub use file::*;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::auth::{Authenticator, LocalAuthenticator, SessionStore};
use crate::config::Config;
use crate::file::{FileManager, FileStorage};
use crate::{Database, Result};

/// How the session cookie is issued.
#[derive(Debug, Clone)]
pub struct SessionCookie {
    pub name: String,
    pub secure: bool,
}

impl SessionCookie {
    /// Cookie carrying a session token.
    pub fn issue(&self, token: &str) -> Cookie<'static> {
        Cookie::build((self.name.clone(), token.to_string()))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .secure(self.secure)
            .build()
    }

    /// Cookie that clears the session token on the client.
    pub fn removal(&self) -> Cookie<'static> {
        Cookie::build((self.name.clone(), "")).path("/").build()
    }

    /// Session token presented with the request, if any.
    pub fn token(&self, jar: &CookieJar) -> Option<String> {
        jar.get(&self.name)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub auth: Arc<dyn Authenticator>,
    pub files: FileManager,
    pub cookie: SessionCookie,
    /// Directory multipart uploads are spooled into.
    pub upload_tmp_path: PathBuf,
    /// Maximum request body size in bytes.
    pub max_upload_size: usize,
}

impl AppState {
    /// Build the state from configuration and an open database.
    ///
    /// Creates the namespace and upload spool directories if missing.
    pub async fn from_config(config: &Config, db: Database) -> Result<Self> {
        let storage = FileStorage::new(&config.files.storage_path).await?;
        tokio::fs::create_dir_all(&config.files.upload_tmp_path).await?;

        let sessions = Arc::new(SessionStore::new(Duration::from_secs(
            config.session.duration_secs,
        )));
        let auth: Arc<dyn Authenticator> = Arc::new(LocalAuthenticator::new(db.clone(), sessions));
        let files = FileManager::new(storage, db.clone(), config.files.enforce_ownership);

        Ok(Self {
            db,
            auth,
            files,
            cookie: SessionCookie {
                name: config.session.cookie_name.clone(),
                secure: config.session.secure_cookie,
            },
            upload_tmp_path: PathBuf::from(&config.files.upload_tmp_path),
            max_upload_size: usize::try_from(config.files.max_upload_size_bytes())
                .unwrap_or(usize::MAX),
        })
    }
}
