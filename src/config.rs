//! Configuration module for Filekeep.

use serde::Deserialize;
use std::path::Path;

use crate::{FilekeepError, Result};

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the SQLite database file.
    #[serde(default = "default_db_path")]
    pub path: String,
}

fn default_db_path() -> String {
    "data/filekeep.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_db_path(),
        }
    }
}

/// File namespace configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FilesConfig {
    /// Directory holding one blob per filename.
    #[serde(default = "default_storage_path")]
    pub storage_path: String,
    /// Directory multipart uploads are spooled to before the final move.
    #[serde(default = "default_upload_tmp_path")]
    pub upload_tmp_path: String,
    /// Maximum upload size in megabytes.
    #[serde(default = "default_max_upload_size")]
    pub max_upload_size_mb: u64,
    /// Only the owning user may read, rename, delete or download a file
    /// that has a metadata record.
    #[serde(default)]
    pub enforce_ownership: bool,
}

fn default_storage_path() -> String {
    "files".to_string()
}

fn default_upload_tmp_path() -> String {
    "uploads".to_string()
}

/// Largest accepted `files.max_upload_size_mb` (1 TiB).
pub const MAX_UPLOAD_SIZE_MB: u64 = 1024 * 1024;

/// Longest accepted `session.duration_secs` (one year).
pub const MAX_SESSION_DURATION_SECS: u64 = 365 * 24 * 60 * 60;

fn default_max_upload_size() -> u64 {
    10
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            storage_path: default_storage_path(),
            upload_tmp_path: default_upload_tmp_path(),
            max_upload_size_mb: default_max_upload_size(),
            enforce_ownership: false,
        }
    }
}

impl FilesConfig {
    /// Maximum upload size in bytes.
    pub fn max_upload_size_bytes(&self) -> u64 {
        self.max_upload_size_mb.saturating_mul(1024 * 1024)
    }
}

/// Session configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    /// Absolute session lifetime in seconds.
    #[serde(default = "default_session_duration")]
    pub duration_secs: u64,
    /// Name of the cookie carrying the session token.
    #[serde(default = "default_cookie_name")]
    pub cookie_name: String,
    /// Mark the session cookie `Secure` (HTTPS only).
    #[serde(default)]
    pub secure_cookie: bool,
}

fn default_session_duration() -> u64 {
    24 * 60 * 60
}

fn default_cookie_name() -> String {
    "filekeep_session".to_string()
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            duration_secs: default_session_duration(),
            cookie_name: default_cookie_name(),
            secure_cookie: false,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Optional log file; console only when unset.
    #[serde(default)]
    pub file: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    /// HTTP server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// File namespace configuration.
    #[serde(default)]
    pub files: FilesConfig,
    /// Session configuration.
    #[serde(default)]
    pub session: SessionConfig,
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(FilekeepError::Io)?;
        Self::parse(&content)
    }

    /// Load configuration from a TOML file and apply environment variable overrides.
    pub fn load_with_env<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut config = Self::load(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| FilekeepError::Config(format!("config parse error: {e}")))
    }

    /// Apply environment variable overrides to the configuration.
    ///
    /// Supported environment variables:
    /// - `FILEKEEP_DATABASE_PATH`: database file
    /// - `FILEKEEP_STORAGE_PATH`: file namespace directory
    pub fn apply_env_overrides(&mut self) {
        if let Ok(path) = std::env::var("FILEKEEP_DATABASE_PATH") {
            if !path.is_empty() {
                self.database.path = path;
            }
        }
        if let Ok(path) = std::env::var("FILEKEEP_STORAGE_PATH") {
            if !path.is_empty() {
                self.files.storage_path = path;
            }
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.files.storage_path.trim().is_empty() {
            return Err(FilekeepError::Config(
                "files.storage_path must not be empty".to_string(),
            ));
        }
        if self.files.upload_tmp_path.trim().is_empty() {
            return Err(FilekeepError::Config(
                "files.upload_tmp_path must not be empty".to_string(),
            ));
        }
        if self.files.max_upload_size_mb == 0 {
            return Err(FilekeepError::Config(
                "files.max_upload_size_mb must be greater than 0".to_string(),
            ));
        }
        if self.files.max_upload_size_mb > MAX_UPLOAD_SIZE_MB {
            return Err(FilekeepError::Config(format!(
                "files.max_upload_size_mb must be at most {MAX_UPLOAD_SIZE_MB}"
            )));
        }
        if self.session.duration_secs == 0 {
            return Err(FilekeepError::Config(
                "session.duration_secs must be greater than 0".to_string(),
            ));
        }
        if self.session.duration_secs > MAX_SESSION_DURATION_SECS {
            return Err(FilekeepError::Config(format!(
                "session.duration_secs must be at most {MAX_SESSION_DURATION_SECS}"
            )));
        }
        if self.session.cookie_name.is_empty() {
            return Err(FilekeepError::Config(
                "session.cookie_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
