//! Web server for Filekeep.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use crate::auth::Authenticator;
use crate::config::ServerConfig;
use crate::{FilekeepError, Result};

use super::handlers::AppState;
use super::router::create_router;

/// Interval between expired-session sweeps.
const SESSION_CLEANUP_INTERVAL_SECS: u64 = 3600;

/// HTTP server for the application.
pub struct WebServer {
    addr: SocketAddr,
    state: Arc<AppState>,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: &ServerConfig, state: AppState) -> Result<Self> {
        let addr: SocketAddr = format!("{}:{}", config.host, config.port)
            .parse()
            .map_err(|e| {
                FilekeepError::Config(format!(
                    "invalid server address {}:{}: {e}",
                    config.host, config.port
                ))
            })?;

        Ok(Self {
            addr,
            state: Arc::new(state),
        })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Start the session cleanup background task.
    ///
    /// Runs every hour and drops expired sessions.
    fn start_session_cleanup_task(auth: Arc<dyn Authenticator>) {
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(Duration::from_secs(SESSION_CLEANUP_INTERVAL_SECS));

            // Skip the first immediate tick
            interval.tick().await;

            loop {
                interval.tick().await;

                match auth.purge_expired_sessions().await {
                    Ok(0) => tracing::debug!("No expired sessions to clean up"),
                    Ok(count) => {
                        tracing::info!(deleted_count = count, "Cleaned up expired sessions")
                    }
                    Err(e) => tracing::warn!(error = %e, "Failed to clean up sessions"),
                }
            }
        });
    }

    /// Run the web server until it fails.
    pub async fn run(self) -> Result<()> {
        let auth = self.state.auth.clone();
        let router = create_router(self.state);

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;

        // Start session cleanup only after a successful bind
        Self::start_session_cleanup_task(auth);
        tracing::info!("Session cleanup task started (runs every hour)");

        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router).await?;
        Ok(())
    }
}
