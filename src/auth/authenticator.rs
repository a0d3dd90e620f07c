//! Authentication strategy.
//!
//! `Authenticator` is the capability handlers depend on. `LocalAuthenticator`
//! checks a username and password against the credential store and keeps
//! sessions in a [`SessionStore`]. Other strategies implement the same trait.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{info, warn};

use super::registration::{register, RegistrationRequest};
use super::session::{Session, SessionStore};
use super::verify_password;
use crate::db::{Database, User, UserRepository};
use crate::{FilekeepError, Result};

/// Verifies credentials and maps session tokens back to users.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Create a user. Fails with `DuplicateUser` if the username is taken.
    async fn register(&self, username: &str, password: &str) -> Result<User>;

    /// Verify credentials and open a session.
    ///
    /// Fails with `InvalidCredentials` for an unknown user or a wrong password.
    async fn login(&self, username: &str, password: &str) -> Result<Session>;

    /// Resolve a session token to its user, or fail with `NoSession`.
    async fn resolve_session(&self, token: &str) -> Result<User>;

    /// Destroy a session. Unknown tokens are ignored.
    async fn logout(&self, token: &str) -> Result<()>;

    /// Drop expired sessions, returning how many were removed.
    async fn purge_expired_sessions(&self) -> Result<usize>;
}

/// Username/password authentication backed by the users table.
pub struct LocalAuthenticator {
    db: Database,
    sessions: Arc<SessionStore>,
}

impl LocalAuthenticator {
    /// Create an authenticator over the given database and session store.
    pub fn new(db: Database, sessions: Arc<SessionStore>) -> Self {
        Self { db, sessions }
    }

    /// The underlying session store.
    pub fn sessions(&self) -> &Arc<SessionStore> {
        &self.sessions
    }
}

#[async_trait]
impl Authenticator for LocalAuthenticator {
    async fn register(&self, username: &str, password: &str) -> Result<User> {
        let repo = UserRepository::new(self.db.pool());
        register(&repo, RegistrationRequest::new(username, password)).await
    }

    async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let repo = UserRepository::new(self.db.pool());

        let Some(user) = repo.get_by_username(username).await? else {
            warn!(username = %username, "Login failed: unknown user");
            return Err(FilekeepError::InvalidCredentials);
        };

        if verify_password(password, &user.password).is_err() {
            warn!(username = %username, "Login failed: wrong password");
            return Err(FilekeepError::InvalidCredentials);
        }

        let session = self.sessions.create(user.id).await;
        info!(username = %user.username, user_id = user.id, "User logged in");

        Ok(session)
    }

    async fn resolve_session(&self, token: &str) -> Result<User> {
        let session = self
            .sessions
            .get(token)
            .await
            .ok_or(FilekeepError::NoSession)?;

        let repo = UserRepository::new(self.db.pool());
        match repo.get_by_id(session.user_id).await? {
            Some(user) => Ok(user),
            None => {
                self.sessions.remove(token).await;
                Err(FilekeepError::NoSession)
            }
        }
    }

    async fn logout(&self, token: &str) -> Result<()> {
        if self.sessions.remove(token).await {
            info!("User logged out");
        }
        Ok(())
    }

    async fn purge_expired_sessions(&self) -> Result<usize> {
        Ok(self.sessions.purge_expired().await)
    }
}
