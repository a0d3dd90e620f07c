//! Server-side session storage.
//!
//! Sessions live in process memory, keyed by an opaque UUID v4 token that
//! the client holds in a cookie.

use std::collections::HashMap;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Default session duration (24 hours).
pub const DEFAULT_SESSION_DURATION_SECS: u64 = 24 * 60 * 60;

/// A logged-in user's session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Opaque session token (UUID v4).
    pub token: String,
    /// User the session is bound to.
    pub user_id: i64,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// Absolute expiry.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Create a new session for a user with the given lifetime.
    pub fn new(user_id: i64, duration: Duration) -> Self {
        let now = Utc::now();
        // Lifetimes past chrono's range never expire rather than expiring at once.
        let expires_at = chrono::Duration::from_std(duration)
            .ok()
            .and_then(|d| now.checked_add_signed(d))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);

        Self {
            token: Uuid::new_v4().to_string(),
            user_id,
            created_at: now,
            expires_at,
        }
    }

    /// Check if the session has expired.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

/// Process-wide session store.
#[derive(Debug)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    duration: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_SESSION_DURATION_SECS))
    }
}

impl SessionStore {
    /// Create a store whose sessions last `duration`.
    pub fn new(duration: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            duration,
        }
    }

    /// Lifetime given to new sessions.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Create and store a session for a user.
    pub async fn create(&self, user_id: i64) -> Session {
        let session = Session::new(user_id, self.duration);
        self.sessions
            .write()
            .await
            .insert(session.token.clone(), session.clone());

        debug!(user_id, "Session created");
        session
    }

    /// Look up a live session. Expired sessions are dropped on sight.
    pub async fn get(&self, token: &str) -> Option<Session> {
        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                None => return None,
                Some(session) if !session.is_expired() => return Some(session.clone()),
                Some(_) => {}
            }
        }

        self.sessions.write().await.remove(token);
        debug!("Expired session removed");
        None
    }

    /// Remove a session. Returns `true` if it existed.
    pub async fn remove(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    /// Remove every expired session, returning how many were dropped.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired_at(now));
        before - sessions.len()
    }

    /// Number of stored sessions, expired ones included.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Whether the store holds no sessions.
    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}
