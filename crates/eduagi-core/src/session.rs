//! Process-wide session context
//!
//! Created empty at startup, filled on login, emptied on logout. Every view and
//! the API client receive a clone explicitly; there is no global instance.

use crate::types::CurrentUser;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, info};

/// An authenticated session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Signed-in user
    pub user: CurrentUser,
    /// Bearer token sent with every API request
    pub token: String,
}

/// Shared handle to the current session
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    inner: Arc<RwLock<Option<Session>>>,
}

impl SessionContext {
    /// Create an empty (logged out) context
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a session, replacing any previous one
    pub fn login(&self, user: CurrentUser, token: impl Into<String>) {
        info!(
            account_id = %user.account_id,
            role = %user.role,
            "session started"
        );
        *self.inner.write() = Some(Session {
            user,
            token: token.into(),
        });
    }

    /// End the session; a no-op when already logged out
    pub fn logout(&self) {
        let previous = self.inner.write().take();
        if let Some(previous) = previous {
            info!(account_id = %previous.user.account_id, "session ended");
        } else {
            debug!("logout requested without an active session");
        }
    }

    /// Replace the user profile, keeping the token
    ///
    /// Returns `false` when there is no session to update.
    pub fn update_user(&self, user: CurrentUser) -> bool {
        self.inner
            .write()
            .as_mut()
            .map(|session| session.user = user)
            .is_some()
    }

    /// Whether a session is active
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.read().is_some()
    }

    /// Snapshot of the signed-in user
    #[must_use]
    pub fn current_user(&self) -> Option<CurrentUser> {
        self.inner.read().as_ref().map(|s| s.user.clone())
    }

    /// Snapshot of the bearer token
    #[must_use]
    pub fn token(&self) -> Option<String> {
        self.inner.read().as_ref().map(|s| s.token.clone())
    }

    /// Snapshot of the whole session
    #[must_use]
    pub fn snapshot(&self) -> Option<Session> {
        self.inner.read().clone()
    }
}
