//! Session state for the current user agent.
//!
//! [`SessionState`] holds the authenticated flag and the user record.
//! Only [`SessionProvider`] writes it; everything else reads snapshots.
//!
//! Overlapping re-validations are not ordered against each other: whichever
//! finishes last decides the state, including runs belonging to a navigation
//! that has since been superseded.

mod backend;
#[cfg(any(test, feature = "mocks"))]
mod mock;
mod provider;

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};

pub use backend::{BackendClient, Credentials};
#[cfg(any(test, feature = "mocks"))]
pub use mock::MockBackendClient;
pub use provider::SessionProvider;

use crate::user::UserRecord;

/// Point-in-time copy of the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub authenticated: bool,
    pub user: Option<UserRecord>,
}

/// Shared handle to the session of one user agent.
///
/// Cloning shares the same underlying state.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    inner: Arc<RwLock<SessionSnapshot>>,
}

impl SessionState {
    /// Starts out anonymous.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.inner
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .authenticated
    }

    pub fn user(&self) -> Option<UserRecord> {
        self.snapshot().user
    }

    /// Sets both fields under one write lock.
    pub(crate) fn replace(&self, user: Option<UserRecord>) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        guard.authenticated = user.is_some();
        guard.user = user;
    }
}

/// Why a session check came back negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionInvalidKind {
    /// The backend answered: no valid credential.
    Rejected,
    /// The check itself failed: transport error, bad payload or timeout.
    Unavailable,
}

/// Re-validation failed. Callers treat this as "not authenticated".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInvalid {
    pub kind: SessionInvalidKind,
    pub reason: String,
}

impl SessionInvalid {
    pub fn rejected(reason: impl Into<String>) -> Self {
        Self {
            kind: SessionInvalidKind::Rejected,
            reason: reason.into(),
        }
    }

    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            kind: SessionInvalidKind::Unavailable,
            reason: reason.into(),
        }
    }

    pub fn is_unavailable(&self) -> bool {
        self.kind == SessionInvalidKind::Unavailable
    }
}

impl fmt::Display for SessionInvalid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SessionInvalidKind::Rejected => write!(f, "Session rejected: {}", self.reason),
            SessionInvalidKind::Unavailable => {
                write!(f, "Session check unavailable: {}", self.reason)
            }
        }
    }
}

impl std::error::Error for SessionInvalid {}
