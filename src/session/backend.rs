//! Contract with the content-management backend.

use std::fmt;

use async_trait::async_trait;

use crate::user::UserRecord;
use crate::GuardError;

/// Login form input.
#[derive(Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    /// One-time password when the account has 2FA enabled.
    pub otp: Option<String>,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            otp: None,
        }
    }

    #[must_use]
    pub fn with_otp(mut self, otp: impl Into<String>) -> Self {
        self.otp = Some(otp.into());
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"[REDACTED]")
            .field("otp", &self.otp.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Client for the backend's authentication endpoints.
///
/// Implementations own transport, retries and credential storage. The guard
/// only asks "who is signed in right now".
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// Fetches the current user, failing when no valid session exists.
    ///
    /// Return [`GuardError::InvalidCredentials`] or a rejected
    /// [`SessionInvalid`](super::SessionInvalid) when the backend says no;
    /// any other error is treated as the backend being unreachable.
    async fn revalidate_session(&self) -> Result<UserRecord, GuardError>;

    async fn authenticate(&self, credentials: &Credentials) -> Result<(), GuardError>;

    async fn end_session(&self) -> Result<(), GuardError>;
}
