//! Navigation guard, session state and role-based access control for web apps
//! backed by an external content-management backend.
//!
//! On every navigation the [`Guard`] re-validates the session against the
//! backend, reads the destination's [`RouteRequirement`], resolves the user's
//! roles when the route restricts them, and remembers where an anonymous user
//! was heading so they land there after logging in.
//!
//! ```rust,ignore
//! use waypost::{Guard, GuardConfig, Navigation, RedirectMemory, RouteRequirement, SessionProvider};
//!
//! let guard = Guard::new(GuardConfig::default());
//! let outcome = guard
//!     .check(&session, &memory, &Navigation::new("/dashboard", "/"), Some(&RouteRequirement::authenticated()))
//!     .await;
//! ```

pub mod actions;
pub mod config;
pub mod events;
pub mod guard;
pub mod redirect;
pub mod roles;
pub mod session;

mod secret;
mod user;

#[cfg(feature = "axum_support")]
pub mod api;

pub use actions::{LoginAction, LogoutAction};
pub use config::{CookieConfig, GuardConfig, PermissionsConfig, SameSite};
pub use events::{GuardEvent, Listener, dispatch, register_event_listeners};
pub use guard::{
    AuthRequirement, Guard, GuardOutcome, Navigation, RedirectReason, RouteRequirement, RouteTable,
};
pub use redirect::{CookieRedirectStore, InMemoryRedirectStore, RedirectMemory, RedirectStore};
pub use roles::{RoleResolver, RoleSet, RoleTransform, RoleValue, TransformFault};
pub use secret::SecretKey;
pub use session::{
    BackendClient, Credentials, SessionInvalid, SessionInvalidKind,
    SessionProvider, SessionSnapshot, SessionState,
};
pub use user::UserRecord;

#[cfg(any(test, feature = "mocks"))]
pub use session::MockBackendClient;

use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum GuardError {
    SessionInvalid(SessionInvalid),
    InvalidCredentials,
    Unavailable(String),
    MalformedResponse(String),
    Timeout,
    StoreError(String),
    ConfigurationError(String),
    TransformFault(String),
}

impl std::error::Error for GuardError {}

impl fmt::Display for GuardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GuardError::SessionInvalid(invalid) => write!(f, "{invalid}"),
            GuardError::InvalidCredentials => write!(f, "Invalid email or password"),
            GuardError::Unavailable(msg) => write!(f, "Backend unavailable: {msg}"),
            GuardError::MalformedResponse(msg) => write!(f, "Malformed backend response: {msg}"),
            GuardError::Timeout => write!(f, "Backend call timed out"),
            GuardError::StoreError(msg) => write!(f, "Redirect store error: {msg}"),
            GuardError::ConfigurationError(msg) => write!(f, "Configuration error: {msg}"),
            GuardError::TransformFault(msg) => write!(f, "Role transform failed: {msg}"),
        }
    }
}

impl From<SessionInvalid> for GuardError {
    fn from(invalid: SessionInvalid) -> Self {
        Self::SessionInvalid(invalid)
    }
}

impl From<TransformFault> for GuardError {
    fn from(fault: TransformFault) -> Self {
        Self::TransformFault(fault.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(GuardError::Timeout.to_string(), "Backend call timed out");
        assert_eq!(
            GuardError::StoreError("Lock poisoned".to_owned()).to_string(),
            "Redirect store error: Lock poisoned"
        );
    }

    #[test]
    fn test_session_invalid_converts() {
        let err: GuardError = SessionInvalid::rejected("token expired").into();
        assert!(matches!(err, GuardError::SessionInvalid(_)));
    }
}
