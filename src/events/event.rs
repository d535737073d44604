use chrono::{DateTime, Utc};

use crate::session::SessionInvalidKind;

/// Events emitted by the guard, the session provider and the actions.
///
/// Dispatch is a no-op until listeners are registered with
/// [`register_event_listeners`](crate::register_event_listeners).
#[derive(Debug, Clone)]
pub enum GuardEvent {
    // navigation
    NavigationAllowed {
        path: String,
        at: DateTime<Utc>,
    },
    RedirectedToLogin {
        from: String,
        to: String,
        remembered: bool,
        at: DateTime<Utc>,
    },
    RedirectRestored {
        to: String,
        at: DateTime<Utc>,
    },
    AuthenticatedBounced {
        from: String,
        to: String,
        at: DateTime<Utc>,
    },
    AccessDenied {
        path: String,
        user_id: String,
        roles: Vec<String>,
        to: String,
        at: DateTime<Utc>,
    },

    // session
    SessionInvalidated {
        kind: SessionInvalidKind,
        reason: String,
        at: DateTime<Utc>,
    },
    LoginSucceeded {
        user_id: String,
        email: String,
        at: DateTime<Utc>,
    },
    LoginFailed {
        email: String,
        reason: String,
        at: DateTime<Utc>,
    },
    LoggedOut {
        user_id: Option<String>,
        at: DateTime<Utc>,
    },
}

impl GuardEvent {
    /// Dot-separated event name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::NavigationAllowed { .. } => "guard.navigation.allowed",
            Self::RedirectedToLogin { .. } => "guard.redirect.login",
            Self::RedirectRestored { .. } => "guard.redirect.restored",
            Self::AuthenticatedBounced { .. } => "guard.redirect.authenticated",
            Self::AccessDenied { .. } => "guard.access.denied",
            Self::SessionInvalidated { .. } => "session.invalidated",
            Self::LoginSucceeded { .. } => "session.login.success",
            Self::LoginFailed { .. } => "session.login.failed",
            Self::LoggedOut { .. } => "session.logout",
        }
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::NavigationAllowed { at, .. }
            | Self::RedirectedToLogin { at, .. }
            | Self::RedirectRestored { at, .. }
            | Self::AuthenticatedBounced { at, .. }
            | Self::AccessDenied { at, .. }
            | Self::SessionInvalidated { at, .. }
            | Self::LoginSucceeded { at, .. }
            | Self::LoginFailed { at, .. }
            | Self::LoggedOut { at, .. } => *at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        let now = Utc::now();

        assert_eq!(
            GuardEvent::NavigationAllowed {
                path: "/".to_owned(),
                at: now
            }
            .name(),
            "guard.navigation.allowed"
        );
        assert_eq!(
            GuardEvent::RedirectedToLogin {
                from: "/dashboard".to_owned(),
                to: "/auth/login".to_owned(),
                remembered: true,
                at: now
            }
            .name(),
            "guard.redirect.login"
        );
        assert_eq!(
            GuardEvent::AccessDenied {
                path: "/admin".to_owned(),
                user_id: "1".to_owned(),
                roles: vec!["viewer".to_owned()],
                to: "/".to_owned(),
                at: now
            }
            .name(),
            "guard.access.denied"
        );
        assert_eq!(
            GuardEvent::SessionInvalidated {
                kind: SessionInvalidKind::Unavailable,
                reason: "timeout".to_owned(),
                at: now
            }
            .name(),
            "session.invalidated"
        );
        assert_eq!(
            GuardEvent::LoggedOut {
                user_id: None,
                at: now
            }
            .name(),
            "session.logout"
        );
    }

    #[test]
    fn test_event_timestamp() {
        let now = Utc::now();
        let event = GuardEvent::RedirectRestored {
            to: "/dashboard".to_owned(),
            at: now,
        };
        assert_eq!(event.timestamp(), now);
    }

    #[test]
    fn test_event_debug() {
        let event = GuardEvent::LoginFailed {
            email: "a@example.com".to_owned(),
            reason: "invalid credentials".to_owned(),
            at: Utc::now(),
        };
        let debug_str = format!("{event:?}");
        assert!(debug_str.contains("LoginFailed"));
        assert!(debug_str.contains("invalid credentials"));
    }
}
