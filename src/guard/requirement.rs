use std::collections::HashSet;

use serde::Deserialize;

/// What a page demands of the visitor. Pages that declare nothing are
/// represented by `None` at the call site and follow
/// [`GuardConfig::global_guard_enabled`](crate::GuardConfig::global_guard_enabled).
///
/// Deserializes from `{"auth": "public"}`,
/// `{"auth": "require_authenticated", "allowed_roles": ["admin"]}` or
/// `{"auth": "unauthenticated_only", "navigate_authenticated_to": "/"}`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "auth", rename_all = "snake_case")]
pub enum RouteRequirement {
    Public,
    RequireAuthenticated(AuthRequirement),
    /// Entry pages such as login and registration.
    UnauthenticatedOnly {
        #[serde(default)]
        navigate_authenticated_to: Option<String>,
    },
}

impl RouteRequirement {
    pub fn public() -> Self {
        Self::Public
    }

    pub fn authenticated() -> Self {
        Self::RequireAuthenticated(AuthRequirement::default())
    }

    pub fn guest_only() -> Self {
        Self::UnauthenticatedOnly {
            navigate_authenticated_to: None,
        }
    }

    /// Guest-only page that sends signed-in users to `path`.
    pub fn guest_only_redirect_to(path: impl Into<String>) -> Self {
        Self::UnauthenticatedOnly {
            navigate_authenticated_to: Some(path.into()),
        }
    }
}

impl From<AuthRequirement> for RouteRequirement {
    fn from(requirement: AuthRequirement) -> Self {
        Self::RequireAuthenticated(requirement)
    }
}

/// Options of a page that requires a signed-in user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AuthRequirement {
    /// Where anonymous visitors go instead of the login page.
    pub navigate_unauthenticated_to: Option<String>,
    /// At least one of these roles is required. Takes precedence over
    /// `denied_roles`.
    pub allowed_roles: Option<HashSet<String>>,
    /// None of these roles may be held. Only consulted without an allow-list.
    pub denied_roles: Option<HashSet<String>>,
    /// Where users failing the role check go. Default `/`.
    pub unauthorized_redirect: Option<String>,
}

impl AuthRequirement {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn redirect_unauthenticated_to(mut self, path: impl Into<String>) -> Self {
        self.navigate_unauthenticated_to = Some(path.into());
        self
    }

    #[must_use]
    pub fn allow_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn deny_roles<I, S>(mut self, roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.denied_roles = Some(roles.into_iter().map(Into::into).collect());
        self
    }

    #[must_use]
    pub fn unauthorized_redirect(mut self, path: impl Into<String>) -> Self {
        self.unauthorized_redirect = Some(path.into());
        self
    }

    pub fn declares_roles(&self) -> bool {
        self.allowed_roles.is_some() || self.denied_roles.is_some()
    }

    /// Applies the allow-list, or the deny-list when there is no
    /// (non-empty) allow-list, to `roles`.
    pub fn permits(&self, roles: &[String]) -> bool {
        if let Some(allowed) = self.allowed_roles.as_ref().filter(|set| !set.is_empty()) {
            return roles.iter().any(|role| allowed.contains(role));
        }
        if let Some(denied) = self.denied_roles.as_ref().filter(|set| !set.is_empty()) {
            return !roles.iter().any(|role| denied.contains(role));
        }
        true
    }
}
