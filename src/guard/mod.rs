//! The navigation guard.
//!
//! [`Guard::check`] runs once per navigation and decides between letting it
//! through and redirecting it. The order of checks:
//!
//! 1. Login and registration pages pass untouched, unless they declare
//!    themselves [`RouteRequirement::UnauthenticatedOnly`].
//! 2. Pages that need no authentication pass.
//! 3. The session is re-validated with the backend, every time.
//! 4. Anonymous visitors of protected pages are sent to log in and their
//!    destination is remembered. A backend that cannot be reached counts as
//!    anonymous and always sends the visitor to the login page.
//! 5. Signed-in visitors of guest-only pages are sent on, to the remembered
//!    destination when they just came from logging in.
//! 6. Signed-in visitors arriving from the login page are sent to the
//!    remembered destination.
//! 7. Role restrictions are applied when permissions are enabled.
//!
//! Runs are not serialized against each other. A run for a navigation that
//! has since been superseded still writes the session and the redirect slot
//! when its backend call finishes.

mod requirement;
mod routes;

use std::sync::Arc;

use chrono::Utc;

pub use requirement::{AuthRequirement, RouteRequirement};
pub use routes::RouteTable;

use crate::config::GuardConfig;
use crate::events::{GuardEvent, dispatch};
use crate::redirect::{RedirectMemory, RedirectStore, is_local_path};
use crate::roles;
use crate::session::{BackendClient, SessionProvider, SessionState};
use crate::user::UserRecord;

/// One navigation attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    /// Destination, possibly with query string.
    pub target: String,
    /// Page the user is leaving. Same as `target` on a fresh page load.
    pub previous: String,
    /// Whether `target` may be remembered for after login. False for
    /// requests that cannot be replayed as a plain page load.
    pub rememberable: bool,
}

impl Navigation {
    pub fn new(target: impl Into<String>, previous: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            previous: previous.into(),
            rememberable: true,
        }
    }

    /// A full page load with no previous page.
    pub fn initial(target: impl Into<String>) -> Self {
        let target = target.into();
        Self::new(target.clone(), target)
    }

    /// Keeps the target out of redirect memory.
    #[must_use]
    pub fn not_rememberable(mut self) -> Self {
        self.rememberable = false;
        self
    }

    /// `target` without query string or fragment.
    pub fn target_path(&self) -> &str {
        routes::strip_query(&self.target)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RedirectReason {
    /// Anonymous visitor of a protected page.
    Login,
    /// Back to the page remembered before logging in.
    Intended,
    /// Signed-in visitor of a guest-only page.
    AlreadyAuthenticated,
    /// Role check failed.
    Unauthorized,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome {
    Allow,
    Redirect { to: String, reason: RedirectReason },
}

impl GuardOutcome {
    pub fn is_allow(&self) -> bool {
        matches!(self, Self::Allow)
    }

    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Self::Allow => None,
            Self::Redirect { to, .. } => Some(to),
        }
    }

    fn redirect(to: impl Into<String>, reason: RedirectReason) -> Self {
        Self::Redirect {
            to: to.into(),
            reason,
        }
    }
}

/// Decides each navigation against the shared [`GuardConfig`].
#[derive(Debug, Clone)]
pub struct Guard {
    config: Arc<GuardConfig>,
}

impl Guard {
    pub fn new(config: GuardConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    pub fn from_shared(config: Arc<GuardConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// A provider bounded by the configured re-validation timeout.
    pub fn session_provider(
        &self,
        client: Arc<dyn BackendClient>,
        state: SessionState,
    ) -> SessionProvider {
        SessionProvider::new(client, state).with_timeout(self.config.revalidate_timeout)
    }

    /// A redirect slot using the configured TTL.
    pub fn redirect_memory(&self, store: Arc<dyn RedirectStore>, key: &str) -> RedirectMemory {
        RedirectMemory::new(store, key).with_ttl(self.config.redirect_ttl)
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "guard_check", skip_all, fields(path = %navigation.target))
    )]
    pub async fn check(
        &self,
        session: &SessionProvider,
        memory: &RedirectMemory,
        navigation: &Navigation,
        requirement: Option<&RouteRequirement>,
    ) -> GuardOutcome {
        let config = &*self.config;
        let guest_only = matches!(requirement, Some(RouteRequirement::UnauthenticatedOnly { .. }));

        if config.is_entry_path(navigation.target_path()) && !guest_only {
            return self.allow(navigation).await;
        }

        let requires_auth = match requirement {
            Some(RouteRequirement::Public) => false,
            Some(_) => true,
            None => config.global_guard_enabled,
        };
        if !requires_auth {
            return self.allow(navigation).await;
        }

        let user = match session.revalidate().await {
            Ok(user) => user,
            Err(invalid) if invalid.is_unavailable() && !guest_only => {
                return self
                    .send_to_login(memory, navigation, config.login_path.clone())
                    .await;
            }
            Err(_) => {
                if guest_only {
                    return self.allow(navigation).await;
                }
                let to = match requirement {
                    Some(RouteRequirement::RequireAuthenticated(auth)) => auth
                        .navigate_unauthenticated_to
                        .clone()
                        .unwrap_or_else(|| config.login_path.clone()),
                    _ => config.login_path.clone(),
                };
                return self.send_to_login(memory, navigation, to).await;
            }
        };

        let came_from_entry = config.is_entry_path(&navigation.previous);

        if let Some(RouteRequirement::UnauthenticatedOnly {
            navigate_authenticated_to,
        }) = requirement
        {
            let fallback = navigate_authenticated_to
                .clone()
                .unwrap_or_else(|| config.after_login_path.clone());
            if came_from_entry && memory.recall().await.is_some() {
                if let Some(intended) = memory.consume().await {
                    return self.restore(intended).await;
                }
            }
            log::debug!(
                target: "waypost::guard",
                "msg=\"authenticated user on guest-only page\" from=\"{}\" to=\"{fallback}\"",
                navigation.target
            );
            dispatch(GuardEvent::AuthenticatedBounced {
                from: navigation.target.clone(),
                to: fallback.clone(),
                at: Utc::now(),
            })
            .await;
            return GuardOutcome::redirect(fallback, RedirectReason::AlreadyAuthenticated);
        }

        if came_from_entry {
            if let Some(intended) = memory.consume().await {
                if intended != navigation.target {
                    return self.restore(intended).await;
                }
            }
        }

        if let Some(RouteRequirement::RequireAuthenticated(auth)) = requirement {
            if auth.declares_roles() {
                if config.permissions.enabled {
                    if let Some(outcome) = self.check_roles(auth, &user, navigation).await {
                        return outcome;
                    }
                } else {
                    log::debug!(
                        target: "waypost::guard",
                        "msg=\"role restrictions skipped, permissions disabled\" path=\"{}\"",
                        navigation.target
                    );
                }
            }
        }

        self.allow(navigation).await
    }

    async fn check_roles(
        &self,
        auth: &AuthRequirement,
        user: &UserRecord,
        navigation: &Navigation,
    ) -> Option<GuardOutcome> {
        let roles = roles::resolve(user, &self.config.permissions);
        if auth.permits(&roles) {
            return None;
        }

        let to = auth
            .unauthorized_redirect
            .clone()
            .unwrap_or_else(|| "/".to_owned());
        log::info!(
            target: "waypost::guard",
            "msg=\"access denied\" path=\"{}\" user_id=\"{}\" roles=\"{}\"",
            navigation.target,
            user.id,
            roles.join(",")
        );
        dispatch(GuardEvent::AccessDenied {
            path: navigation.target.clone(),
            user_id: user.id.clone(),
            roles,
            to: to.clone(),
            at: Utc::now(),
        })
        .await;
        Some(GuardOutcome::redirect(to, RedirectReason::Unauthorized))
    }

    async fn send_to_login(
        &self,
        memory: &RedirectMemory,
        navigation: &Navigation,
        to: String,
    ) -> GuardOutcome {
        let remembered = navigation.rememberable
            && !self.config.is_entry_path(navigation.target_path())
            && is_local_path(&navigation.target);
        if remembered {
            memory.remember(&navigation.target).await;
        }
        log::debug!(
            target: "waypost::guard",
            "msg=\"redirecting to login\" from=\"{}\" to=\"{to}\" remembered={remembered}",
            navigation.target
        );
        dispatch(GuardEvent::RedirectedToLogin {
            from: navigation.target.clone(),
            to: to.clone(),
            remembered,
            at: Utc::now(),
        })
        .await;
        GuardOutcome::redirect(to, RedirectReason::Login)
    }

    async fn restore(&self, intended: String) -> GuardOutcome {
        log::debug!(
            target: "waypost::guard",
            "msg=\"restoring intended destination\" to=\"{intended}\""
        );
        dispatch(GuardEvent::RedirectRestored {
            to: intended.clone(),
            at: Utc::now(),
        })
        .await;
        GuardOutcome::redirect(intended, RedirectReason::Intended)
    }

    async fn allow(&self, navigation: &Navigation) -> GuardOutcome {
        dispatch(GuardEvent::NavigationAllowed {
            path: navigation.target.clone(),
            at: Utc::now(),
        })
        .await;
        GuardOutcome::Allow
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::config::PermissionsConfig;
    use crate::redirect::InMemoryRedirectStore;
    use crate::roles::{RoleTransform, RoleValue, TransformFault};
    use crate::session::MockBackendClient;
    use crate::GuardError;

    struct Harness {
        guard: Guard,
        client: MockBackendClient,
        session: SessionProvider,
        memory: RedirectMemory,
    }

    impl Harness {
        fn new(config: GuardConfig) -> Self {
            let guard = Guard::new(config);
            let client = MockBackendClient::new();
            let session = guard.session_provider(Arc::new(client.clone()), SessionState::new());
            let memory = guard.redirect_memory(Arc::new(InMemoryRedirectStore::new()), "client");
            Self {
                guard,
                client,
                session,
                memory,
            }
        }

        fn with_user(self, user: UserRecord) -> Self {
            self.client.sign_in(user);
            self
        }

        async fn go(
            &self,
            target: &str,
            previous: &str,
            requirement: Option<&RouteRequirement>,
        ) -> GuardOutcome {
            self.guard
                .check(
                    &self.session,
                    &self.memory,
                    &Navigation::new(target, previous),
                    requirement,
                )
                .await
        }
    }

    fn role_transform<F>(f: F) -> RoleTransform
    where
        F: Fn(&serde_json::Value, &UserRecord) -> Result<RoleValue, TransformFault> + Send + Sync + 'static,
    {
        Arc::new(f)
    }

    fn rbac() -> GuardConfig {
        GuardConfig {
            permissions: PermissionsConfig {
                enabled: true,
                field: "role".to_owned(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn user_with_role(role: &str) -> UserRecord {
        UserRecord::new("u1", "u1@example.com").with_field("role", role)
    }

    fn redirect(to: &str, reason: RedirectReason) -> GuardOutcome {
        GuardOutcome::redirect(to, reason)
    }

    #[tokio::test]
    async fn test_public_always_allowed() {
        let public = RouteRequirement::public();

        let anonymous = Harness::new(GuardConfig::default());
        assert!(anonymous.go("/", "/", Some(&public)).await.is_allow());

        let signed_in =
            Harness::new(GuardConfig::default()).with_user(UserRecord::new("1", "a@example.com"));
        assert!(signed_in.go("/", "/", Some(&public)).await.is_allow());
        assert_eq!(signed_in.client.revalidate_calls(), 0);
    }

    #[tokio::test]
    async fn test_entry_paths_skip_session_check() {
        let h = Harness::new(GuardConfig::default());
        assert!(h.go("/auth/login", "/", None).await.is_allow());
        assert!(h.go("/auth/register?invite=1", "/", None).await.is_allow());
        assert_eq!(h.client.revalidate_calls(), 0);
    }

    #[tokio::test]
    async fn test_undeclared_page_follows_global_flag() {
        let h = Harness::new(GuardConfig::default());
        assert_eq!(
            h.go("/dashboard", "/", None).await,
            redirect("/auth/login", RedirectReason::Login)
        );

        let h = Harness::new(GuardConfig {
            global_guard_enabled: false,
            ..Default::default()
        });
        assert!(h.go("/dashboard", "/", None).await.is_allow());
        assert_eq!(h.client.revalidate_calls(), 0);
    }

    #[tokio::test]
    async fn test_anonymous_redirect_remembers_target() {
        let h = Harness::new(GuardConfig::default());
        let outcome = h
            .go("/reports?year=2024", "/", Some(&RouteRequirement::authenticated()))
            .await;

        assert_eq!(outcome, redirect("/auth/login", RedirectReason::Login));
        assert_eq!(h.memory.recall().await.as_deref(), Some("/reports?year=2024"));
    }

    #[tokio::test]
    async fn test_custom_unauthenticated_target() {
        let h = Harness::new(GuardConfig::default());
        let requirement: RouteRequirement =
            AuthRequirement::new().redirect_unauthenticated_to("/welcome").into();

        assert_eq!(
            h.go("/billing", "/", Some(&requirement)).await,
            redirect("/welcome", RedirectReason::Login)
        );
        assert_eq!(h.memory.recall().await.as_deref(), Some("/billing"));
    }

    #[tokio::test]
    async fn test_round_trip_restores_destination() {
        let h = Harness::new(GuardConfig::default());

        assert_eq!(
            h.go("/dashboard", "/", None).await,
            redirect("/auth/login", RedirectReason::Login)
        );
        assert_eq!(h.memory.recall().await.as_deref(), Some("/dashboard"));

        h.client.sign_in(UserRecord::new("1", "a@example.com"));

        assert_eq!(
            h.go("/", "/auth/login", None).await,
            redirect("/dashboard", RedirectReason::Intended)
        );
        assert!(h.memory.recall().await.is_none());

        assert!(h.go("/dashboard", "/", None).await.is_allow());
    }

    #[tokio::test]
    async fn test_arriving_at_remembered_page_allows_and_clears() {
        let h = Harness::new(GuardConfig::default()).with_user(UserRecord::new("1", "a@example.com"));
        h.memory.remember("/dashboard").await;

        assert!(h.go("/dashboard", "/auth/login", None).await.is_allow());
        assert!(h.memory.recall().await.is_none());
    }

    #[tokio::test]
    async fn test_memory_untouched_when_not_from_entry_page() {
        let h = Harness::new(GuardConfig::default()).with_user(UserRecord::new("1", "a@example.com"));
        h.memory.remember("/dashboard").await;

        assert!(h.go("/settings", "/", None).await.is_allow());
        assert_eq!(h.memory.recall().await.as_deref(), Some("/dashboard"));
    }

    #[tokio::test]
    async fn test_guest_only_allows_anonymous() {
        let h = Harness::new(GuardConfig::default());
        assert!(h
            .go("/auth/login", "/", Some(&RouteRequirement::guest_only()))
            .await
            .is_allow());
        assert!(h
            .go("/welcome", "/", Some(&RouteRequirement::guest_only()))
            .await
            .is_allow());
        assert!(h.memory.recall().await.is_none());
    }

    #[tokio::test]
    async fn test_guest_only_bounces_authenticated_user() {
        let h = Harness::new(GuardConfig {
            after_login_path: "/home".to_owned(),
            ..Default::default()
        })
        .with_user(UserRecord::new("1", "a@example.com"));

        assert_eq!(
            h.go("/auth/login", "/", Some(&RouteRequirement::guest_only()))
                .await,
            redirect("/home", RedirectReason::AlreadyAuthenticated)
        );
        assert_eq!(
            h.go(
                "/auth/login",
                "/",
                Some(&RouteRequirement::guest_only_redirect_to("/profile"))
            )
            .await,
            redirect("/profile", RedirectReason::AlreadyAuthenticated)
        );
    }

    #[tokio::test]
    async fn test_guest_only_uses_memory_after_login() {
        let h = Harness::new(GuardConfig::default()).with_user(UserRecord::new("1", "a@example.com"));
        h.memory.remember("/dashboard").await;

        assert_eq!(
            h.go("/auth/register", "/auth/login", Some(&RouteRequirement::guest_only()))
                .await,
            redirect("/dashboard", RedirectReason::Intended)
        );
        assert!(h.memory.recall().await.is_none());
    }

    #[tokio::test]
    async fn test_guest_only_keeps_memory_without_login_transition() {
        let h = Harness::new(GuardConfig::default()).with_user(UserRecord::new("1", "a@example.com"));
        h.memory.remember("/dashboard").await;

        assert_eq!(
            h.go("/auth/login", "/about", Some(&RouteRequirement::guest_only()))
                .await,
            redirect("/", RedirectReason::AlreadyAuthenticated)
        );
        assert_eq!(h.memory.recall().await.as_deref(), Some("/dashboard"));
    }

    #[tokio::test]
    async fn test_backend_unavailable_sends_to_login() {
        let h = Harness::new(GuardConfig::default());
        h.client
            .fail_with(GuardError::Unavailable("connection reset".to_owned()));
        let requirement: RouteRequirement =
            AuthRequirement::new().redirect_unauthenticated_to("/welcome").into();

        assert_eq!(
            h.go("/billing", "/", Some(&requirement)).await,
            redirect("/auth/login", RedirectReason::Login)
        );
        assert_eq!(h.memory.recall().await.as_deref(), Some("/billing"));
        assert!(!h.session.state().is_authenticated());
    }

    #[tokio::test]
    async fn test_backend_unavailable_on_guest_page() {
        let h = Harness::new(GuardConfig::default());
        h.client.fail_with(GuardError::MalformedResponse("{".to_owned()));

        assert!(h
            .go("/auth/login", "/", Some(&RouteRequirement::guest_only()))
            .await
            .is_allow());
        assert!(h.memory.recall().await.is_none());
    }

    #[tokio::test]
    async fn test_expired_session_clears_state() {
        let h = Harness::new(GuardConfig::default()).with_user(UserRecord::new("1", "a@example.com"));
        assert!(h.go("/dashboard", "/", None).await.is_allow());
        assert!(h.session.state().is_authenticated());

        h.client.sign_out();
        assert_eq!(
            h.go("/dashboard", "/", None).await,
            redirect("/auth/login", RedirectReason::Login)
        );
        assert!(!h.session.state().is_authenticated());
    }

    #[tokio::test]
    async fn test_every_navigation_revalidates() {
        let h = Harness::new(GuardConfig::default()).with_user(UserRecord::new("1", "a@example.com"));
        h.go("/a", "/", None).await;
        h.go("/b", "/a", None).await;
        h.go("/c", "/b", None).await;
        assert_eq!(h.client.revalidate_calls(), 3);
    }

    #[tokio::test]
    async fn test_allow_list() {
        let requirement: RouteRequirement = AuthRequirement::new()
            .allow_roles(["admin", "editor"])
            .into();

        let h = Harness::new(rbac()).with_user(user_with_role("editor"));
        assert!(h.go("/posts", "/", Some(&requirement)).await.is_allow());

        let h = Harness::new(rbac()).with_user(user_with_role("viewer"));
        assert_eq!(
            h.go("/posts", "/", Some(&requirement)).await,
            redirect("/", RedirectReason::Unauthorized)
        );
    }

    #[tokio::test]
    async fn test_unauthorized_redirect_target() {
        let requirement: RouteRequirement = AuthRequirement::new()
            .allow_roles(["admin"])
            .unauthorized_redirect("/forbidden")
            .into();
        let h = Harness::new(rbac()).with_user(user_with_role("viewer"));

        assert_eq!(
            h.go("/admin", "/", Some(&requirement)).await,
            redirect("/forbidden", RedirectReason::Unauthorized)
        );
    }

    #[tokio::test]
    async fn test_deny_list() {
        let requirement: RouteRequirement = AuthRequirement::new().deny_roles(["suspended"]).into();

        let h = Harness::new(rbac()).with_user(user_with_role("editor"));
        assert!(h.go("/posts", "/", Some(&requirement)).await.is_allow());

        let h = Harness::new(rbac()).with_user(user_with_role("suspended"));
        assert_eq!(
            h.go("/posts", "/", Some(&requirement)).await,
            redirect("/", RedirectReason::Unauthorized)
        );
    }

    #[tokio::test]
    async fn test_allow_list_takes_precedence() {
        let requirement: RouteRequirement = AuthRequirement::new()
            .allow_roles(["admin"])
            .deny_roles(["admin"])
            .into();
        let h = Harness::new(rbac()).with_user(user_with_role("admin"));

        assert!(h.go("/admin", "/", Some(&requirement)).await.is_allow());
    }

    #[tokio::test]
    async fn test_roles_skipped_when_permissions_disabled() {
        let requirement: RouteRequirement = AuthRequirement::new().allow_roles(["admin"]).into();
        let h = Harness::new(GuardConfig::default()).with_user(user_with_role("viewer"));

        assert!(h.go("/admin", "/", Some(&requirement)).await.is_allow());
    }

    #[tokio::test]
    async fn test_roles_use_mapping_and_transform() {
        let transform = role_transform(|raw, _| {
            Ok(raw["id"].as_str().map(str::to_owned).into())
        });
        let config = GuardConfig {
            permissions: PermissionsConfig {
                enabled: true,
                field: "role".to_owned(),
                transform: Some(transform),
                mapping: Some([("r-42".to_owned(), "editor".to_owned())].into()),
            },
            ..Default::default()
        };
        let user = UserRecord::new("1", "a@example.com").with_field("role", json!({ "id": "r-42" }));
        let h = Harness::new(config).with_user(user);
        let requirement: RouteRequirement = AuthRequirement::new().allow_roles(["editor"]).into();

        assert!(h.go("/posts", "/", Some(&requirement)).await.is_allow());
    }

    #[tokio::test]
    async fn test_failing_transform_does_not_block() {
        let transform = role_transform(|_, _| {
            Err(TransformFault::new("unexpected shape"))
        });
        let config = GuardConfig {
            permissions: PermissionsConfig {
                enabled: true,
                field: "role".to_owned(),
                transform: Some(transform),
                mapping: None,
            },
            ..Default::default()
        };
        let h = Harness::new(config).with_user(user_with_role("editor"));
        let requirement: RouteRequirement = AuthRequirement::new().allow_roles(["editor"]).into();

        assert!(h.go("/posts", "/", Some(&requirement)).await.is_allow());
    }

    #[tokio::test]
    async fn test_restore_happens_before_role_check() {
        let requirement: RouteRequirement = AuthRequirement::new().allow_roles(["admin"]).into();
        let h = Harness::new(rbac()).with_user(user_with_role("viewer"));
        h.memory.remember("/inbox").await;

        assert_eq!(
            h.go("/admin", "/auth/login", Some(&requirement)).await,
            redirect("/inbox", RedirectReason::Intended)
        );
    }

    #[tokio::test]
    async fn test_non_local_target_not_remembered() {
        let h = Harness::new(GuardConfig::default());

        assert_eq!(
            h.go("//evil.example/x", "/", None).await,
            redirect("/auth/login", RedirectReason::Login)
        );
        assert!(h.memory.recall().await.is_none());
    }

    #[tokio::test]
    async fn test_unrememberable_navigation_redirects_without_memory() {
        let h = Harness::new(GuardConfig::default());
        let nav = Navigation::new("/comments", "/comments").not_rememberable();

        let outcome = h.guard.check(&h.session, &h.memory, &nav, None).await;
        assert_eq!(outcome, redirect("/auth/login", RedirectReason::Login));
        assert!(h.memory.recall().await.is_none());
    }

    #[tokio::test]
    async fn test_forged_memory_not_restored() {
        let store = Arc::new(InMemoryRedirectStore::new());
        store
            .set("client", "https://evil.example/phish", chrono::Duration::minutes(5))
            .await
            .unwrap();
        let h = Harness::new(GuardConfig::default()).with_user(UserRecord::new("1", "a@example.com"));
        let h = Harness {
            memory: h.guard.redirect_memory(store.clone(), "client"),
            ..h
        };

        assert_eq!(
            h.go("/auth/login", "/auth/login", Some(&RouteRequirement::guest_only()))
                .await,
            redirect("/", RedirectReason::AlreadyAuthenticated)
        );

        store
            .set("client", "//evil.example/x", chrono::Duration::minutes(5))
            .await
            .unwrap();
        assert!(h.go("/dashboard", "/auth/login", None).await.is_allow());
        assert!(store.get("client").await.unwrap().is_none());
    }

    #[test]
    fn test_navigation_helpers() {
        let nav = Navigation::initial("/reports?q=1");
        assert_eq!(nav.previous, "/reports?q=1");
        assert_eq!(nav.target_path(), "/reports");
        assert!(nav.rememberable);
        assert!(!nav.not_rememberable().rememberable);

        let outcome = GuardOutcome::redirect("/auth/login", RedirectReason::Login);
        assert_eq!(outcome.redirect_target(), Some("/auth/login"));
        assert!(GuardOutcome::Allow.redirect_target().is_none());
    }
}
