//! Configuration for the navigation guard.
//!
//! A [`GuardConfig`] is built once at startup and shared read-only by the
//! guard, the actions and the HTTP layer. Every optional setting gets its
//! default here, so nothing downstream has to second-guess a missing value.
//!
//! # Example
//!
//! ```rust
//! use waypost::SecretKey;
//! use waypost::config::{CookieConfig, GuardConfig, PermissionsConfig};
//!
//! // Use defaults
//! let config = GuardConfig::default();
//! assert_eq!(config.login_path, "/auth/login");
//!
//! // Defaults carry no cookie key
//! assert!(config.validate().is_err());
//!
//! // Or customize
//! let config = GuardConfig {
//!     after_login_path: "/dashboard".to_owned(),
//!     permissions: PermissionsConfig {
//!         enabled: true,
//!         field: "roles".to_owned(),
//!         ..Default::default()
//!     },
//!     cookie: CookieConfig {
//!         secret_key: SecretKey::new("a-very-long-secret-used-for-redirect-cookies"),
//!         ..Default::default()
//!     },
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::Duration;
use serde::Deserialize;
use serde_json::Value;

use crate::roles::{RoleTransform, RoleValue, TransformFault};
use crate::secret::SecretKey;
use crate::user::UserRecord;
use crate::GuardError;

/// Process-wide guard settings.
#[derive(Debug, Clone)]
pub struct GuardConfig {
    /// Whether pages that declare nothing require authentication.
    ///
    /// Default: true
    pub global_guard_enabled: bool,

    /// Login page. Paths starting with it skip the guard.
    ///
    /// Default: `/auth/login`
    pub login_path: String,

    /// Registration page. Paths starting with it skip the guard.
    ///
    /// Default: `/auth/register`
    pub register_path: String,

    /// Where an authenticated user lands when leaving an entry page.
    ///
    /// Default: `/`
    pub after_login_path: String,

    /// Where logout sends the user.
    ///
    /// Default: `/auth/login`
    pub after_logout_path: String,

    /// Role-based access control.
    pub permissions: PermissionsConfig,

    /// Lifetime of the remembered destination.
    ///
    /// Default: 10 minutes
    pub redirect_ttl: Duration,

    /// Upper bound on a single session re-validation.
    ///
    /// Default: 10 seconds
    pub revalidate_timeout: Duration,

    /// Redirect cookie settings for the HTTP layer.
    pub cookie: CookieConfig,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            global_guard_enabled: true,
            login_path: "/auth/login".to_owned(),
            register_path: "/auth/register".to_owned(),
            after_login_path: "/".to_owned(),
            after_logout_path: "/auth/login".to_owned(),
            permissions: PermissionsConfig::default(),
            redirect_ttl: Duration::minutes(10),
            revalidate_timeout: Duration::seconds(10),
            cookie: CookieConfig::default(),
        }
    }
}

impl GuardConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pages are public unless they opt in, and the backend gets more time.
    /// The cookie key is random per process.
    pub fn development() -> Self {
        Self {
            global_guard_enabled: false,
            revalidate_timeout: Duration::seconds(30),
            cookie: CookieConfig {
                secure: false,
                secret_key: SecretKey::generate(),
                ..CookieConfig::default()
            },
            ..Self::default()
        }
    }

    /// Every undeclared page is protected and slow backends fail fast.
    pub fn strict() -> Self {
        Self {
            global_guard_enabled: true,
            redirect_ttl: Duration::minutes(5),
            revalidate_timeout: Duration::seconds(3),
            cookie: CookieConfig {
                same_site: SameSite::Strict,
                ..CookieConfig::default()
            },
            ..Self::default()
        }
    }

    /// Loads the static settings from JSON. Missing keys take their defaults;
    /// durations are given in seconds. The result is validated, so
    /// `cookie.secret_key` is required. A role transform, if any, is attached
    /// afterwards with [`with_role_transform`](Self::with_role_transform).
    ///
    /// ```rust
    /// use waypost::GuardConfig;
    ///
    /// let config = GuardConfig::from_json(r#"{
    ///     "login_path": "/signin",
    ///     "permissions": { "enabled": true, "field": "role" },
    ///     "redirect_ttl_secs": 300,
    ///     "cookie": { "secret_key": "0123456789abcdef0123456789abcdef" }
    /// }"#).unwrap();
    /// assert_eq!(config.login_path, "/signin");
    /// assert_eq!(config.register_path, "/auth/register");
    /// assert_eq!(config.redirect_ttl.num_minutes(), 5);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, GuardError> {
        let raw: RawGuardConfig = serde_json::from_str(json)
            .map_err(|e| GuardError::ConfigurationError(e.to_string()))?;
        let config = Self::from(raw);
        config.validate()?;
        Ok(config)
    }

    /// Attaches the role transform hook.
    #[must_use]
    pub fn with_role_transform<F>(mut self, transform: F) -> Self
    where
        F: Fn(&Value, &UserRecord) -> Result<RoleValue, TransformFault> + Send + Sync + 'static,
    {
        self.permissions.transform = Some(Arc::new(transform));
        self
    }

    pub fn validate(&self) -> Result<(), GuardError> {
        for (name, path) in [
            ("login_path", &self.login_path),
            ("register_path", &self.register_path),
            ("after_login_path", &self.after_login_path),
            ("after_logout_path", &self.after_logout_path),
        ] {
            if !path.starts_with('/') {
                return Err(GuardError::ConfigurationError(format!(
                    "{name} must start with '/'"
                )));
            }
        }
        if self.login_path == self.register_path {
            return Err(GuardError::ConfigurationError(
                "login_path and register_path must differ".to_owned(),
            ));
        }
        if self.permissions.enabled && self.permissions.field.is_empty() {
            return Err(GuardError::ConfigurationError(
                "permissions.field must not be empty when permissions are enabled".to_owned(),
            ));
        }
        if self.revalidate_timeout <= Duration::zero() {
            return Err(GuardError::ConfigurationError(
                "revalidate_timeout must be positive".to_owned(),
            ));
        }
        self.cookie.validate()
    }

    /// True for the login and registration pages and anything below them.
    pub fn is_entry_path(&self, path: &str) -> bool {
        path.starts_with(&self.login_path) || path.starts_with(&self.register_path)
    }
}

/// Role derivation rules.
#[derive(Clone)]
pub struct PermissionsConfig {
    /// Default: false
    pub enabled: bool,

    /// User field holding the role(s).
    ///
    /// Default: `role`
    pub field: String,

    /// Renames raw role values, e.g. backend ids to readable names.
    pub mapping: Option<HashMap<String, String>>,

    pub transform: Option<RoleTransform>,
}

impl Default for PermissionsConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            field: "role".to_owned(),
            mapping: None,
            transform: None,
        }
    }
}

impl fmt::Debug for PermissionsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PermissionsConfig")
            .field("enabled", &self.enabled)
            .field("field", &self.field)
            .field("mapping", &self.mapping)
            .field("transform", &self.transform.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SameSite {
    None,
    #[default]
    Lax,
    Strict,
}

impl From<SameSite> for cookie::SameSite {
    fn from(same_site: SameSite) -> Self {
        match same_site {
            SameSite::None => cookie::SameSite::None,
            SameSite::Lax => cookie::SameSite::Lax,
            SameSite::Strict => cookie::SameSite::Strict,
        }
    }
}

/// Settings for the signed redirect cookie.
#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub path: String,
    pub domain: Option<String>,
    pub secure: bool,
    pub http_only: bool,
    /// `Lax` by default so the cookie rides along on the redirect back from
    /// an external login flow.
    pub same_site: SameSite,
    pub secret_key: SecretKey,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: "waypost_redirect".to_owned(),
            path: "/".to_owned(),
            domain: None,
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
            secret_key: SecretKey::default(),
        }
    }
}

impl CookieConfig {
    pub fn validate(&self) -> Result<(), GuardError> {
        if self.secret_key.is_empty() {
            return Err(GuardError::ConfigurationError(
                "cookie secret_key must not be empty".to_owned(),
            ));
        }
        if self.secret_key.len() < 32 {
            return Err(GuardError::ConfigurationError(
                "cookie secret_key should be at least 32 bytes".to_owned(),
            ));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct RawGuardConfig {
    global_guard_enabled: bool,
    login_path: String,
    register_path: String,
    after_login_path: String,
    after_logout_path: String,
    permissions: RawPermissionsConfig,
    redirect_ttl_secs: i64,
    revalidate_timeout_secs: i64,
    cookie: RawCookieConfig,
}

impl Default for RawGuardConfig {
    fn default() -> Self {
        let defaults = GuardConfig::default();
        Self {
            global_guard_enabled: defaults.global_guard_enabled,
            login_path: defaults.login_path,
            register_path: defaults.register_path,
            after_login_path: defaults.after_login_path,
            after_logout_path: defaults.after_logout_path,
            permissions: RawPermissionsConfig::default(),
            redirect_ttl_secs: defaults.redirect_ttl.num_seconds(),
            revalidate_timeout_secs: defaults.revalidate_timeout.num_seconds(),
            cookie: RawCookieConfig::default(),
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct RawPermissionsConfig {
    enabled: bool,
    field: String,
    mapping: Option<HashMap<String, String>>,
}

impl Default for RawPermissionsConfig {
    fn default() -> Self {
        let defaults = PermissionsConfig::default();
        Self {
            enabled: defaults.enabled,
            field: defaults.field,
            mapping: defaults.mapping,
        }
    }
}

#[derive(Deserialize)]
#[serde(default)]
struct RawCookieConfig {
    name: String,
    path: String,
    domain: Option<String>,
    secure: bool,
    http_only: bool,
    same_site: SameSite,
    secret_key: SecretKey,
}

impl Default for RawCookieConfig {
    fn default() -> Self {
        let defaults = CookieConfig::default();
        Self {
            name: defaults.name,
            path: defaults.path,
            domain: defaults.domain,
            secure: defaults.secure,
            http_only: defaults.http_only,
            same_site: defaults.same_site,
            secret_key: defaults.secret_key,
        }
    }
}

impl From<RawGuardConfig> for GuardConfig {
    fn from(raw: RawGuardConfig) -> Self {
        Self {
            global_guard_enabled: raw.global_guard_enabled,
            login_path: raw.login_path,
            register_path: raw.register_path,
            after_login_path: raw.after_login_path,
            after_logout_path: raw.after_logout_path,
            permissions: PermissionsConfig {
                enabled: raw.permissions.enabled,
                field: raw.permissions.field,
                mapping: raw.permissions.mapping,
                transform: None,
            },
            redirect_ttl: Duration::seconds(raw.redirect_ttl_secs),
            revalidate_timeout: Duration::seconds(raw.revalidate_timeout_secs),
            cookie: CookieConfig {
                name: raw.cookie.name,
                path: raw.cookie.path,
                domain: raw.cookie.domain,
                secure: raw.cookie.secure,
                http_only: raw.cookie.http_only,
                same_site: raw.cookie.same_site,
                secret_key: raw.cookie.secret_key,
            },
        }
    }
}
