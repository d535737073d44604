//! Role resolution: raw user field → optional transform → list → name mapping.

use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use serde_json::Value;

use crate::config::PermissionsConfig;
use crate::user::UserRecord;

/// Ordered role names derived from a user record. The first entry is the
/// primary role. Never cached; recompute on each check.
pub type RoleSet = Vec<String>;

/// Host-supplied hook turning the raw role field into role names.
///
/// Receives the raw field value (`Value::Null` when absent) and the whole
/// user record.
pub type RoleTransform =
    Arc<dyn Fn(&Value, &UserRecord) -> Result<RoleValue, TransformFault> + Send + Sync>;

/// What a [`RoleTransform`] may return: nothing, one role, or several.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoleValue {
    None,
    One(String),
    Many(Vec<String>),
}

impl RoleValue {
    fn into_roles(self) -> RoleSet {
        match self {
            Self::None => Vec::new(),
            Self::One(role) => vec![role],
            Self::Many(roles) => roles,
        }
    }
}

impl From<&str> for RoleValue {
    fn from(role: &str) -> Self {
        Self::One(role.to_owned())
    }
}

impl From<String> for RoleValue {
    fn from(role: String) -> Self {
        Self::One(role)
    }
}

impl From<Vec<String>> for RoleValue {
    fn from(roles: Vec<String>) -> Self {
        Self::Many(roles)
    }
}

impl From<Option<String>> for RoleValue {
    fn from(role: Option<String>) -> Self {
        role.map_or(Self::None, Self::One)
    }
}

/// Failure reported by a role transform. Never reaches the caller of
/// [`resolve`]; the raw value is used instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformFault(pub String);

impl TransformFault {
    pub fn new(reason: impl Into<String>) -> Self {
        Self(reason.into())
    }
}

impl fmt::Display for TransformFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "role transform failed: {}", self.0)
    }
}

impl std::error::Error for TransformFault {}

/// Derives the role list for `user`.
///
/// Returns an empty list when permissions are disabled. Order follows the
/// source value and duplicates are kept.
pub fn resolve(user: &UserRecord, config: &PermissionsConfig) -> RoleSet {
    if !config.enabled {
        return Vec::new();
    }

    let raw = user.field(&config.field);

    let roles = match &config.transform {
        Some(transform) => match run_transform(transform, &raw, user) {
            Ok(value) => value.into_roles(),
            Err(fault) => {
                log::warn!(
                    target: "waypost::roles",
                    "msg=\"role transform failed, using raw value\" field=\"{}\" error=\"{}\"",
                    config.field,
                    fault.0
                );
                normalize(&raw)
            }
        },
        None => normalize(&raw),
    };

    match &config.mapping {
        Some(mapping) => roles
            .into_iter()
            .map(|role| mapping.get(&role).cloned().unwrap_or(role))
            .collect(),
        None => roles,
    }
}

/// Runs the transform, turning a panic into a [`TransformFault`].
fn run_transform(
    transform: &RoleTransform,
    raw: &Value,
    user: &UserRecord,
) -> Result<RoleValue, TransformFault> {
    catch_unwind(AssertUnwindSafe(|| transform(raw, user))).unwrap_or_else(|payload| {
        let reason = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_owned())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "transform panicked".to_owned());
        Err(TransformFault(reason))
    })
}

/// Arrays keep their elements, a present scalar becomes one element, null
/// becomes nothing. Non-string scalars use their JSON text.
fn normalize(value: &Value) -> RoleSet {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().filter_map(scalar_role).collect(),
        other => scalar_role(other).into_iter().collect(),
    }
}

fn scalar_role(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

/// Role queries over the current user, recomputed on every call.
#[derive(Clone, Copy)]
pub struct RoleResolver<'a> {
    config: &'a PermissionsConfig,
}

impl<'a> RoleResolver<'a> {
    pub fn new(config: &'a PermissionsConfig) -> Self {
        Self { config }
    }

    pub fn resolve(&self, user: &UserRecord) -> RoleSet {
        resolve(user, self.config)
    }

    pub fn primary_role(&self, user: &UserRecord) -> Option<String> {
        self.resolve(user).into_iter().next()
    }

    pub fn has_role(&self, user: &UserRecord, role: &str) -> bool {
        self.resolve(user).iter().any(|r| r == role)
    }

    pub fn has_any_role<S: AsRef<str>>(&self, user: &UserRecord, roles: &[S]) -> bool {
        let resolved = self.resolve(user);
        roles
            .iter()
            .any(|wanted| resolved.iter().any(|r| r == wanted.as_ref()))
    }

    pub fn has_all_roles<S: AsRef<str>>(&self, user: &UserRecord, roles: &[S]) -> bool {
        let resolved = self.resolve(user);
        roles
            .iter()
            .all(|wanted| resolved.iter().any(|r| r == wanted.as_ref()))
    }
}
