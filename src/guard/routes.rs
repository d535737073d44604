use std::collections::HashMap;

use super::RouteRequirement;
use crate::GuardError;

/// Per-page requirement declarations.
///
/// Patterns are exact paths (`/settings`) or prefixes ending in `/*`
/// (`/admin/*`, matching `/admin` and everything below it). Exact entries win
/// over prefixes, longer prefixes over shorter ones.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    exact: HashMap<String, RouteRequirement>,
    prefixes: Vec<(String, RouteRequirement)>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn route(mut self, pattern: &str, requirement: RouteRequirement) -> Self {
        self.insert(pattern, requirement);
        self
    }

    pub fn insert(&mut self, pattern: &str, requirement: RouteRequirement) {
        match pattern.strip_suffix("/*") {
            Some(prefix) => {
                let prefix = normalize(prefix).to_owned();
                self.prefixes.retain(|(existing, _)| *existing != prefix);
                self.prefixes.push((prefix, requirement));
                self.prefixes
                    .sort_by(|(a, _), (b, _)| b.len().cmp(&a.len()));
            }
            None => {
                self.exact.insert(normalize(pattern).to_owned(), requirement);
            }
        }
    }

    /// Requirement declared for `path`, ignoring any query or fragment.
    /// `None` means the page declared nothing.
    pub fn lookup(&self, path: &str) -> Option<&RouteRequirement> {
        let path = normalize(strip_query(path));
        if let Some(requirement) = self.exact.get(path) {
            return Some(requirement);
        }
        self.prefixes
            .iter()
            .find(|(prefix, _)| {
                prefix.is_empty()
                    || path == prefix.as_str()
                    || path
                        .strip_prefix(prefix.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            })
            .map(|(_, requirement)| requirement)
    }

    /// Loads `{"<pattern>": <requirement>, ...}`.
    pub fn from_json(json: &str) -> Result<Self, GuardError> {
        let entries: HashMap<String, RouteRequirement> = serde_json::from_str(json)
            .map_err(|e| GuardError::ConfigurationError(e.to_string()))?;
        let mut table = Self::new();
        for (pattern, requirement) in entries {
            table.insert(&pattern, requirement);
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.exact.len() + self.prefixes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

pub(crate) fn strip_query(path: &str) -> &str {
    path.split(['?', '#']).next().unwrap_or(path)
}

fn normalize(path: &str) -> &str {
    match path.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => path,
    }
}
