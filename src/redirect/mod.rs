//! Remembers where a user was heading before being sent to log in.
//!
//! [`RedirectMemory`] is a single slot on top of a [`RedirectStore`]. Store
//! failures are logged and read as an empty slot; losing the remembered page
//! only costs the user a landing on the default page.

mod cookie_store;
mod store;

use std::sync::Arc;

use chrono::Duration;

pub use cookie_store::{CookieRedirectStore, sign_value, verify_value};
pub use store::{InMemoryRedirectStore, RedirectStore};

/// The intended-destination slot of one user agent.
#[derive(Clone)]
pub struct RedirectMemory {
    store: Arc<dyn RedirectStore>,
    key: String,
    ttl: Duration,
}

impl RedirectMemory {
    /// Entries live for 10 minutes unless [`with_ttl`](Self::with_ttl) says
    /// otherwise. `key` must identify the user agent in a shared store; a per-request
    /// store like [`CookieRedirectStore`] takes the cookie name.
    pub fn new(store: Arc<dyn RedirectStore>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            ttl: Duration::minutes(10),
        }
    }

    /// Slot for one client in a store shared by many.
    pub fn for_client(store: Arc<dyn RedirectStore>, client_id: &str) -> Self {
        Self::new(store, format!("redirect:{client_id}"))
    }

    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Stores `path`, replacing any earlier value and restarting the TTL.
    /// Paths that could leave the site (see [`is_local_path`]) are dropped.
    pub async fn remember(&self, path: &str) {
        if !is_local_path(path) {
            log::warn!(
                target: "waypost::redirect",
                "msg=\"refusing to remember non-local path\" path=\"{}\"",
                path.escape_debug()
            );
            return;
        }
        if let Err(e) = self.store.set(&self.key, path, self.ttl).await {
            log::error!(
                target: "waypost::redirect",
                "msg=\"failed to remember redirect\" path=\"{path}\" error=\"{e}\""
            );
        }
    }

    /// Current value, left in place.
    pub async fn recall(&self) -> Option<String> {
        let value = self.store.get(&self.key).await.unwrap_or_else(|e| {
            log::error!(
                target: "waypost::redirect",
                "msg=\"failed to read redirect\" error=\"{e}\""
            );
            None
        });
        local_only(value)
    }

    /// Current value, cleared. A stored value that is not a local path is
    /// cleared and reported as empty.
    pub async fn consume(&self) -> Option<String> {
        let value = self.store.take(&self.key).await.unwrap_or_else(|e| {
            log::error!(
                target: "waypost::redirect",
                "msg=\"failed to consume redirect\" error=\"{e}\""
            );
            None
        });
        local_only(value)
    }

    pub async fn clear(&self) {
        if let Err(e) = self.store.remove(&self.key).await {
            log::error!(
                target: "waypost::redirect",
                "msg=\"failed to clear redirect\" error=\"{e}\""
            );
        }
    }
}

/// True for a same-origin path: a single leading `/`, not followed by
/// another `/` or `\`, and no control characters. Browsers drop tabs and
/// newlines, so `/\t/host` arrives as `//host`.
pub fn is_local_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.starts_with("//")
        && !path.starts_with("/\\")
        && !path.chars().any(char::is_control)
}

fn local_only(value: Option<String>) -> Option<String> {
    value.filter(|path| {
        let local = is_local_path(path);
        if !local {
            log::warn!(
                target: "waypost::redirect",
                "msg=\"discarding non-local redirect\" path=\"{}\"",
                path.escape_debug()
            );
        }
        local
    })
}
