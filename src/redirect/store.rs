use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use crate::GuardError;

/// Small key/value store with per-entry expiry.
///
/// Expired entries must read as absent. Implement this for a shared backing
/// store (redis, a database table, a server-side session) when several
/// processes serve the same user agents.
#[async_trait]
pub trait RedirectStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, GuardError>;

    /// Writes `value`, replacing any previous one and restarting its expiry.
    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), GuardError>;

    async fn remove(&self, key: &str) -> Result<(), GuardError>;

    /// Reads then removes. Override when the backend can do it in one step.
    async fn take(&self, key: &str) -> Result<Option<String>, GuardError> {
        let value = self.get(key).await?;
        if value.is_some() {
            self.remove(key).await?;
        }
        Ok(value)
    }
}

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: DateTime<Utc>,
}

impl Entry {
    fn is_live(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }
}

/// Process-local store. Entries vanish on restart.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRedirectStore {
    entries: Arc<RwLock<HashMap<String, Entry>>>,
}

impl InMemoryRedirectStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored entries, expired ones included.
    pub fn len(&self) -> usize {
        self.entries.read().map(|guard| guard.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drops expired entries; call periodically in long-running servers.
    pub fn cleanup_expired(&self) {
        let now = Utc::now();
        if let Ok(mut entries) = self.entries.write() {
            entries.retain(|_, entry| entry.is_live(now));
        }
    }
}

fn poisoned<T>(_: T) -> GuardError {
    GuardError::StoreError("Lock poisoned".to_owned())
}

#[async_trait]
impl RedirectStore for InMemoryRedirectStore {
    async fn get(&self, key: &str) -> Result<Option<String>, GuardError> {
        let entries = self.entries.read().map_err(poisoned)?;
        let now = Utc::now();
        Ok(entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), GuardError> {
        self.entries.write().map_err(poisoned)?.insert(
            key.to_owned(),
            Entry {
                value: value.to_owned(),
                expires_at: Utc::now() + ttl,
            },
        );
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), GuardError> {
        self.entries.write().map_err(poisoned)?.remove(key);
        Ok(())
    }

    async fn take(&self, key: &str) -> Result<Option<String>, GuardError> {
        let entry = self.entries.write().map_err(poisoned)?.remove(key);
        let now = Utc::now();
        Ok(entry
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value))
    }
}
