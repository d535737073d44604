//! Redirect slot carried in an HMAC-SHA256 signed cookie.
//!
//! The cookie value is `{hex(path)}.{expires_unix}.{hex(signature)}`, the
//! signature covering everything before the last dot. A tampered or expired
//! cookie reads as empty.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use cookie::Cookie;
use hmac::{Hmac, Mac};
use sha2::Sha256;

use super::RedirectStore;
use crate::config::CookieConfig;
use crate::secret::SecretKey;
use crate::GuardError;

type HmacSha256 = Hmac<Sha256>;

/// One request's view of the redirect cookie.
///
/// Built from the incoming `Cookie` header; writes are kept so the HTTP layer
/// can emit them with [`set_cookie_headers`](Self::set_cookie_headers).
#[derive(Debug)]
pub struct CookieRedirectStore {
    config: CookieConfig,
    incoming: HashMap<String, String>,
    changes: Mutex<HashMap<String, Option<(String, DateTime<Utc>)>>>,
}

impl CookieRedirectStore {
    pub fn new(config: CookieConfig) -> Self {
        Self {
            config,
            incoming: HashMap::new(),
            changes: Mutex::new(HashMap::new()),
        }
    }

    /// Parses a `Cookie` request header (`a=1; b="2"`). Malformed pairs are
    /// skipped.
    pub fn from_cookie_header(config: CookieConfig, header: Option<&str>) -> Self {
        let incoming = header
            .map(|header| {
                Cookie::split_parse(header)
                    .filter_map(Result::ok)
                    .map(|cookie| (cookie.name().to_owned(), cookie.value_trimmed().to_owned()))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            config,
            incoming,
            changes: Mutex::new(HashMap::new()),
        }
    }

    /// `Set-Cookie` values for every write made through this store.
    pub fn set_cookie_headers(&self) -> Result<Vec<String>, GuardError> {
        let changes = self.changes.lock().unwrap_or_else(PoisonError::into_inner);
        let mut headers = Vec::with_capacity(changes.len());
        for (name, change) in changes.iter() {
            let cookie = match change {
                Some((value, expires_at)) => {
                    let signed = sign_value(value, *expires_at, &self.config.secret_key)?;
                    let max_age = (*expires_at - Utc::now()).num_seconds().max(0);
                    self.build_cookie(name, signed, max_age)
                }
                None => {
                    let mut cookie = self.build_cookie(name, String::new(), 0);
                    cookie.make_removal();
                    cookie
                }
            };
            headers.push(cookie.to_string());
        }
        Ok(headers)
    }

    fn build_cookie(&self, name: &str, value: String, max_age: i64) -> Cookie<'static> {
        let mut builder = Cookie::build((name.to_owned(), value))
            .path(self.config.path.clone())
            .max_age(cookie::time::Duration::seconds(max_age))
            .same_site(self.config.same_site.into())
            .http_only(self.config.http_only)
            .secure(self.config.secure);
        if let Some(domain) = &self.config.domain {
            builder = builder.domain(domain.clone());
        }
        builder.build()
    }

    fn record(&self, name: &str, change: Option<(String, DateTime<Utc>)>) {
        self.changes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_owned(), change);
    }
}

#[async_trait]
impl RedirectStore for CookieRedirectStore {
    async fn get(&self, key: &str) -> Result<Option<String>, GuardError> {
        let changed = self
            .changes
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned();

        if let Some(change) = changed {
            return Ok(change
                .filter(|(_, expires_at)| *expires_at > Utc::now())
                .map(|(value, _)| value));
        }

        Ok(self
            .incoming
            .get(key)
            .and_then(|raw| verify_value(raw, &self.config.secret_key)))
    }

    async fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<(), GuardError> {
        self.record(key, Some((value.to_owned(), Utc::now() + ttl)));
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<(), GuardError> {
        self.record(key, None);
        Ok(())
    }
}

fn mac(secret: &SecretKey) -> Result<HmacSha256, GuardError> {
    HmacSha256::new_from_slice(secret.expose_bytes())
        .map_err(|e| GuardError::ConfigurationError(e.to_string()))
}

/// Produces the signed cookie value for `value` expiring at `expires_at`.
pub fn sign_value(
    value: &str,
    expires_at: DateTime<Utc>,
    secret: &SecretKey,
) -> Result<String, GuardError> {
    let payload = format!("{}.{}", hex::encode(value), expires_at.timestamp());
    let mut mac = mac(secret)?;
    mac.update(payload.as_bytes());
    Ok(format!(
        "{payload}.{}",
        hex::encode(mac.finalize().into_bytes())
    ))
}

/// Checks signature and expiry, returning the stored value.
pub fn verify_value(signed: &str, secret: &SecretKey) -> Option<String> {
    let (payload, signature_hex) = signed.rsplit_once('.')?;
    let signature = hex::decode(signature_hex).ok()?;

    let mut mac = mac(secret).ok()?;
    mac.update(payload.as_bytes());
    if mac.verify_slice(&signature).is_err() {
        log::warn!(
            target: "waypost::redirect",
            "msg=\"redirect cookie tampered\" cookie_prefix=\"{}...\"",
            signed.chars().take(8).collect::<String>()
        );
        return None;
    }

    let (value_hex, expires) = payload.rsplit_once('.')?;
    let expires_at = DateTime::from_timestamp(expires.parse().ok()?, 0)?;
    if expires_at <= Utc::now() {
        return None;
    }

    String::from_utf8(hex::decode(value_hex).ok()?).ok()
}
