//! Signing key wrapper that keeps key material out of logs.

use std::fmt;

use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Deserializer};

/// Key material used to sign redirect cookies.
///
/// `Debug` and `Display` print `[REDACTED]`, so a `CookieConfig` can be logged
/// as a whole without leaking the key.
///
/// ```rust
/// use waypost::SecretKey;
///
/// let key = SecretKey::new("a-very-long-secret-used-for-redirect-cookies");
/// assert_eq!(format!("{key:?}"), "SecretKey([REDACTED])");
/// assert_eq!(key.len(), 44);
/// ```
#[derive(Clone, PartialEq, Eq, Default)]
pub struct SecretKey(Vec<u8>);

impl SecretKey {
    #[must_use]
    pub fn new(key: impl AsRef<[u8]>) -> Self {
        Self(key.as_ref().to_vec())
    }

    /// 32 random bytes from the OS generator. Cookies signed with it do not
    /// survive a restart.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = vec![0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        Self(bytes)
    }

    /// Raw key bytes, for feeding the MAC.
    #[must_use]
    pub fn expose_bytes(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey([REDACTED])")
    }
}

impl fmt::Display for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<&str> for SecretKey {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for SecretKey {
    fn from(s: String) -> Self {
        Self(s.into_bytes())
    }
}

impl<'de> Deserialize<'de> for SecretKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::from)
    }
}
