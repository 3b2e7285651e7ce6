//! Token types

use std::fmt;

use chrono::{DateTime, Utc};

/// Bearer token together with its absolute expiry instant.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken {
    secret: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(secret: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self { secret: secret.into(), expires_at }
    }

    /// Build a token from an OAuth `expires_in` (seconds) relative to `now`.
    pub fn expiring_in(secret: impl Into<String>, now: DateTime<Utc>, expires_in: i64) -> Self {
        Self::new(secret, now + chrono::Duration::seconds(expires_in))
    }

    pub fn secret(&self) -> &str {
        &self.secret
    }

    pub const fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// A token is unusable from its expiry instant onwards.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("secret", &"***")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}
