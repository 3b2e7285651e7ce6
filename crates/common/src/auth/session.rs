//! Lazily refreshed credential session

use std::future::Future;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use tracing::debug;

use super::types::AccessToken;
use crate::time::Clock;

/// Observable state of a [`CredentialSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NoSession,
    Valid { expires_at: DateTime<Utc> },
    Expired { expired_at: DateTime<Utc> },
}

#[derive(Debug)]
enum Slot {
    NoSession,
    Valid(AccessToken),
    Expired(DateTime<Utc>),
}

impl Slot {
    /// Apply the time-driven transition `Valid -> Expired`.
    fn observe(&mut self, now: DateTime<Utc>) {
        if let Self::Valid(token) = self {
            if token.is_expired_at(now) {
                *self = Self::Expired(token.expires_at());
            }
        }
    }

    const fn state(&self) -> SessionState {
        match self {
            Self::NoSession => SessionState::NoSession,
            Self::Valid(token) => SessionState::Valid { expires_at: token.expires_at() },
            Self::Expired(expired_at) => SessionState::Expired { expired_at: *expired_at },
        }
    }
}

/// Cached bearer token owned by a single channel client.
///
/// The slot is locked across the grant exchange, so concurrent callers on the
/// same client wait for one refresh instead of each minting a token.
pub struct CredentialSession {
    slot: Mutex<Slot>,
    clock: Arc<dyn Clock>,
}

impl CredentialSession {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { slot: Mutex::new(Slot::NoSession), clock }
    }

    /// Current state, after applying expiry.
    pub async fn state(&self) -> SessionState {
        let mut slot = self.slot.lock().await;
        slot.observe(self.clock.now());
        slot.state()
    }

    /// Return a usable bearer token, running `acquire` only when there is no
    /// session or the cached token has expired.
    ///
    /// A failed acquisition leaves the session without a token and the error
    /// is returned unchanged.
    pub async fn bearer<F, Fut, E>(&self, acquire: F) -> Result<String, E>
    where
        F: FnOnce() -> Fut + Send,
        Fut: Future<Output = Result<AccessToken, E>> + Send,
    {
        let mut slot = self.slot.lock().await;
        slot.observe(self.clock.now());

        match &*slot {
            Slot::Valid(token) => return Ok(token.secret().to_string()),
            Slot::Expired(expired_at) => {
                debug!(expired_at = %expired_at, event = "session.expired", "refreshing credential session");
            }
            Slot::NoSession => {
                debug!(event = "session.create", "creating credential session");
            }
        }

        *slot = Slot::NoSession;
        let token = acquire().await?;
        let bearer = token.secret().to_string();
        debug!(expires_at = %token.expires_at(), event = "session.ready", "credential session established");
        *slot = Slot::Valid(token);
        Ok(bearer)
    }

    /// Drop the cached token; the next [`bearer`](Self::bearer) call acquires a new one.
    pub async fn invalidate(&self) {
        *self.slot.lock().await = Slot::NoSession;
    }
}
