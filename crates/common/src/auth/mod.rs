//! OAuth bearer-token session management
//!
//! Channel clients exchange credentials for short-lived bearer tokens and
//! reuse them until they expire. [`CredentialSession`] owns that cache as an
//! explicit state machine:
//!
//! ```text
//! NoSession ──acquire──► Valid(token, expires_at)
//!                          │ now >= expires_at
//!                          ▼
//!                        Expired ──acquire──► Valid(..)
//! ```
//!
//! Refresh happens lazily, on the next use after expiry. Nothing refreshes in
//! the background.

pub mod session;
pub mod types;

pub use session::{CredentialSession, SessionState};
pub use types::AccessToken;
