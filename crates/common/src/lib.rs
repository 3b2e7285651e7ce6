//! Modular common utilities shared across ChannelSync crates.
//!
//! # Feature Tiers
//!
//! Enable cargo features to opt into the tiers you need:
//! - `foundation`: clock abstraction
//! - `runtime`: async credential session state machine
//! - `test-utils`: deterministic clocks for tests

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]
#![warn(clippy::all, clippy::perf, clippy::complexity, clippy::suspicious)]

// Foundation tier
// -----------------------------------------------------------------
#[cfg(feature = "foundation")]
pub mod time;

// Runtime tier
// --------------------------------------------------------------------
#[cfg(feature = "runtime")]
pub mod auth;

// Testing utilities
// ---------------------------------------------------------------
#[cfg(any(feature = "test-utils", test))]
pub mod testing;

#[cfg(feature = "runtime")]
pub use auth::{AccessToken, CredentialSession, SessionState};
#[cfg(feature = "foundation")]
pub use time::{Clock, SystemClock};
