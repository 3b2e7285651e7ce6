//! # ChannelSync Domain
//!
//! Business domain types and models for integrated channel synchronisation.
//!
//! This crate contains:
//! - Channel configuration and audit record types
//! - Catalog summary ledger and its diff rules
//! - Domain error types and Result definitions
//! - Application configuration structures
//!
//! ## Architecture
//! - No dependencies on other ChannelSync crates
//! - Only external dependencies allowed
//! - Pure domain models and data structures

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;
pub mod utils;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
pub use utils::time::{current_time_is_in_interval, parse_datetime_to_epoch_millis};
