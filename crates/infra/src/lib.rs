//! # ChannelSync Infrastructure
//!
//! Infrastructure implementations of core domain ports.
//!
//! This crate contains:
//! - SQLite repositories for channel configurations and transmission audits
//! - The shared HTTP client and the SAP SuccessFactors and Degreed API clients
//! - The channel registry that binds configurations to clients and formats
//! - Snapshot-backed enrollment and catalog sources
//! - Cron scheduling and in-process job dispatch
//! - Configuration loading and bootstrap seeding
//!
//! ## Architecture
//! - Implements traits defined in `channelsync-core`
//! - Contains all "impure" code (I/O, network, clocks)

pub mod config;
pub mod database;
pub mod errors;
pub mod http;
pub mod integrations;
pub mod registry;
pub mod scheduling;
pub mod sources;

// Re-export commonly used items
pub use config::{Bootstrap, SeedReport};
pub use database::*;
pub use errors::InfraError;
pub use http::*;
pub use integrations::*;
pub use registry::{ChannelFactory, ChannelRegistry};
pub use scheduling::*;
pub use sources::*;
