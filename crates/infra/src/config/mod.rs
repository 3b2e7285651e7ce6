//! Configuration loading and management
//!
//! This module provides utilities for loading application configuration
//! from environment variables and files, and for seeding channel
//! configurations at startup.

pub mod bootstrap;
pub mod loader;

// Re-export commonly used items
pub use bootstrap::{Bootstrap, ChannelSeed, SeedReport};
pub use loader::{load, load_from_env, load_from_file, probe_config_paths};
