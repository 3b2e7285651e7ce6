//! # ChannelSync App
//!
//! Process entry layer for the channel sync worker.
//!
//! This crate contains:
//! - Application context (dependency injection)
//! - Logging setup
//!
//! ## Architecture
//! - Depends on `common`, `domain`, `core`, and `infra`
//! - Wires up the hexagonal architecture

pub mod context;
pub mod utils;

pub use context::AppContext;
pub use utils::logging::{error_label, init_tracing};
