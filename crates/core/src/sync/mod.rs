//! Channel sync orchestration

pub mod service;

pub use service::{ChannelSyncService, SyncPorts};
