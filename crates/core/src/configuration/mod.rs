//! Configuration store ports

pub mod ports;

pub use ports::{ChannelConfigurationRepository, GlobalConfigurationRepository};
