//! Port interfaces for channel and global configuration

use async_trait::async_trait;
use channelsync_domain::{
    ChannelCode, ChannelConfiguration, GlobalChannelConfiguration, Result,
};

/// Per-customer channel configurations.
#[async_trait]
pub trait ChannelConfigurationRepository: Send + Sync {
    /// Insert, or update the existing row for the same (customer, channel).
    /// Returns the configuration id.
    async fn save(&self, config: &ChannelConfiguration) -> Result<i64>;

    async fn find(&self, channel: ChannelCode, id: i64) -> Result<Option<ChannelConfiguration>>;

    async fn list_active(&self) -> Result<Vec<ChannelConfiguration>>;
}

/// Versioned channel-wide settings.
#[async_trait]
pub trait GlobalConfigurationRepository: Send + Sync {
    /// Store a new version; previous versions are kept.
    async fn save(&self, config: &GlobalChannelConfiguration) -> Result<i64>;

    /// The authoritative (newest) version for a channel.
    async fn current(&self, channel: ChannelCode) -> Result<Option<GlobalChannelConfiguration>>;
}
