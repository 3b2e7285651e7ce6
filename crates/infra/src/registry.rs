//! Channel registry
//!
//! Maps each channel code to the factory that turns a stored configuration
//! into a live client plus the channel's wire formats. Adding a channel means
//! registering one more factory.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use channelsync_common::time::Clock;
use channelsync_core::channel::{
    DegreedCourseFormat, DegreedLearnerFormat, SapSuccessFactorsCourseFormat,
    SapSuccessFactorsLearnerFormat,
};
use channelsync_core::{ChannelBinder, ChannelBinding};
use channelsync_domain::{
    ChannelCode, ChannelConfiguration, ChannelCredentials, ChannelSyncError,
    GlobalChannelConfiguration, HttpConfig, Result,
};
use tracing::debug;

use crate::integrations::{DegreedClient, SapSuccessFactorsClient};

/// Builds the binding for one channel.
#[async_trait]
pub trait ChannelFactory: Send + Sync {
    async fn bind(
        &self,
        config: &ChannelConfiguration,
        global: &GlobalChannelConfiguration,
    ) -> Result<ChannelBinding>;
}

#[derive(Default)]
pub struct ChannelRegistry {
    factories: HashMap<ChannelCode, Arc<dyn ChannelFactory>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in SAP SuccessFactors and Degreed factories.
    pub fn with_defaults(http: &HttpConfig, clock: Arc<dyn Clock>) -> Self {
        let mut registry = Self::new();
        registry.register(
            ChannelCode::SapSuccessFactors,
            Arc::new(SapSuccessFactorsFactory {
                timeout: Duration::from_secs(http.sap_timeout_seconds),
                clock: Arc::clone(&clock),
            }),
        );
        registry.register(
            ChannelCode::Degreed,
            Arc::new(DegreedFactory { timeout: Duration::from_secs(http.degreed_timeout_seconds), clock }),
        );
        registry
    }

    pub fn register(&mut self, channel: ChannelCode, factory: Arc<dyn ChannelFactory>) {
        self.factories.insert(channel, factory);
    }

    pub fn is_registered(&self, channel: ChannelCode) -> bool {
        self.factories.contains_key(&channel)
    }
}

#[async_trait]
impl ChannelBinder for ChannelRegistry {
    async fn bind(
        &self,
        config: &ChannelConfiguration,
        global: &GlobalChannelConfiguration,
    ) -> Result<ChannelBinding> {
        let channel = config.channel_code();
        if global.channel_code != channel {
            return Err(ChannelSyncError::Config(format!(
                "global configuration for {} cannot bind {channel} configuration {}",
                global.channel_code, config.id
            )));
        }

        let factory = self
            .factories
            .get(&channel)
            .ok_or_else(|| ChannelSyncError::Config(format!("no channel registered for {channel}")))?;

        debug!(channel_code = %channel, channel_id = config.id, "binding channel configuration");
        factory.bind(config, global).await
    }
}

struct SapSuccessFactorsFactory {
    timeout: Duration,
    clock: Arc<dyn Clock>,
}

#[async_trait]
impl ChannelFactory for SapSuccessFactorsFactory {
    async fn bind(
        &self,
        config: &ChannelConfiguration,
        global: &GlobalChannelConfiguration,
    ) -> Result<ChannelBinding> {
        let ChannelCredentials::SapSuccessFactors(credentials) = &config.credentials else {
            return Err(mismatched_credentials(config, ChannelCode::SapSuccessFactors));
        };

        let client =
            SapSuccessFactorsClient::connect(credentials.clone(), global, self.timeout, Arc::clone(&self.clock))
                .await?;

        Ok(ChannelBinding {
            client: Arc::new(client),
            learner_format: Arc::new(SapSuccessFactorsLearnerFormat::new(global.provider_id.clone())),
            course_format: Arc::new(SapSuccessFactorsCourseFormat::new(global.provider_id.clone())),
        })
    }
}

struct DegreedFactory {
    timeout: Duration,
    clock: Arc<dyn Clock>,
}

#[async_trait]
impl ChannelFactory for DegreedFactory {
    async fn bind(
        &self,
        config: &ChannelConfiguration,
        global: &GlobalChannelConfiguration,
    ) -> Result<ChannelBinding> {
        let ChannelCredentials::Degreed(credentials) = &config.credentials else {
            return Err(mismatched_credentials(config, ChannelCode::Degreed));
        };

        let client = DegreedClient::new(credentials.clone(), global, self.timeout, Arc::clone(&self.clock))?;
        let company_id = credentials.company_id.clone();

        Ok(ChannelBinding {
            client: Arc::new(client),
            learner_format: Arc::new(DegreedLearnerFormat::new(company_id.clone(), global.provider_id.clone())),
            course_format: Arc::new(DegreedCourseFormat::new(company_id, global.provider_id.clone())),
        })
    }
}

fn mismatched_credentials(config: &ChannelConfiguration, expected: ChannelCode) -> ChannelSyncError {
    ChannelSyncError::Config(format!(
        "configuration {} carries {} credentials, expected {expected}",
        config.id,
        config.channel_code()
    ))
}
