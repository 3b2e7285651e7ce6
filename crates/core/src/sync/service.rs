//! Channel sync service
//!
//! Loads a channel configuration, binds it to its client and formats, then
//! runs the learner or course pipeline for that one configuration.

use std::sync::Arc;

use channelsync_common::time::Clock;
use channelsync_domain::{
    CatalogTransmissionAudit, ChannelCode, ChannelConfiguration, ChannelSyncError,
    GlobalChannelConfiguration, Result,
};
use tracing::{info, instrument};

use crate::audit::{CatalogAuditRepository, LearnerAuditRepository};
use crate::channel::{ChannelBinder, ChannelBinding};
use crate::configuration::{ChannelConfigurationRepository, GlobalConfigurationRepository};
use crate::exporters::{CourseExporter, LearnerExporter};
use crate::jobs::{JobKind, SyncJob};
use crate::source::{CourseCatalogSource, EnrollmentSource};
use crate::transmitters::{CourseTransmitter, LearnerTransmissionReport, LearnerTransmitter};

/// Everything the service reaches outside the core.
#[derive(Clone)]
pub struct SyncPorts {
    pub configurations: Arc<dyn ChannelConfigurationRepository>,
    pub global_configurations: Arc<dyn GlobalConfigurationRepository>,
    pub learner_audits: Arc<dyn LearnerAuditRepository>,
    pub catalog_audits: Arc<dyn CatalogAuditRepository>,
    pub enrollments: Arc<dyn EnrollmentSource>,
    pub catalog: Arc<dyn CourseCatalogSource>,
    pub binder: Arc<dyn ChannelBinder>,
}

pub struct ChannelSyncService {
    ports: SyncPorts,
    clock: Arc<dyn Clock>,
}

impl ChannelSyncService {
    pub fn new(ports: SyncPorts, clock: Arc<dyn Clock>) -> Self {
        Self { ports, clock }
    }

    /// Active channel configurations across every channel.
    pub async fn active_channels(&self) -> Result<Vec<ChannelConfiguration>> {
        self.ports.configurations.list_active().await
    }

    /// Run the pipeline a job names.
    pub async fn run(&self, job: &SyncJob) -> Result<()> {
        match job.kind {
            JobKind::LearnerData => {
                self.transmit_learner_data(job.channel_code, job.channel_id).await.map(|_| ())
            }
            JobKind::CourseMetadata => {
                self.transmit_course_metadata(job.channel_code, job.channel_id).await.map(|_| ())
            }
        }
    }

    #[instrument(skip(self))]
    pub async fn transmit_learner_data(
        &self,
        channel_code: ChannelCode,
        channel_id: i64,
    ) -> Result<LearnerTransmissionReport> {
        let (config, binding) = self.bind(channel_code, channel_id).await?;

        let enrollments = self.ports.enrollments.enrollments(&config.customer).await?;
        info!(enrollments = enrollments.len(), customer = %config.customer.name, "Exporting learner data");

        let exporter = LearnerExporter::new(channel_code, enrollments, self.clock.as_ref());
        let transmitter = LearnerTransmitter::new(
            binding.client,
            binding.learner_format,
            Arc::clone(&self.ports.learner_audits),
        );
        transmitter.transmit(&exporter).await
    }

    #[instrument(skip(self))]
    pub async fn transmit_course_metadata(
        &self,
        channel_code: ChannelCode,
        channel_id: i64,
    ) -> Result<CatalogTransmissionAudit> {
        let (config, binding) = self.bind(channel_code, channel_id).await?;

        let runs = self.ports.catalog.course_runs(&config.customer).await?;
        info!(course_runs = runs.len(), customer = %config.customer.name, "Exporting course metadata");

        let mut exporter = CourseExporter::new(binding.course_format, &runs, self.clock.as_ref());
        let transmitter = CourseTransmitter::new(
            binding.client,
            Arc::clone(&self.ports.catalog_audits),
            Arc::clone(&self.clock),
        );
        transmitter.transmit(&config, &mut exporter).await
    }

    async fn bind(
        &self,
        channel_code: ChannelCode,
        channel_id: i64,
    ) -> Result<(ChannelConfiguration, ChannelBinding)> {
        let config = self.configuration(channel_code, channel_id).await?;
        let global = self.global_configuration(channel_code).await?;
        let binding = self.ports.binder.bind(&config, &global).await?;
        Ok((config, binding))
    }

    async fn configuration(&self, channel_code: ChannelCode, channel_id: i64) -> Result<ChannelConfiguration> {
        let config = self.ports.configurations.find(channel_code, channel_id).await?.ok_or_else(|| {
            ChannelSyncError::NotFound(format!("{channel_code} configuration {channel_id} not found"))
        })?;

        if !config.active {
            return Err(ChannelSyncError::Config(format!(
                "{channel_code} configuration {channel_id} is inactive"
            )));
        }
        Ok(config)
    }

    async fn global_configuration(&self, channel_code: ChannelCode) -> Result<GlobalChannelConfiguration> {
        let global = self.ports.global_configurations.current(channel_code).await?.ok_or_else(|| {
            ChannelSyncError::Config(format!("no global configuration for {channel_code}"))
        })?;

        if !global.enabled {
            return Err(ChannelSyncError::Config(format!(
                "global configuration for {channel_code} is disabled"
            )));
        }
        Ok(global)
    }
}
