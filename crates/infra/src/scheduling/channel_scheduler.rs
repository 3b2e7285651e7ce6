//! Cron-driven channel sync scheduler.
//!
//! On every tick the scheduler lists active channel configurations and
//! submits one course metadata job and one learner data job for each. Jobs
//! run on the dispatcher; the tick itself only enqueues.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use channelsync_core::{ChannelSyncService, JobDispatcher};
//! use channelsync_infra::scheduling::{
//!     ChannelSchedulerConfig, ChannelSyncScheduler, SchedulerResult,
//! };
//!
//! # async fn example(
//! #     service: Arc<ChannelSyncService>,
//! #     dispatcher: Arc<dyn JobDispatcher>,
//! # ) -> SchedulerResult<()> {
//! let mut scheduler = ChannelSyncScheduler::with_config(
//!     ChannelSchedulerConfig {
//!         cron_expression: "0 0 */6 * * *".into(), // every 6 hours
//!         ..Default::default()
//!     },
//!     service,
//!     dispatcher,
//! )
//! .await?;
//!
//! scheduler.start().await?;
//! // ... application runs ...
//! scheduler.stop().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;

use channelsync_core::{ChannelSyncService, JobDispatcher, SyncJob};
use channelsync_domain::{Result, SchedulerConfig};
use tokio::sync::RwLock;
use tokio_cron_scheduler::{Job, JobScheduler};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::scheduling::error::{SchedulerError, SchedulerResult};

/// Configuration for the channel sync scheduler.
#[derive(Debug, Clone)]
pub struct ChannelSchedulerConfig {
    /// Cron expression (with seconds) describing the sync schedule.
    pub cron_expression: String,
    /// Operator the submitted jobs are attributed to.
    pub api_username: String,
    /// Upper bound for starting the job scheduler.
    pub start_timeout: Duration,
    /// Upper bound for shutting the job scheduler down.
    pub stop_timeout: Duration,
}

impl Default for ChannelSchedulerConfig {
    fn default() -> Self {
        let defaults = SchedulerConfig::default();
        Self {
            cron_expression: defaults.cron_expression,
            api_username: defaults.api_username,
            start_timeout: Duration::from_secs(5),
            stop_timeout: Duration::from_secs(5),
        }
    }
}

impl From<&SchedulerConfig> for ChannelSchedulerConfig {
    fn from(config: &SchedulerConfig) -> Self {
        Self {
            cron_expression: config.cron_expression.clone(),
            api_username: config.api_username.clone(),
            ..Self::default()
        }
    }
}

/// Submit one course job and one learner job per active configuration.
///
/// Returns the number of jobs submitted.
pub async fn enqueue_active_channels(
    service: &ChannelSyncService,
    dispatcher: &dyn JobDispatcher,
    username: &str,
) -> Result<usize> {
    let configs = service.active_channels().await?;
    let mut submitted = 0_usize;

    for config in &configs {
        let channel_code = config.channel_code();
        dispatcher.submit(SyncJob::course_metadata(username, channel_code, config.id)).await?;
        dispatcher.submit(SyncJob::learner_data(username, channel_code, config.id)).await?;
        submitted += 2;
    }

    info!(channels = configs.len(), submitted, "Enqueued channel sync jobs");
    Ok(submitted)
}

/// Channel sync scheduler with explicit lifecycle management.
///
/// `stop` is terminal: the underlying job scheduler is shut down and the
/// cancellation token shared with the cron job stays cancelled, so a tick
/// that fires during shutdown enqueues nothing.
pub struct ChannelSyncScheduler {
    scheduler: Arc<RwLock<JobScheduler>>,
    config: ChannelSchedulerConfig,
    job_id: Uuid,
    running: bool,
    cancellation: CancellationToken,
    service: Arc<ChannelSyncService>,
    dispatcher: Arc<dyn JobDispatcher>,
}

impl ChannelSyncScheduler {
    pub async fn with_config(
        config: ChannelSchedulerConfig,
        service: Arc<ChannelSyncService>,
        dispatcher: Arc<dyn JobDispatcher>,
    ) -> SchedulerResult<Self> {
        let raw_scheduler =
            JobScheduler::new().await.map_err(|e| SchedulerError::CreationFailed(e.to_string()))?;

        let mut scheduler = Self {
            scheduler: Arc::new(RwLock::new(raw_scheduler)),
            config,
            job_id: Uuid::nil(),
            running: false,
            cancellation: CancellationToken::new(),
            service,
            dispatcher,
        };

        scheduler.job_id = scheduler.register_sync_job().await?;
        Ok(scheduler)
    }

    /// Start firing the cron job.
    #[instrument(skip(self))]
    pub async fn start(&mut self) -> SchedulerResult<()> {
        if self.running {
            return Err(SchedulerError::AlreadyRunning);
        }
        if self.cancellation.is_cancelled() {
            return Err(SchedulerError::StartFailed("scheduler was stopped".into()));
        }

        let scheduler = Arc::clone(&self.scheduler);
        let start_timeout = self.config.start_timeout;
        tokio::time::timeout(start_timeout, async move {
            let guard = scheduler.write().await;
            guard.start().await
        })
        .await
        .map_err(|_| SchedulerError::Timeout { seconds: start_timeout.as_secs() })?
        .map_err(|e| SchedulerError::StartFailed(e.to_string()))?;

        self.running = true;
        info!(cron = %self.config.cron_expression, "Channel sync scheduler started");
        Ok(())
    }

    /// Cancel pending ticks and shut the job scheduler down.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> SchedulerResult<()> {
        if !self.running {
            return Err(SchedulerError::NotRunning);
        }

        self.cancellation.cancel();
        self.running = false;

        let scheduler = Arc::clone(&self.scheduler);
        let stop_timeout = self.config.stop_timeout;
        tokio::time::timeout(stop_timeout, async move {
            let mut guard = scheduler.write().await;
            guard.shutdown().await
        })
        .await
        .map_err(|_| SchedulerError::Timeout { seconds: stop_timeout.as_secs() })?
        .map_err(|e| SchedulerError::StopFailed(e.to_string()))?;

        info!("Channel sync scheduler stopped");
        Ok(())
    }

    /// Returns true between a successful `start` and `stop`.
    pub const fn is_running(&self) -> bool {
        self.running
    }

    pub const fn job_id(&self) -> Uuid {
        self.job_id
    }

    async fn register_sync_job(&mut self) -> SchedulerResult<Uuid> {
        if self.job_id != Uuid::nil() {
            return Ok(self.job_id);
        }

        let service = Arc::clone(&self.service);
        let dispatcher = Arc::clone(&self.dispatcher);
        let username = self.config.api_username.clone();
        let cancellation = self.cancellation.clone();

        let job_definition = Job::new_async(self.config.cron_expression.as_str(), move |_id, _lock| {
            let service = Arc::clone(&service);
            let dispatcher = Arc::clone(&dispatcher);
            let username = username.clone();
            let cancellation = cancellation.clone();

            Box::pin(async move {
                if cancellation.is_cancelled() {
                    debug!("Channel sync tick skipped after stop");
                    return;
                }
                match enqueue_active_channels(&service, dispatcher.as_ref(), &username).await {
                    Ok(submitted) => debug!(submitted, "Channel sync tick finished"),
                    Err(err) => error!(error = %err, "Channel sync tick failed"),
                }
            })
        })
        .map_err(|e| SchedulerError::JobRegistrationFailed(e.to_string()))?;

        let job_id = job_definition.guid();
        let scheduler = self.scheduler.write().await;
        scheduler
            .add(job_definition)
            .await
            .map_err(|e| SchedulerError::JobRegistrationFailed(e.to_string()))?;

        debug!(cron = %self.config.cron_expression, job_id = %job_id, "Registered channel sync job");
        Ok(job_id)
    }
}

impl Drop for ChannelSyncScheduler {
    fn drop(&mut self) {
        if self.running {
            warn!("ChannelSyncScheduler dropped while running; cancelling ticks");
            self.cancellation.cancel();
        }
    }
}
