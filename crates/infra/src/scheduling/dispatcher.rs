//! In-process job dispatcher
//!
//! Each submitted job runs on its own tokio task. Job failures are logged
//! with the operator and channel that identify the run and never propagate.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use channelsync_core::{ChannelSyncService, JobDispatcher, SyncJob};
use channelsync_domain::Result;
use futures::future::join_all;
use parking_lot::Mutex;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

pub struct TaskJobDispatcher {
    service: Arc<ChannelSyncService>,
    job_timeout: Duration,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl TaskJobDispatcher {
    pub fn new(service: Arc<ChannelSyncService>, job_timeout: Duration) -> Self {
        Self { service, job_timeout, handles: Mutex::new(Vec::new()) }
    }

    /// Number of jobs still running.
    pub fn in_flight(&self) -> usize {
        self.handles.lock().iter().filter(|handle| !handle.is_finished()).count()
    }

    /// Wait for every submitted job to finish.
    pub async fn drain(&self) {
        let handles: Vec<_> = std::mem::take(&mut *self.handles.lock());
        for joined in join_all(handles).await {
            if let Err(err) = joined {
                warn!(error = %err, "sync job task ended abnormally");
            }
        }
    }

    async fn run_job(service: Arc<ChannelSyncService>, job: SyncJob, job_timeout: Duration) {
        info!(
            kind = %job.kind,
            username = %job.username,
            channel_code = %job.channel_code,
            channel_id = job.channel_id,
            "Starting sync job"
        );

        match tokio::time::timeout(job_timeout, service.run(&job)).await {
            Ok(Ok(())) => {
                info!(kind = %job.kind, channel_code = %job.channel_code, channel_id = job.channel_id, "Sync job finished");
            }
            Ok(Err(err)) => {
                error!(
                    kind = %job.kind,
                    username = %job.username,
                    channel_code = %job.channel_code,
                    channel_id = job.channel_id,
                    error = %err,
                    "Sync job failed"
                );
            }
            Err(_) => {
                error!(
                    kind = %job.kind,
                    username = %job.username,
                    channel_code = %job.channel_code,
                    channel_id = job.channel_id,
                    timeout_secs = job_timeout.as_secs(),
                    "Sync job timed out"
                );
            }
        }
    }
}

#[async_trait]
impl JobDispatcher for TaskJobDispatcher {
    async fn submit(&self, job: SyncJob) -> Result<()> {
        let handle = tokio::spawn(Self::run_job(Arc::clone(&self.service), job, self.job_timeout));

        let mut handles = self.handles.lock();
        handles.retain(|handle| !handle.is_finished());
        handles.push(handle);
        Ok(())
    }
}
