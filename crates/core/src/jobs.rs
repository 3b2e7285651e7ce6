//! Background sync jobs and the dispatcher port

use async_trait::async_trait;
use channelsync_domain::{impl_domain_status_conversions, ChannelCode, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobKind {
    CourseMetadata,
    LearnerData,
}

impl_domain_status_conversions!(JobKind {
    CourseMetadata => "course_metadata",
    LearnerData => "learner_data",
});

/// One pipeline run for one channel configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncJob {
    pub kind: JobKind,
    /// Operator the run is attributed to in logs.
    pub username: String,
    pub channel_code: ChannelCode,
    pub channel_id: i64,
}

impl SyncJob {
    pub fn course_metadata(username: impl Into<String>, channel_code: ChannelCode, channel_id: i64) -> Self {
        Self { kind: JobKind::CourseMetadata, username: username.into(), channel_code, channel_id }
    }

    pub fn learner_data(username: impl Into<String>, channel_code: ChannelCode, channel_id: i64) -> Self {
        Self { kind: JobKind::LearnerData, username: username.into(), channel_code, channel_id }
    }
}

/// Fire-and-forget execution of sync jobs.
///
/// `submit` only fails when the job cannot be accepted; failures of the job
/// itself are logged by the dispatcher and never reach the caller.
#[async_trait]
pub trait JobDispatcher: Send + Sync {
    async fn submit(&self, job: SyncJob) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    #[test]
    fn job_kind_round_trips_through_strings() {
        assert_eq!(JobKind::CourseMetadata.as_str(), "course_metadata");
        assert_eq!(JobKind::from_str("LEARNER_DATA").unwrap(), JobKind::LearnerData);
        assert!(JobKind::from_str("catalog").is_err());
    }

    #[test]
    fn constructors_set_kind() {
        let job = SyncJob::learner_data("worker", ChannelCode::Degreed, 4);
        assert_eq!(job.kind, JobKind::LearnerData);
        assert_eq!(job.channel_id, 4);
    }
}
