//! Scheduler error types

use channelsync_domain::ChannelSyncError;
use thiserror::Error;

use crate::errors::InfraError;

/// Scheduler-specific errors
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("Scheduler already running")]
    AlreadyRunning,

    #[error("Scheduler not running")]
    NotRunning,

    #[error("Failed to create scheduler: {0}")]
    CreationFailed(String),

    #[error("Failed to start scheduler: {0}")]
    StartFailed(String),

    #[error("Failed to stop scheduler: {0}")]
    StopFailed(String),

    #[error("Failed to register job: {0}")]
    JobRegistrationFailed(String),

    #[error("Operation timed out after {seconds}s")]
    Timeout { seconds: u64 },
}

impl From<SchedulerError> for InfraError {
    fn from(err: SchedulerError) -> Self {
        let domain_err = match err {
            SchedulerError::AlreadyRunning | SchedulerError::NotRunning => {
                ChannelSyncError::InvalidInput(err.to_string())
            }
            SchedulerError::JobRegistrationFailed(_) => ChannelSyncError::Config(err.to_string()),
            _ => ChannelSyncError::Internal(err.to_string()),
        };
        Self(domain_err)
    }
}

impl From<SchedulerError> for ChannelSyncError {
    fn from(err: SchedulerError) -> Self {
        InfraError::from(err).into()
    }
}

/// Convenience type alias for scheduler operations
pub type SchedulerResult<T> = Result<T, SchedulerError>;
