//! Port interfaces for integrated channels

use std::sync::Arc;

use async_trait::async_trait;
use channelsync_domain::{
    ChannelConfiguration, ChannelSyncError, CourseRun, GlobalChannelConfiguration,
    LearnerDataTransmissionAudit, Result,
};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// HTTP surface of a remote learning system.
///
/// Both operations return `(status_code, body)` for any HTTP response,
/// including 4xx and 5xx. `Err` is reserved for failures below HTTP
/// (connect, timeout) and for credential exchange failures.
///
/// The default bodies report the capability as unimplemented; every channel
/// client overrides both.
#[async_trait]
pub trait ChannelApiClient: Send + Sync {
    async fn send_completion_status(
        &self,
        remote_user_id: &str,
        payload: &str,
    ) -> Result<(u16, String)> {
        let _ = (remote_user_id, payload);
        Err(ChannelSyncError::Unimplemented(
            "send_completion_status is not supported by this channel client".into(),
        ))
    }

    async fn send_course_import(&self, payload: &str) -> Result<(u16, String)> {
        let _ = payload;
        Err(ChannelSyncError::Unimplemented(
            "send_course_import is not supported by this channel client".into(),
        ))
    }
}

/// Serialises learner audit records into the channel's completion body.
pub trait LearnerRecordFormat: Send + Sync {
    fn completion_payload(&self, record: &LearnerDataTransmissionAudit) -> Result<String>;
}

/// One course in channel wire format, keyed by its catalog id.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseEntry {
    pub course_id: String,
    pub body: Value,
}

/// Course metadata wire format of a channel.
pub trait CourseRecordFormat: Send + Sync {
    /// Maximum number of entries per course-import request.
    fn page_size(&self) -> usize;

    fn course_entry(&self, run: &CourseRun, now: DateTime<Utc>) -> Result<CourseEntry>;

    /// Entry that deactivates a course on the remote side, for channels that
    /// support it.
    fn removal_entry(&self, course_id: &str) -> Option<CourseEntry> {
        let _ = course_id;
        None
    }

    /// Wrap one page of entries in the channel's request envelope.
    fn render_page(&self, entries: &[CourseEntry]) -> Result<String>;
}

/// Everything needed to run the pipeline for one channel configuration.
#[derive(Clone)]
pub struct ChannelBinding {
    pub client: Arc<dyn ChannelApiClient>,
    pub learner_format: Arc<dyn LearnerRecordFormat>,
    pub course_format: Arc<dyn CourseRecordFormat>,
}

/// Resolves a channel configuration into a concrete [`ChannelBinding`].
#[async_trait]
pub trait ChannelBinder: Send + Sync {
    async fn bind(
        &self,
        config: &ChannelConfiguration,
        global: &GlobalChannelConfiguration,
    ) -> Result<ChannelBinding>;
}
