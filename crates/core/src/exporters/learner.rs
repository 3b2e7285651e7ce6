//! Learner completion exporter

use channelsync_common::time::Clock;
use channelsync_domain::{ChannelCode, EnrollmentRecord, Grade, LearnerDataTransmissionAudit};
use chrono::{DateTime, Utc};
use tracing::debug;

/// Builds one unsent audit record per enrollment that has a remote user id.
#[derive(Debug, Clone)]
pub struct LearnerExporter {
    channel_code: ChannelCode,
    enrollments: Vec<EnrollmentRecord>,
    created: DateTime<Utc>,
}

impl LearnerExporter {
    pub fn new(channel_code: ChannelCode, enrollments: Vec<EnrollmentRecord>, clock: &dyn Clock) -> Self {
        Self { channel_code, enrollments, created: clock.now() }
    }

    pub const fn channel_code(&self) -> ChannelCode {
        self.channel_code
    }

    pub fn len(&self) -> usize {
        self.enrollments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enrollments.is_empty()
    }

    /// Lazily yield audit records. Each call starts over from the first
    /// enrollment.
    pub fn export(&self) -> impl Iterator<Item = LearnerDataTransmissionAudit> + '_ {
        self.enrollments.iter().filter_map(|enrollment| self.record_for(enrollment))
    }

    fn record_for(&self, enrollment: &EnrollmentRecord) -> Option<LearnerDataTransmissionAudit> {
        let Some(remote_user_id) = enrollment.learner.remote_id.clone() else {
            debug!(
                username = %enrollment.learner.username,
                channel_code = %self.channel_code,
                enrollment_id = enrollment.id,
                "No learner data sent: remote user id not found"
            );
            return None;
        };

        let completed = enrollment.completed_date.is_some();
        Some(LearnerDataTransmissionAudit {
            id: None,
            channel_code: self.channel_code,
            enterprise_course_enrollment_id: enrollment.id,
            remote_user_id,
            course_id: enrollment.course_id.clone(),
            course_completed: completed && enrollment.is_passing,
            completed_timestamp: enrollment.completed_date.map(|date| date.timestamp_millis()),
            grade: Grade::classify(completed, enrollment.is_passing),
            instructor_name: enrollment.instructor_name.clone().unwrap_or_default(),
            status: String::new(),
            error_message: String::new(),
            created: self.created,
        })
    }
}
