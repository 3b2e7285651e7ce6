//! Transmission audit records
//!
//! One [`LearnerDataTransmissionAudit`] is written per completion send
//! attempt and one [`CatalogTransmissionAudit`] per catalog sync.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::catalog::CatalogSummary;
use super::channel::ChannelCode;
use crate::impl_domain_status_conversions;

/// Shared grade vocabulary across channels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "Pass")]
    Pass,
    #[serde(rename = "Fail")]
    Fail,
    #[serde(rename = "In Progress")]
    InProgress,
}

impl_domain_status_conversions!(Grade {
    Pass => "Pass",
    Fail => "Fail",
    InProgress => "In Progress",
});

impl Grade {
    /// Incomplete enrollments are in progress; completed ones pass or fail.
    pub const fn classify(completed: bool, is_passing: bool) -> Self {
        match (completed, is_passing) {
            (false, _) => Self::InProgress,
            (true, true) => Self::Pass,
            (true, false) => Self::Fail,
        }
    }
}

/// Learner completion payload as sent (or about to be sent) to a channel.
///
/// A persisted row with an empty `error_message` marks the enrollment as
/// already transmitted for its channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnerDataTransmissionAudit {
    pub id: Option<i64>,
    pub channel_code: ChannelCode,
    pub enterprise_course_enrollment_id: i64,
    pub remote_user_id: String,
    pub course_id: String,
    pub course_completed: bool,
    /// Completion instant in epoch milliseconds; `None` while in progress.
    pub completed_timestamp: Option<i64>,
    pub grade: Grade,
    pub instructor_name: String,
    pub status: String,
    pub error_message: String,
    pub created: DateTime<Utc>,
}

impl LearnerDataTransmissionAudit {
    pub const fn is_complete(&self) -> bool {
        self.completed_timestamp.is_some()
    }

    /// Apply the remote response: the body becomes the error for any status
    /// of 400 or above, otherwise the error is cleared.
    pub fn record_response(&mut self, status_code: u16, body: &str) {
        self.status = status_code.to_string();
        self.error_message = if status_code >= 400 { body.to_string() } else { String::new() };
    }

    /// True when the recorded status parses as a code below 400.
    pub fn is_successful(&self) -> bool {
        self.status.parse::<u16>().is_ok_and(|code| code < 400)
    }
}

/// Outcome of one catalog sync for a customer on one channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogTransmissionAudit {
    pub id: Option<i64>,
    pub enterprise_customer_uuid: Uuid,
    pub channel_code: ChannelCode,
    pub total_courses: usize,
    /// Comma-joined HTTP status per page.
    pub status: String,
    /// Comma-joined error bodies of failed pages; empty when every page succeeded.
    pub error_message: String,
    pub audit_summary: CatalogSummary,
    pub created: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> LearnerDataTransmissionAudit {
        LearnerDataTransmissionAudit {
            id: None,
            channel_code: ChannelCode::SapSuccessFactors,
            enterprise_course_enrollment_id: 7,
            remote_user_id: "U1".into(),
            course_id: "C1".into(),
            course_completed: true,
            completed_timestamp: Some(1000),
            grade: Grade::Pass,
            instructor_name: String::new(),
            status: String::new(),
            error_message: String::new(),
            created: Utc::now(),
        }
    }

    #[test]
    fn grade_classification() {
        assert_eq!(Grade::classify(false, true), Grade::InProgress);
        assert_eq!(Grade::classify(true, true), Grade::Pass);
        assert_eq!(Grade::classify(true, false), Grade::Fail);
        assert_eq!(Grade::InProgress.to_string(), "In Progress");
        assert_eq!(serde_json::to_string(&Grade::InProgress).unwrap(), "\"In Progress\"");
    }

    #[test]
    fn success_response_clears_error() {
        let mut audit = record();
        audit.error_message = "stale".into();
        audit.record_response(200, "{}");
        assert_eq!(audit.status, "200");
        assert_eq!(audit.error_message, "");
        assert!(audit.is_successful());
    }

    #[test]
    fn error_response_keeps_body() {
        let mut audit = record();
        audit.record_response(400, "{\"error\":\"bad\"}");
        assert_eq!(audit.status, "400");
        assert_eq!(audit.error_message, "{\"error\":\"bad\"}");
        assert!(!audit.is_successful());
    }

    #[test]
    fn error_status_with_empty_body_is_not_successful() {
        let mut audit = record();
        audit.record_response(404, "");
        assert_eq!(audit.status, "404");
        assert_eq!(audit.error_message, "");
        assert!(!audit.is_successful());
    }

    #[test]
    fn unrecorded_status_is_not_successful() {
        let audit = record();
        assert!(!audit.is_successful());
    }
}
