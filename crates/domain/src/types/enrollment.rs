//! Read-only inputs supplied by the enrollment and catalog data provider.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Learner identity as known locally, plus the channel-side id if linked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnerAccount {
    pub username: String,
    #[serde(default)]
    pub remote_id: Option<String>,
}

/// Current state of one enterprise course enrollment.
///
/// Grade computation happens upstream; only the completion instant and the
/// passing flag are consumed here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrollmentRecord {
    pub id: i64,
    pub learner: LearnerAccount,
    pub course_id: String,
    #[serde(default)]
    pub completed_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub is_passing: bool,
    #[serde(default)]
    pub instructor_name: Option<String>,
}

/// Course run metadata from the customer's catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CourseRun {
    pub key: String,
    pub title: String,
    pub short_description: Option<String>,
    pub full_description: Option<String>,
    pub marketing_url: Option<String>,
    pub image_url: Option<String>,
    /// RFC 3339 timestamp
    pub start: Option<String>,
    /// RFC 3339 timestamp
    pub end: Option<String>,
    pub price: Option<String>,
    pub content_language: Option<String>,
    pub organization: Option<String>,
}

impl CourseRun {
    /// Full description when present, otherwise the short one.
    pub fn description(&self) -> &str {
        self.full_description
            .as_deref()
            .filter(|d| !d.is_empty())
            .or(self.short_description.as_deref())
            .unwrap_or_default()
    }
}
