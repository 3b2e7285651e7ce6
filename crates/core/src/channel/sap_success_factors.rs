//! SAP SuccessFactors wire formats
//!
//! Completion bodies are posted as-is to the OCN completion endpoint. Course
//! pages are wrapped in an `ocnCourses` envelope.

use std::collections::BTreeMap;

use channelsync_domain::constants::SAP_COURSE_PAGE_SIZE;
use channelsync_domain::{
    current_time_is_in_interval, ChannelSyncError, CourseRun, LearnerDataTransmissionAudit,
    Result,
};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use super::ports::{CourseEntry, CourseRecordFormat, LearnerRecordFormat};

const COURSE_LOCALE: &str = "English";
const COURSE_CURRENCY: &str = "USD";
const LAUNCH_TYPE_URL: u8 = 3;

/// Completion payload shared by every channel, keys sorted.
pub(crate) fn completion_fields(
    record: &LearnerDataTransmissionAudit,
    provider_id: &str,
    completed_timestamp: Value,
) -> BTreeMap<&'static str, Value> {
    BTreeMap::from([
        ("completedTimestamp", completed_timestamp),
        ("courseCompleted", json!(if record.course_completed { "true" } else { "false" })),
        ("courseID", json!(record.course_id)),
        ("grade", json!(record.grade.as_str())),
        ("instructorName", json!(record.instructor_name)),
        ("providerID", json!(provider_id)),
        ("userID", json!(record.remote_user_id)),
    ])
}

pub(crate) fn to_json_string<T: serde::Serialize>(value: &T) -> Result<String> {
    serde_json::to_string(value)
        .map_err(|e| ChannelSyncError::Internal(format!("failed to serialise payload: {e}")))
}

#[derive(Debug, Clone)]
pub struct SapSuccessFactorsLearnerFormat {
    provider_id: String,
}

impl SapSuccessFactorsLearnerFormat {
    pub fn new(provider_id: impl Into<String>) -> Self {
        Self { provider_id: provider_id.into() }
    }
}

impl LearnerRecordFormat for SapSuccessFactorsLearnerFormat {
    fn completion_payload(&self, record: &LearnerDataTransmissionAudit) -> Result<String> {
        let fields = completion_fields(record, &self.provider_id, json!(record.completed_timestamp));
        to_json_string(&fields)
    }
}

#[derive(Debug, Clone)]
pub struct SapSuccessFactorsCourseFormat {
    provider_id: String,
    page_size: usize,
}

impl SapSuccessFactorsCourseFormat {
    pub fn new(provider_id: impl Into<String>) -> Self {
        Self { provider_id: provider_id.into(), page_size: SAP_COURSE_PAGE_SIZE }
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    fn localized(value: &str) -> Value {
        json!([{ "locale": COURSE_LOCALE, "value": value }])
    }

    fn price(run: &CourseRun) -> f64 {
        run.price.as_deref().and_then(|p| p.trim().parse::<f64>().ok()).unwrap_or(0.0)
    }

    fn epoch_millis(value: Option<&str>) -> Result<Value> {
        value
            .map(channelsync_domain::parse_datetime_to_epoch_millis)
            .transpose()
            .map(|millis| json!(millis))
    }
}

impl CourseRecordFormat for SapSuccessFactorsCourseFormat {
    fn page_size(&self) -> usize {
        self.page_size
    }

    fn course_entry(&self, run: &CourseRun, now: DateTime<Utc>) -> Result<CourseEntry> {
        let launch_url = run.marketing_url.clone().unwrap_or_default();
        let active = current_time_is_in_interval(run.start.as_deref(), run.end.as_deref(), now)?;

        let body = json!({
            "courseID": run.key,
            "providerID": self.provider_id,
            "status": "ACTIVE",
            "title": Self::localized(&run.title),
            "description": Self::localized(run.description()),
            "thumbnailURI": run.image_url.clone().unwrap_or_default(),
            "content": [{
                "providerID": self.provider_id,
                "launchURL": launch_url,
                "contentTitle": run.title,
                "contentID": run.key,
                "launchType": LAUNCH_TYPE_URL,
                "mobileEnabled": false,
            }],
            "schedule": [{
                "startDate": Self::epoch_millis(run.start.as_deref())?,
                "endDate": Self::epoch_millis(run.end.as_deref())?,
                "active": active,
            }],
            "price": [{ "currency": COURSE_CURRENCY, "value": Self::price(run) }],
            "revisionNumber": 1,
        });

        Ok(CourseEntry { course_id: run.key.clone(), body })
    }

    fn removal_entry(&self, course_id: &str) -> Option<CourseEntry> {
        Some(CourseEntry {
            course_id: course_id.to_string(),
            body: json!({
                "courseID": course_id,
                "providerID": self.provider_id,
                "status": "INACTIVE",
            }),
        })
    }

    fn render_page(&self, entries: &[CourseEntry]) -> Result<String> {
        let courses: Vec<&Value> = entries.iter().map(|entry| &entry.body).collect();
        to_json_string(&json!({ "ocnCourses": courses }))
    }
}
