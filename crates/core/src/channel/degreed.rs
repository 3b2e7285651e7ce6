//! Degreed wire formats

use channelsync_domain::constants::DEGREED_COURSE_PAGE_SIZE;
use channelsync_domain::{CourseRun, LearnerDataTransmissionAudit, Result};
use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use super::ports::{CourseEntry, CourseRecordFormat, LearnerRecordFormat};
use super::sap_success_factors::{completion_fields, to_json_string};

/// Completion format; each record is wrapped in an `orgCode` envelope.
#[derive(Debug, Clone)]
pub struct DegreedLearnerFormat {
    company_id: String,
    provider_id: String,
}

impl DegreedLearnerFormat {
    pub fn new(company_id: impl Into<String>, provider_id: impl Into<String>) -> Self {
        Self { company_id: company_id.into(), provider_id: provider_id.into() }
    }

    /// Degreed expects completion dates as `yyyy-mm-dd`.
    fn completion_date(epoch_millis: Option<i64>) -> Value {
        epoch_millis
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .map_or(Value::Null, |dt| json!(dt.format("%Y-%m-%d").to_string()))
    }
}

impl LearnerRecordFormat for DegreedLearnerFormat {
    fn completion_payload(&self, record: &LearnerDataTransmissionAudit) -> Result<String> {
        let fields = completion_fields(
            record,
            &self.provider_id,
            Self::completion_date(record.completed_timestamp),
        );
        to_json_string(&json!({
            "orgCode": self.company_id,
            "completions": [fields],
        }))
    }
}

#[derive(Debug, Clone)]
pub struct DegreedCourseFormat {
    company_id: String,
    provider_id: String,
    page_size: usize,
}

impl DegreedCourseFormat {
    pub fn new(company_id: impl Into<String>, provider_id: impl Into<String>) -> Self {
        Self {
            company_id: company_id.into(),
            provider_id: provider_id.into(),
            page_size: DEGREED_COURSE_PAGE_SIZE,
        }
    }

    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }
}

impl CourseRecordFormat for DegreedCourseFormat {
    fn page_size(&self) -> usize {
        self.page_size
    }

    fn course_entry(&self, run: &CourseRun, _now: DateTime<Utc>) -> Result<CourseEntry> {
        let body = json!({
            "contentId": run.key,
            "title": run.title,
            "summary": run.description(),
            "url": run.marketing_url.clone().unwrap_or_default(),
            "imageUrl": run.image_url.clone().unwrap_or_default(),
            "format": "Course",
            "language": run.content_language.clone().unwrap_or_default(),
            "institution": run.organization.clone().unwrap_or_default(),
        });
        Ok(CourseEntry { course_id: run.key.clone(), body })
    }

    fn render_page(&self, entries: &[CourseEntry]) -> Result<String> {
        let courses: Vec<&Value> = entries.iter().map(|entry| &entry.body).collect();
        to_json_string(&json!({
            "orgCode": self.company_id,
            "providerCode": self.provider_id,
            "courses": courses,
        }))
    }
}

#[cfg(test)]
mod tests {
    use channelsync_domain::{ChannelCode, Grade};

    use super::*;

    #[test]
    fn completion_is_wrapped_with_org_code() {
        let record = LearnerDataTransmissionAudit {
            id: None,
            channel_code: ChannelCode::Degreed,
            enterprise_course_enrollment_id: 1,
            remote_user_id: "learner@example.com".into(),
            course_id: "C1".into(),
            course_completed: false,
            // 2017-02-05T08:00:00Z
            completed_timestamp: Some(1_486_281_600_000),
            grade: Grade::Fail,
            instructor_name: "Ada".into(),
            status: String::new(),
            error_message: String::new(),
            created: Utc::now(),
        };

        let payload = DegreedLearnerFormat::new("ORG", "EDX").completion_payload(&record).unwrap();
        let value: Value = serde_json::from_str(&payload).unwrap();

        assert_eq!(value["orgCode"], "ORG");
        let completion = &value["completions"][0];
        assert_eq!(completion["completedTimestamp"], "2017-02-05");
        assert_eq!(completion["courseCompleted"], "false");
        assert_eq!(completion["grade"], "Fail");
        assert_eq!(completion["providerID"], "EDX");
        assert_eq!(completion["userID"], "learner@example.com");
    }

    #[test]
    fn course_page_has_provider_envelope() {
        let format = DegreedCourseFormat::new("ORG", "EDX");
        let run = CourseRun {
            key: "C1".into(),
            title: "Intro".into(),
            full_description: Some("Long".into()),
            content_language: Some("en".into()),
            ..CourseRun::default()
        };

        let entry = format.course_entry(&run, Utc::now()).unwrap();
        let page: Value = serde_json::from_str(&format.render_page(&[entry]).unwrap()).unwrap();

        assert_eq!(page["providerCode"], "EDX");
        assert_eq!(page["courses"][0]["contentId"], "C1");
        assert_eq!(page["courses"][0]["summary"], "Long");
        assert_eq!(page["courses"][0]["format"], "Course");
        assert!(format.removal_entry("C1").is_none());
    }
}
