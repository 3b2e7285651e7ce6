//! In-memory ports and a scripted channel client for unit tests.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use channelsync_domain::{
    CatalogTransmissionAudit, ChannelCode, ChannelConfiguration, ChannelCredentials,
    ChannelSyncError, CourseRun, EnrollmentRecord, EnterpriseCustomer, GlobalChannelConfiguration,
    LearnerDataTransmissionAudit, Result, SapSuccessFactorsCredentials,
};
use chrono::Utc;
use parking_lot::Mutex;
use uuid::Uuid;

use crate::audit::{CatalogAuditRepository, LearnerAuditRepository};
use crate::channel::{
    ChannelApiClient, ChannelBinder, ChannelBinding, SapSuccessFactorsCourseFormat,
    SapSuccessFactorsLearnerFormat,
};
use crate::configuration::{ChannelConfigurationRepository, GlobalConfigurationRepository};
use crate::source::{CourseCatalogSource, EnrollmentSource};

pub fn customer() -> EnterpriseCustomer {
    EnterpriseCustomer {
        uuid: Uuid::from_u128(0x0123_4567_89ab_cdef_0123_4567_89ab_cdef),
        name: "Acme Learning".into(),
    }
}

pub fn sap_configuration(id: i64, active: bool) -> ChannelConfiguration {
    ChannelConfiguration {
        id,
        customer: customer(),
        active,
        credentials: ChannelCredentials::SapSuccessFactors(SapSuccessFactorsCredentials {
            key: "client".into(),
            secret: "secret".into(),
            base_url: "https://sap.example.com".into(),
            company_id: "ACME".into(),
            user_id: "admin".into(),
            user_type: "admin".into(),
        }),
    }
}

pub fn global_configuration(channel_code: ChannelCode) -> GlobalChannelConfiguration {
    GlobalChannelConfiguration {
        id: None,
        channel_code,
        completion_status_api_path: "/completion".into(),
        course_api_path: "/courses".into(),
        oauth_api_path: "/oauth".into(),
        provider_id: "EDX".into(),
        enabled: true,
        change_date: Utc::now(),
    }
}

type Response = Result<(u16, String)>;

/// Channel client that records every call and replays scripted responses,
/// falling back to a default once the script runs out.
pub struct MockChannelClient {
    script: Mutex<VecDeque<Response>>,
    fallback: Mutex<Response>,
    completion_calls: Mutex<Vec<(String, String)>>,
    course_calls: Mutex<Vec<String>>,
}

impl MockChannelClient {
    fn with(script: Vec<Response>, fallback: Response) -> Self {
        Self {
            script: Mutex::new(script.into()),
            fallback: Mutex::new(fallback),
            completion_calls: Mutex::new(Vec::new()),
            course_calls: Mutex::new(Vec::new()),
        }
    }

    pub fn responding(status: u16, body: &str) -> Self {
        Self::with(Vec::new(), Ok((status, body.to_string())))
    }

    pub fn failing(err: ChannelSyncError) -> Self {
        Self::with(Vec::new(), Err(err))
    }

    pub fn scripted(script: Vec<Response>) -> Self {
        Self::with(script, Ok((200, String::new())))
    }

    pub fn respond_with(&self, status: u16, body: &str) {
        *self.fallback.lock() = Ok((status, body.to_string()));
    }

    pub fn completion_calls(&self) -> Vec<(String, String)> {
        self.completion_calls.lock().clone()
    }

    pub fn course_calls(&self) -> Vec<String> {
        self.course_calls.lock().clone()
    }

    fn next_response(&self) -> Response {
        self.script.lock().pop_front().unwrap_or_else(|| self.fallback.lock().clone())
    }
}

#[async_trait]
impl ChannelApiClient for MockChannelClient {
    async fn send_completion_status(&self, remote_user_id: &str, payload: &str) -> Result<(u16, String)> {
        self.completion_calls.lock().push((remote_user_id.to_string(), payload.to_string()));
        self.next_response()
    }

    async fn send_course_import(&self, payload: &str) -> Result<(u16, String)> {
        self.course_calls.lock().push(payload.to_string());
        self.next_response()
    }
}

/// Binds every configuration to the same mock client with SAP formats.
pub struct MockBinder {
    client: Arc<MockChannelClient>,
}

impl MockBinder {
    pub fn new(client: Arc<MockChannelClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChannelBinder for MockBinder {
    async fn bind(
        &self,
        _config: &ChannelConfiguration,
        global: &GlobalChannelConfiguration,
    ) -> Result<ChannelBinding> {
        Ok(ChannelBinding {
            client: self.client.clone(),
            learner_format: Arc::new(SapSuccessFactorsLearnerFormat::new(global.provider_id.clone())),
            course_format: Arc::new(SapSuccessFactorsCourseFormat::new(global.provider_id.clone())),
        })
    }
}

#[derive(Default)]
pub struct InMemoryLearnerAudits {
    rows: Mutex<Vec<LearnerDataTransmissionAudit>>,
}

impl InMemoryLearnerAudits {
    pub fn rows(&self) -> Vec<LearnerDataTransmissionAudit> {
        self.rows.lock().clone()
    }
}

#[async_trait]
impl LearnerAuditRepository for InMemoryLearnerAudits {
    async fn create(&self, record: &LearnerDataTransmissionAudit) -> Result<i64> {
        let mut rows = self.rows.lock();
        let id = i64::try_from(rows.len()).unwrap_or(i64::MAX) + 1;
        rows.push(LearnerDataTransmissionAudit { id: Some(id), ..record.clone() });
        Ok(id)
    }

    async fn has_successful_transmission(&self, channel: ChannelCode, enrollment_id: i64) -> Result<bool> {
        Ok(self.rows.lock().iter().any(|row| {
            row.channel_code == channel
                && row.enterprise_course_enrollment_id == enrollment_id
                && row.error_message.is_empty()
        }))
    }

    async fn list_for_enrollment(
        &self,
        channel: ChannelCode,
        enrollment_id: i64,
    ) -> Result<Vec<LearnerDataTransmissionAudit>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|row| row.channel_code == channel && row.enterprise_course_enrollment_id == enrollment_id)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryCatalogAudits {
    rows: Mutex<Vec<CatalogTransmissionAudit>>,
}

impl InMemoryCatalogAudits {
    pub fn rows(&self) -> Vec<CatalogTransmissionAudit> {
        self.rows.lock().clone()
    }
}

#[async_trait]
impl CatalogAuditRepository for InMemoryCatalogAudits {
    async fn create(&self, audit: &CatalogTransmissionAudit) -> Result<i64> {
        let mut rows = self.rows.lock();
        let id = i64::try_from(rows.len()).unwrap_or(i64::MAX) + 1;
        rows.push(CatalogTransmissionAudit { id: Some(id), ..audit.clone() });
        Ok(id)
    }

    async fn latest_successful(
        &self,
        customer_uuid: Uuid,
        channel: ChannelCode,
    ) -> Result<Option<CatalogTransmissionAudit>> {
        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|row| {
                row.enterprise_customer_uuid == customer_uuid
                    && row.channel_code == channel
                    && row.error_message.is_empty()
            })
            .max_by_key(|row| (row.created, row.id))
            .cloned())
    }
}

#[derive(Default)]
pub struct InMemoryConfigurations {
    rows: Mutex<Vec<ChannelConfiguration>>,
}

impl InMemoryConfigurations {
    pub fn with(rows: Vec<ChannelConfiguration>) -> Self {
        Self { rows: Mutex::new(rows) }
    }
}

#[async_trait]
impl ChannelConfigurationRepository for InMemoryConfigurations {
    async fn save(&self, config: &ChannelConfiguration) -> Result<i64> {
        let mut rows = self.rows.lock();
        rows.retain(|row| row.id != config.id);
        rows.push(config.clone());
        Ok(config.id)
    }

    async fn find(&self, channel: ChannelCode, id: i64) -> Result<Option<ChannelConfiguration>> {
        Ok(self.rows.lock().iter().find(|row| row.id == id && row.channel_code() == channel).cloned())
    }

    async fn list_active(&self) -> Result<Vec<ChannelConfiguration>> {
        Ok(self.rows.lock().iter().filter(|row| row.active).cloned().collect())
    }
}

#[derive(Default)]
pub struct InMemoryGlobalConfigurations {
    rows: Mutex<Vec<GlobalChannelConfiguration>>,
}

impl InMemoryGlobalConfigurations {
    pub fn insert(&self, config: GlobalChannelConfiguration) {
        self.rows.lock().push(config);
    }
}

#[async_trait]
impl GlobalConfigurationRepository for InMemoryGlobalConfigurations {
    async fn save(&self, config: &GlobalChannelConfiguration) -> Result<i64> {
        let mut rows = self.rows.lock();
        rows.push(config.clone());
        Ok(i64::try_from(rows.len()).unwrap_or(i64::MAX))
    }

    async fn current(&self, channel: ChannelCode) -> Result<Option<GlobalChannelConfiguration>> {
        Ok(self.rows.lock().iter().rev().find(|row| row.channel_code == channel).cloned())
    }
}

pub struct StaticSource {
    pub enrollments: Vec<EnrollmentRecord>,
    pub course_runs: Vec<CourseRun>,
}

#[async_trait]
impl EnrollmentSource for StaticSource {
    async fn enrollments(&self, _customer: &EnterpriseCustomer) -> Result<Vec<EnrollmentRecord>> {
        Ok(self.enrollments.clone())
    }
}

#[async_trait]
impl CourseCatalogSource for StaticSource {
    async fn course_runs(&self, _customer: &EnterpriseCustomer) -> Result<Vec<CourseRun>> {
        Ok(self.course_runs.clone())
    }
}
