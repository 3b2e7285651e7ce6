//! Port interfaces for transmission audits

use async_trait::async_trait;
use channelsync_domain::{
    CatalogTransmissionAudit, ChannelCode, LearnerDataTransmissionAudit, Result,
};
use uuid::Uuid;

/// Store of learner completion send attempts.
#[async_trait]
pub trait LearnerAuditRepository: Send + Sync {
    /// Persist one attempt and return its id.
    async fn create(&self, record: &LearnerDataTransmissionAudit) -> Result<i64>;

    /// Whether any attempt for this enrollment on this channel succeeded
    /// (empty error message).
    async fn has_successful_transmission(
        &self,
        channel: ChannelCode,
        enterprise_course_enrollment_id: i64,
    ) -> Result<bool>;

    /// All attempts for an enrollment, oldest first.
    async fn list_for_enrollment(
        &self,
        channel: ChannelCode,
        enterprise_course_enrollment_id: i64,
    ) -> Result<Vec<LearnerDataTransmissionAudit>>;
}

/// Store of catalog sync summaries.
#[async_trait]
pub trait CatalogAuditRepository: Send + Sync {
    async fn create(&self, audit: &CatalogTransmissionAudit) -> Result<i64>;

    /// Most recent audit without errors for the customer on this channel.
    async fn latest_successful(
        &self,
        customer_uuid: Uuid,
        channel: ChannelCode,
    ) -> Result<Option<CatalogTransmissionAudit>>;
}
