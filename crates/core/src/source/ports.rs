//! Port interfaces for enrollment and catalog data

use async_trait::async_trait;
use channelsync_domain::{CourseRun, EnrollmentRecord, EnterpriseCustomer, Result};

/// Enrollment state for a customer's learners.
#[async_trait]
pub trait EnrollmentSource: Send + Sync {
    async fn enrollments(&self, customer: &EnterpriseCustomer) -> Result<Vec<EnrollmentRecord>>;
}

/// Course runs in a customer's catalog.
#[async_trait]
pub trait CourseCatalogSource: Send + Sync {
    async fn course_runs(&self, customer: &EnterpriseCustomer) -> Result<Vec<CourseRun>>;
}
