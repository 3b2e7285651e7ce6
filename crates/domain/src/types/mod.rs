//! Domain types and models

pub mod audit;
pub mod catalog;
pub mod channel;
pub mod enrollment;

pub use audit::{CatalogTransmissionAudit, Grade, LearnerDataTransmissionAudit};
pub use catalog::{CatalogCourseStatus, CatalogEntryState, CatalogSummary};
pub use channel::{
    ChannelCode, ChannelConfiguration, ChannelCredentials, DegreedCredentials,
    EnterpriseCustomer, GlobalChannelConfiguration, SapSuccessFactorsCredentials,
};
pub use enrollment::{CourseRun, EnrollmentRecord, LearnerAccount};
