//! # ChannelSync Core
//!
//! Pure business logic layer - no infrastructure dependencies.
//!
//! This crate contains:
//! - Port interfaces for channel clients, audit stores, configuration stores
//!   and data providers
//! - Learner and course exporters
//! - Learner and course transmitters
//! - Per-channel wire formats
//! - The sync service that binds one channel configuration to a pipeline run
//!
//! ## Architecture Principles
//! - Only depends on `channelsync-common` and `channelsync-domain`
//! - No database, HTTP, or platform code
//! - All external dependencies via traits

pub mod audit;
pub mod channel;
pub mod configuration;
pub mod exporters;
pub mod jobs;
pub mod source;
pub mod sync;
pub mod transmitters;

#[cfg(test)]
pub(crate) mod test_support;

// Re-export specific items to avoid ambiguity
pub use audit::ports::{CatalogAuditRepository, LearnerAuditRepository};
pub use channel::ports::{
    ChannelApiClient, ChannelBinder, ChannelBinding, CourseEntry, CourseRecordFormat,
    LearnerRecordFormat,
};
pub use configuration::ports::{ChannelConfigurationRepository, GlobalConfigurationRepository};
pub use exporters::{CourseExporter, CoursePage, LearnerExporter};
pub use jobs::{JobDispatcher, JobKind, SyncJob};
pub use source::ports::{CourseCatalogSource, EnrollmentSource};
pub use sync::{ChannelSyncService, SyncPorts};
pub use transmitters::{
    CourseTransmitter, LearnerOutcome, LearnerTransmissionReport, LearnerTransmitter,
};
