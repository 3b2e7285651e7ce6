//! Channel abstraction: client port, wire formats and per-channel bindings.

pub mod degreed;
pub mod ports;
pub mod sap_success_factors;

pub use degreed::{DegreedCourseFormat, DegreedLearnerFormat};
pub use ports::{
    ChannelApiClient, ChannelBinder, ChannelBinding, CourseEntry, CourseRecordFormat,
    LearnerRecordFormat,
};
pub use sap_success_factors::{SapSuccessFactorsCourseFormat, SapSuccessFactorsLearnerFormat};
