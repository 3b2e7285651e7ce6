//! Exporters turn source records into channel-ready payloads.
//!
//! Exporters have no side effects; the transmitters own the network and
//! audit writes.

pub mod course;
pub mod learner;

pub use course::{CourseExporter, CoursePage};
pub use learner::LearnerExporter;
