//! Read-only data provider ports

pub mod ports;

pub use ports::{CourseCatalogSource, EnrollmentSource};
