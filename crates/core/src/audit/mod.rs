//! Audit store ports

pub mod ports;

pub use ports::{CatalogAuditRepository, LearnerAuditRepository};
