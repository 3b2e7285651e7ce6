//! SQLite persistence for configurations and transmission audits

pub mod audit_repository;
pub mod configuration_repository;
pub mod manager;
mod rows;

pub use audit_repository::{SqliteCatalogAuditRepository, SqliteLearnerAuditRepository};
pub use configuration_repository::{
    SqliteChannelConfigurationRepository, SqliteGlobalConfigurationRepository,
};
pub use manager::{DbManager, SqliteConnection};
