//! Application configuration structures
//!
//! Loaded by `channelsync-infra::config::loader` from environment variables or
//! a JSON/TOML file.

use serde::{Deserialize, Serialize};

use crate::constants::{DEGREED_SESSION_TIMEOUT_SECS, SAP_SESSION_TIMEOUT_SECS};

/// Top-level application configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub sources: SourceConfig,
    /// JSON file with global and channel configurations to seed at startup.
    #[serde(default)]
    pub bootstrap_path: Option<String>,
}

/// SQLite audit store settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub path: String,
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

const fn default_pool_size() -> u32 {
    4
}

/// Periodic dispatch of channel sync jobs
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SchedulerConfig {
    pub enabled: bool,
    /// Six-field cron expression (seconds first).
    pub cron_expression: String,
    /// User recorded on every dispatched job.
    pub api_username: String,
    pub job_timeout_seconds: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            cron_expression: "0 0 */6 * * *".into(),
            api_username: "channelsync_worker".into(),
            job_timeout_seconds: 1800,
        }
    }
}

/// Per-channel request timeouts
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HttpConfig {
    pub sap_timeout_seconds: u64,
    pub degreed_timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            sap_timeout_seconds: SAP_SESSION_TIMEOUT_SECS,
            degreed_timeout_seconds: DEGREED_SESSION_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

/// Location of the read-only enrollment and catalog snapshot.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceConfig {
    pub snapshot_path: Option<String>,
}
