//! Configuration loader
//!
//! Loads application configuration from environment variables or files.
//!
//! ## Loading Strategy
//! 1. First, attempts to load from environment variables
//! 2. If the database path is missing, falls back to loading from file
//! 3. Probes multiple paths for config files
//! 4. Supports JSON and TOML formats
//!
//! ## Environment Variables
//! - `CHANNELSYNC_DB_PATH`: Database file path (required)
//! - `CHANNELSYNC_DB_POOL_SIZE`: Connection pool size
//! - `CHANNELSYNC_SCHEDULER_ENABLED`: Whether periodic dispatch runs (true/false)
//! - `CHANNELSYNC_SCHEDULE_CRON`: Six-field cron expression
//! - `CHANNELSYNC_API_USERNAME`: User recorded on dispatched jobs
//! - `CHANNELSYNC_JOB_TIMEOUT`: Per-job timeout in seconds
//! - `CHANNELSYNC_SAP_TIMEOUT`: SAP SuccessFactors request timeout in seconds
//! - `CHANNELSYNC_DEGREED_TIMEOUT`: Degreed request timeout in seconds
//! - `CHANNELSYNC_LOG_JSON`: Emit JSON log lines (true/false)
//! - `CHANNELSYNC_SNAPSHOT_PATH`: Enrollment and catalog snapshot file
//! - `CHANNELSYNC_BOOTSTRAP_PATH`: Channel configuration seed file
//!
//! ## File Locations
//! The loader probes the following paths (in order):
//! 1. `./config.json` or `./config.toml` (current working directory)
//! 2. `./channelsync.json` or `./channelsync.toml` (current working directory)
//! 3. `../config.json` or `../config.toml` (parent directory)
//! 4. `../../config.json` or `../../config.toml` (grandparent directory)
//! 5. Relative to executable location

use std::path::{Path, PathBuf};
use std::str::FromStr;

use channelsync_domain::{
    AppConfig, ChannelSyncError, DatabaseConfig, HttpConfig, LoggingConfig, Result,
    SchedulerConfig, SourceConfig,
};

/// Load configuration with automatic fallback strategy
///
/// First attempts to load from environment variables. If the required
/// variable is missing, falls back to loading from a config file.
///
/// # Errors
/// Returns `ChannelSyncError::Config` if:
/// - Configuration cannot be loaded from either source
/// - File format is invalid
/// - Required fields are missing
pub fn load() -> Result<AppConfig> {
    match load_from_env() {
        Ok(config) => {
            tracing::info!("Configuration loaded from environment variables");
            Ok(config)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "Failed to load from environment, trying file");
            load_from_file(None)
        }
    }
}

/// Load configuration from environment variables
///
/// Only `CHANNELSYNC_DB_PATH` is required; every other setting falls back
/// to its default when unset.
///
/// # Errors
/// Returns `ChannelSyncError::Config` if the database path is missing or a
/// numeric variable cannot be parsed.
pub fn load_from_env() -> Result<AppConfig> {
    let scheduler_defaults = SchedulerConfig::default();
    let http_defaults = HttpConfig::default();

    let database = DatabaseConfig {
        path: env_var("CHANNELSYNC_DB_PATH")?,
        pool_size: env_parsed("CHANNELSYNC_DB_POOL_SIZE", "pool size")?.unwrap_or(4),
    };

    let scheduler = SchedulerConfig {
        enabled: env_bool("CHANNELSYNC_SCHEDULER_ENABLED", scheduler_defaults.enabled),
        cron_expression: std::env::var("CHANNELSYNC_SCHEDULE_CRON")
            .unwrap_or(scheduler_defaults.cron_expression),
        api_username: std::env::var("CHANNELSYNC_API_USERNAME")
            .unwrap_or(scheduler_defaults.api_username),
        job_timeout_seconds: env_parsed("CHANNELSYNC_JOB_TIMEOUT", "job timeout")?
            .unwrap_or(scheduler_defaults.job_timeout_seconds),
    };

    let http = HttpConfig {
        sap_timeout_seconds: env_parsed("CHANNELSYNC_SAP_TIMEOUT", "SAP timeout")?
            .unwrap_or(http_defaults.sap_timeout_seconds),
        degreed_timeout_seconds: env_parsed("CHANNELSYNC_DEGREED_TIMEOUT", "Degreed timeout")?
            .unwrap_or(http_defaults.degreed_timeout_seconds),
    };

    Ok(AppConfig {
        database,
        scheduler,
        http,
        logging: LoggingConfig { json: env_bool("CHANNELSYNC_LOG_JSON", false) },
        sources: SourceConfig { snapshot_path: std::env::var("CHANNELSYNC_SNAPSHOT_PATH").ok() },
        bootstrap_path: std::env::var("CHANNELSYNC_BOOTSTRAP_PATH").ok(),
    })
}

/// Load configuration from a file
///
/// If `path` is `None`, probes multiple locations for config files.
/// Supports both JSON and TOML formats (detected by file extension).
///
/// # Errors
/// Returns `ChannelSyncError::Config` if:
/// - File not found (when path is specified)
/// - No config file found (when path is `None`)
/// - File format is invalid
/// - Required fields are missing
pub fn load_from_file(path: Option<PathBuf>) -> Result<AppConfig> {
    let config_path = match path {
        Some(p) => {
            if !p.exists() {
                return Err(ChannelSyncError::Config(format!(
                    "Config file not found: {}",
                    p.display()
                )));
            }
            p
        }
        None => probe_config_paths().ok_or_else(|| {
            ChannelSyncError::Config(
                "No config file found in any of the standard locations".to_string(),
            )
        })?,
    };

    tracing::info!(path = %config_path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(&config_path)
        .map_err(|e| ChannelSyncError::Config(format!("Failed to read config file: {e}")))?;

    parse_config(&contents, &config_path)
}

/// Parse configuration from string content, format chosen by extension.
fn parse_config(contents: &str, path: &Path) -> Result<AppConfig> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| ChannelSyncError::Config(format!("Invalid TOML format: {e}"))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| ChannelSyncError::Config(format!("Invalid JSON format: {e}"))),
        _ => Err(ChannelSyncError::Config(format!("Unsupported config format: {extension}"))),
    }
}

/// Probe multiple paths for configuration files
///
/// Searches the working directory, up to two parents, then the directory of
/// the running executable. Returns the first file that exists.
pub fn probe_config_paths() -> Option<PathBuf> {
    let mut candidates = Vec::new();

    if let Ok(cwd) = std::env::current_dir() {
        candidates.extend(candidate_files(&cwd));
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            candidates.extend(candidate_files(exe_dir));
        }
    }

    candidates.into_iter().find(|path| path.exists())
}

fn candidate_files(base: &Path) -> Vec<PathBuf> {
    vec![
        base.join("config.json"),
        base.join("config.toml"),
        base.join("channelsync.json"),
        base.join("channelsync.toml"),
        base.join("../config.json"),
        base.join("../config.toml"),
        base.join("../../config.json"),
        base.join("../../config.toml"),
    ]
}

fn env_var(key: &str) -> Result<String> {
    std::env::var(key).map_err(|_| {
        ChannelSyncError::Config(format!("Missing required environment variable: {key}"))
    })
}

/// Parse an optional numeric variable; unset yields `Ok(None)`.
fn env_parsed<T>(key: &str, label: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|e| ChannelSyncError::Config(format!("Invalid {label}: {e}"))),
        Err(_) => Ok(None),
    }
}

/// Parse boolean from environment variable
///
/// Accepts: `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive)
fn env_bool(key: &str, default: bool) -> bool {
    std::env::var(key)
        .ok()
        .map(|s| matches!(s.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on"))
        .unwrap_or(default)
}
