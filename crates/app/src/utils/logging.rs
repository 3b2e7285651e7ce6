//! Tracing subscriber setup and error labels

use channelsync_domain::{ChannelSyncError, LoggingConfig, Result};
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber. `RUST_LOG` overrides the default `info`
/// filter; `json` switches to one JSON object per line.
pub fn init_tracing(config: &LoggingConfig) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(true);

    let installed = if config.json {
        builder.json().with_current_span(true).try_init()
    } else {
        builder.try_init()
    };

    installed.map_err(|e| ChannelSyncError::Config(format!("failed to install tracing subscriber: {e}")))
}

/// Convert a `ChannelSyncError` into a stable label suitable for logging.
#[inline]
pub const fn error_label(error: &ChannelSyncError) -> &'static str {
    match error {
        ChannelSyncError::Database(_) => "database",
        ChannelSyncError::Config(_) => "config",
        ChannelSyncError::Network(_) => "network",
        ChannelSyncError::Auth(_) => "auth",
        ChannelSyncError::RemoteAuth(_) => "remote_auth",
        ChannelSyncError::MalformedCredentialResponse(_) => "malformed_credential_response",
        ChannelSyncError::NotFound(_) => "not_found",
        ChannelSyncError::InvalidInput(_) => "invalid_input",
        ChannelSyncError::Unimplemented(_) => "unimplemented",
        ChannelSyncError::Internal(_) => "internal",
    }
}
