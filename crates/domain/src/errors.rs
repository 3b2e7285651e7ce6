//! Error types used throughout the application

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for ChannelSync
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum ChannelSyncError {
    #[error("Database error: {0}")]
    Database(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication error: {0}")]
    Auth(String),

    /// The OAuth endpoint answered with a non-success status.
    #[error("Remote authentication error: {0}")]
    RemoteAuth(String),

    /// The OAuth endpoint answered 2xx without the expected token fields.
    #[error("Malformed credential response: {0}")]
    MalformedCredentialResponse(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A channel client does not provide the requested operation.
    #[error("Unimplemented: {0}")]
    Unimplemented(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ChannelSyncError {
    /// Message carried by the error, without the category prefix.
    ///
    /// Audit rows store this text as their `error_message`.
    pub fn detail(&self) -> &str {
        match self {
            Self::Database(msg)
            | Self::Config(msg)
            | Self::Network(msg)
            | Self::Auth(msg)
            | Self::RemoteAuth(msg)
            | Self::MalformedCredentialResponse(msg)
            | Self::NotFound(msg)
            | Self::InvalidInput(msg)
            | Self::Unimplemented(msg)
            | Self::Internal(msg) => msg,
        }
    }
}

/// Result type alias for ChannelSync operations
pub type Result<T> = std::result::Result<T, ChannelSyncError>;
