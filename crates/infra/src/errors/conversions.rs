//! Conversions from external infrastructure errors into domain errors.

use channelsync_domain::ChannelSyncError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub ChannelSyncError);

impl From<InfraError> for ChannelSyncError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ChannelSyncError> for InfraError {
    fn from(value: ChannelSyncError) -> Self {
        Self(value)
    }
}

trait IntoChannelSyncError {
    fn into_channel_sync(self) -> ChannelSyncError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → ChannelSyncError */
/* -------------------------------------------------------------------------- */

impl IntoChannelSyncError for SqlError {
    fn into_channel_sync(self) -> ChannelSyncError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match (err.code, err.extended_code) {
                    (ErrorCode::DatabaseBusy, _) => {
                        ChannelSyncError::Database("database is busy".into())
                    }
                    (ErrorCode::DatabaseLocked, _) => {
                        ChannelSyncError::Database("database is locked".into())
                    }
                    (ErrorCode::ConstraintViolation, 2067) => {
                        ChannelSyncError::Database(format!("unique constraint violation: {message}"))
                    }
                    _ => ChannelSyncError::Database(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => ChannelSyncError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                ChannelSyncError::Database(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, name, ty) => {
                ChannelSyncError::Database(format!("invalid column type for {name}: {ty}"))
            }
            other => ChannelSyncError::Database(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        Self(value.into_channel_sync())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → ChannelSyncError */
/* -------------------------------------------------------------------------- */

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        Self(ChannelSyncError::Database(format!("connection pool error: {value}")))
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ChannelSyncError */
/* -------------------------------------------------------------------------- */

impl IntoChannelSyncError for HttpError {
    fn into_channel_sync(self) -> ChannelSyncError {
        if self.is_timeout() {
            return ChannelSyncError::Network(format!("HTTP request timed out: {self}"));
        }

        if self.is_connect() {
            return ChannelSyncError::Network(format!("HTTP connection failure: {self}"));
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                401 | 403 => ChannelSyncError::Auth(message),
                _ => ChannelSyncError::Network(message),
            };
        }

        if self.is_decode() {
            return ChannelSyncError::Network(format!("failed to decode HTTP response: {self}"));
        }

        ChannelSyncError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        Self(value.into_channel_sync())
    }
}

/// Convert any supported infrastructure error straight into the domain error.
pub(crate) fn to_domain<E>(err: E) -> ChannelSyncError
where
    InfraError: From<E>,
{
    InfraError::from(err).into()
}
