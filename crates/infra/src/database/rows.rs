//! Row conversion helpers shared by the SQLite repositories.

use std::str::FromStr;

use channelsync_domain::ChannelSyncError;
use chrono::{DateTime, Utc};
use rusqlite::types::Type;
use rusqlite::Row;
use tokio::task;

pub(crate) fn map_join_error(err: task::JoinError) -> ChannelSyncError {
    if err.is_cancelled() {
        ChannelSyncError::Internal("blocking repository task cancelled".into())
    } else {
        ChannelSyncError::Internal(format!("blocking repository task failed: {err}"))
    }
}

fn conversion_error(idx: usize, ty: Type, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, ty, message.into())
}

/// Read a text column and parse it with `FromStr`.
pub(crate) fn parsed<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let raw: String = row.get(idx)?;
    raw.parse::<T>().map_err(|e| conversion_error(idx, Type::Text, e.to_string()))
}

/// Read an epoch-millisecond column as a UTC timestamp.
pub(crate) fn timestamp(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let millis: i64 = row.get(idx)?;
    DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| conversion_error(idx, Type::Integer, format!("timestamp out of range: {millis}")))
}

/// Read a JSON text column.
pub(crate) fn json<T: serde::de::DeserializeOwned>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    serde_json::from_str(&raw).map_err(|e| conversion_error(idx, Type::Text, e.to_string()))
}

pub(crate) fn usize_to_i64(value: usize) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

pub(crate) fn i64_to_usize(value: i64) -> usize {
    usize::try_from(value).unwrap_or(0)
}
