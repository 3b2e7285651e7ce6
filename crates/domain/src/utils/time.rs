//! Timestamp helpers shared by exporters and channel formats.

use chrono::{DateTime, Utc};

use crate::constants::{UNIX_MAX_DATE_STRING, UNIX_MIN_DATE_STRING};
use crate::errors::{ChannelSyncError, Result};

fn parse_rfc3339(datestamp: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(datestamp)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| ChannelSyncError::InvalidInput(format!("invalid datetime '{datestamp}': {e}")))
}

/// Convert an RFC 3339 timestamp into epoch milliseconds.
pub fn parse_datetime_to_epoch_millis(datestamp: &str) -> Result<i64> {
    parse_rfc3339(datestamp).map(|dt| dt.timestamp_millis())
}

/// Whether `now` lies on the closed interval `[start, end]`.
///
/// A missing bound is treated as the start of the Unix epoch or the 32-bit
/// epoch limit respectively.
pub fn current_time_is_in_interval(
    start: Option<&str>,
    end: Option<&str>,
    now: DateTime<Utc>,
) -> Result<bool> {
    let interval_start = parse_rfc3339(start.unwrap_or(UNIX_MIN_DATE_STRING))?;
    let interval_end = parse_rfc3339(end.unwrap_or(UNIX_MAX_DATE_STRING))?;
    Ok(interval_start <= now && now <= interval_end)
}
