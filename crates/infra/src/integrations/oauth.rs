//! Token endpoint response handling shared by the channel clients

use channelsync_common::AccessToken;
use channelsync_domain::{ChannelSyncError, Result};
use chrono::{DateTime, Utc};
use serde_json::Value;

/// Turn a token endpoint response into an [`AccessToken`].
///
/// Non-2xx responses are `RemoteAuth` errors carrying the status and body. A
/// 2xx body without a string `access_token` and an integer `expires_in` is a
/// `MalformedCredentialResponse`.
pub(crate) fn access_token_from_response(status: u16, body: &str, now: DateTime<Utc>) -> Result<AccessToken> {
    if !(200..300).contains(&status) {
        return Err(ChannelSyncError::RemoteAuth(format!("HTTP {status}: {body}")));
    }

    let data: Value = serde_json::from_str(body).map_err(|e| {
        ChannelSyncError::MalformedCredentialResponse(format!("token response is not JSON: {e}"))
    })?;

    let secret = data.get("access_token").and_then(Value::as_str).ok_or_else(|| {
        ChannelSyncError::MalformedCredentialResponse(format!(
            "token response has no access_token: {data}"
        ))
    })?;

    let expires_in = data.get("expires_in").and_then(expires_in_seconds).ok_or_else(|| {
        ChannelSyncError::MalformedCredentialResponse(format!(
            "token response has no usable expires_in: {data}"
        ))
    })?;

    Ok(AccessToken::expiring_in(secret, now, expires_in))
}

/// Lifetime in seconds; some providers send it as a numeric string.
fn expires_in_seconds(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
