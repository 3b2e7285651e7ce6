//! Transmitters send exported payloads and record every attempt.

pub mod course;
pub mod learner;

pub use course::CourseTransmitter;
pub use learner::{LearnerOutcome, LearnerTransmissionReport, LearnerTransmitter};

use channelsync_domain::constants::NETWORK_FAILURE_STATUS;
use channelsync_domain::ChannelSyncError;

/// Response recorded when the client fails below HTTP.
pub(crate) fn failure_response(err: &ChannelSyncError) -> (u16, String) {
    (NETWORK_FAILURE_STATUS, err.detail().to_string())
}

/// Shorten remote bodies before they go into log fields.
pub(crate) fn truncate_for_log(text: &str) -> String {
    const MAX_LEN: usize = 256;
    if text.len() <= MAX_LEN {
        return text.to_string();
    }

    let mut truncated = text.chars().take(MAX_LEN.saturating_sub(3)).collect::<String>();
    truncated.push_str("...");
    truncated
}
