//! Learner completion transmitter
//!
//! Per record: skip in-progress enrollments, skip enrollments already sent
//! without error, otherwise send and persist the outcome.

use std::sync::Arc;

use channelsync_domain::{LearnerDataTransmissionAudit, Result};
use tracing::{debug, info, instrument, warn};

use super::{failure_response, truncate_for_log};
use crate::audit::LearnerAuditRepository;
use crate::channel::{ChannelApiClient, LearnerRecordFormat};
use crate::exporters::LearnerExporter;

/// What happened to a single exported record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LearnerOutcome {
    /// Enrollment has no completion date yet.
    SkippedInProgress,
    /// An error-free audit already exists for the enrollment.
    SkippedAlreadySent,
    /// Remote accepted the completion with a status below 400.
    Sent,
    /// Remote rejected the completion or the send failed.
    Failed,
}

/// Counters for one learner transmission run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LearnerTransmissionReport {
    /// Records accepted by the channel.
    pub sent: usize,
    /// Records rejected or not delivered.
    pub failed: usize,
    /// Records skipped because the learner has not finished.
    pub skipped_in_progress: usize,
    /// Records skipped because an earlier send succeeded.
    pub skipped_already_sent: usize,
}

impl LearnerTransmissionReport {
    fn record(&mut self, outcome: LearnerOutcome) {
        let counter = match outcome {
            LearnerOutcome::SkippedInProgress => &mut self.skipped_in_progress,
            LearnerOutcome::SkippedAlreadySent => &mut self.skipped_already_sent,
            LearnerOutcome::Sent => &mut self.sent,
            LearnerOutcome::Failed => &mut self.failed,
        };
        *counter = counter.saturating_add(1);
    }

    /// Records seen, whatever their outcome.
    pub const fn total(&self) -> usize {
        self.sent + self.failed + self.skipped_in_progress + self.skipped_already_sent
    }
}

/// Sends completion records for one channel and audits every attempt.
pub struct LearnerTransmitter {
    client: Arc<dyn ChannelApiClient>,
    format: Arc<dyn LearnerRecordFormat>,
    audits: Arc<dyn LearnerAuditRepository>,
}

impl LearnerTransmitter {
    pub fn new(
        client: Arc<dyn ChannelApiClient>,
        format: Arc<dyn LearnerRecordFormat>,
        audits: Arc<dyn LearnerAuditRepository>,
    ) -> Self {
        Self { client, format, audits }
    }

    /// Send every exported record in order. Skips never stop the run; audit
    /// store failures do.
    #[instrument(skip_all, fields(channel_code = %exporter.channel_code()))]
    pub async fn transmit(&self, exporter: &LearnerExporter) -> Result<LearnerTransmissionReport> {
        let mut report = LearnerTransmissionReport::default();

        for record in exporter.export() {
            let outcome = self.transmit_record(record).await?;
            report.record(outcome);
        }

        info!(
            sent = report.sent,
            failed = report.failed,
            skipped_in_progress = report.skipped_in_progress,
            skipped_already_sent = report.skipped_already_sent,
            "Learner data transmission finished"
        );
        Ok(report)
    }

    /// Send one record unless it is in progress or already sent. The audit
    /// row is written before the outcome is returned.
    pub async fn transmit_record(
        &self,
        mut record: LearnerDataTransmissionAudit,
    ) -> Result<LearnerOutcome> {
        let enrollment_id = record.enterprise_course_enrollment_id;

        if !record.is_complete() {
            debug!(enrollment_id, "Skipping in-progress enrollment");
            return Ok(LearnerOutcome::SkippedInProgress);
        }

        if self.audits.has_successful_transmission(record.channel_code, enrollment_id).await? {
            debug!(enrollment_id, "Skipping enrollment already transmitted");
            return Ok(LearnerOutcome::SkippedAlreadySent);
        }

        let response = match self.format.completion_payload(&record) {
            Ok(payload) => self
                .client
                .send_completion_status(&record.remote_user_id, &payload)
                .await
                .unwrap_or_else(|err| failure_response(&err)),
            Err(err) => failure_response(&err),
        };

        let (status, body) = response;
        record.record_response(status, &body);
        self.audits.create(&record).await?;

        if record.is_successful() {
            debug!(enrollment_id, status, "Completion status sent");
            Ok(LearnerOutcome::Sent)
        } else {
            warn!(
                enrollment_id,
                status,
                error = %truncate_for_log(&record.error_message),
                "Completion status rejected"
            );
            Ok(LearnerOutcome::Failed)
        }
    }
}
