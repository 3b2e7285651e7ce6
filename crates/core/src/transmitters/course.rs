//! Course metadata transmitter

use std::sync::Arc;

use channelsync_common::time::Clock;
use channelsync_domain::constants::AGGREGATE_SEPARATOR;
use channelsync_domain::{CatalogSummary, CatalogTransmissionAudit, ChannelConfiguration, Result};
use tracing::{info, instrument, warn};

use super::{failure_response, truncate_for_log};
use crate::audit::CatalogAuditRepository;
use crate::channel::ChannelApiClient;
use crate::exporters::CourseExporter;

pub struct CourseTransmitter {
    client: Arc<dyn ChannelApiClient>,
    audits: Arc<dyn CatalogAuditRepository>,
    clock: Arc<dyn Clock>,
}

impl CourseTransmitter {
    pub fn new(
        client: Arc<dyn ChannelApiClient>,
        audits: Arc<dyn CatalogAuditRepository>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { client, audits, clock }
    }

    /// Send every page of the exporter and persist one catalog audit.
    ///
    /// A failed page never stops later pages. The stored summary is resolved
    /// against the last error-free audit for the same customer and channel.
    #[instrument(skip_all, fields(channel_code = %config.channel_code(), channel_id = config.id))]
    pub async fn transmit(
        &self,
        config: &ChannelConfiguration,
        exporter: &mut CourseExporter,
    ) -> Result<CatalogTransmissionAudit> {
        let channel_code = config.channel_code();
        let previous =
            previous_summary(self.audits.latest_successful(config.customer.uuid, channel_code).await?);

        exporter.prepare_removals(&previous);

        let mut statuses: Vec<String> = Vec::new();
        let mut errors: Vec<String> = Vec::new();
        let mut total_transmitted = 0_usize;

        for page in exporter.export() {
            let (status, body, page_len) = match page {
                Ok(page) => {
                    let (status, body) = self
                        .client
                        .send_course_import(&page.payload)
                        .await
                        .unwrap_or_else(|err| failure_response(&err));
                    (status, body, page.len())
                }
                Err(err) => {
                    let (status, body) = failure_response(&err);
                    (status, body, 0)
                }
            };

            statuses.push(status.to_string());
            if status >= 400 {
                warn!(status, body = %truncate_for_log(&body), "Course import page rejected");
                if !body.is_empty() {
                    errors.push(body);
                }
            } else {
                total_transmitted += page_len;
            }
        }

        let audit = CatalogTransmissionAudit {
            id: None,
            enterprise_customer_uuid: config.customer.uuid,
            channel_code,
            total_courses: exporter.course_count(),
            status: statuses.join(AGGREGATE_SEPARATOR),
            error_message: errors.join(AGGREGATE_SEPARATOR),
            audit_summary: exporter.resolve_removed_courses(&previous),
            created: self.clock.now(),
        };
        let audit_id = self.audits.create(&audit).await?;

        info!(
            audit_id,
            total_courses = audit.total_courses,
            total_transmitted,
            status = %audit.status,
            "Course metadata transmission finished"
        );
        Ok(CatalogTransmissionAudit { id: Some(audit_id), ..audit })
    }
}

/// Summary carried by the audit, or an empty ledger for first runs.
fn previous_summary(audit: Option<CatalogTransmissionAudit>) -> CatalogSummary {
    audit.map(|audit| audit.audit_summary).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use channelsync_common::testing::MockClock;
    use channelsync_domain::{CatalogEntryState, ChannelCode, ChannelSyncError, CourseRun};
    use chrono::Utc;

    use super::*;
    use crate::channel::SapSuccessFactorsCourseFormat;
    use crate::test_support::{sap_configuration, InMemoryCatalogAudits, MockChannelClient};

    fn runs(keys: &[&str]) -> Vec<CourseRun> {
        keys.iter()
            .map(|key| CourseRun { key: (*key).into(), title: (*key).into(), ..CourseRun::default() })
            .collect()
    }

    fn exporter(keys: &[&str], page_size: usize) -> CourseExporter {
        CourseExporter::new(
            Arc::new(SapSuccessFactorsCourseFormat::new("EDX").with_page_size(page_size)),
            &runs(keys),
            &MockClock::default(),
        )
    }

    fn transmitter(client: &Arc<MockChannelClient>, audits: &Arc<InMemoryCatalogAudits>) -> CourseTransmitter {
        CourseTransmitter::new(client.clone(), audits.clone(), Arc::new(MockClock::default()))
    }

    #[tokio::test]
    async fn each_page_status_is_joined() {
        let client = Arc::new(MockChannelClient::responding(200, "{}"));
        let audits = Arc::new(InMemoryCatalogAudits::default());
        let config = sap_configuration(1, true);

        let audit = transmitter(&client, &audits)
            .transmit(&config, &mut exporter(&["A", "B"], 1))
            .await
            .unwrap();

        assert_eq!(client.course_calls().len(), 2);
        assert_eq!(audit.status, "200, 200");
        assert_eq!(audit.error_message, "");
        assert_eq!(audit.total_courses, 2);
        assert_eq!(audit.audit_summary.get("A"), Some(&CatalogEntryState::ACTIVE));
        assert_eq!(audit.audit_summary.get("B"), Some(&CatalogEntryState::ACTIVE));
        assert_eq!(audits.rows().len(), 1);
    }

    #[tokio::test]
    async fn failed_pages_do_not_stop_later_pages() {
        let client = Arc::new(MockChannelClient::scripted(vec![
            Err(ChannelSyncError::Network("timeout".into())),
            Ok((400, "bad course".into())),
            Ok((200, String::new())),
        ]));
        let audits = Arc::new(InMemoryCatalogAudits::default());

        let audit = transmitter(&client, &audits)
            .transmit(&sap_configuration(1, true), &mut exporter(&["A", "B", "C"], 1))
            .await
            .unwrap();

        assert_eq!(audit.status, "500, 400, 200");
        assert_eq!(audit.error_message, "timeout, bad course");
    }

    #[tokio::test]
    async fn removed_courses_are_deactivated_and_kept_in_summary() {
        let client = Arc::new(MockChannelClient::responding(200, "{}"));
        let audits = Arc::new(InMemoryCatalogAudits::default());
        let config = sap_configuration(1, true);
        let transmitter = transmitter(&client, &audits);

        transmitter.transmit(&config, &mut exporter(&["A", "B"], 10)).await.unwrap();
        let audit = transmitter.transmit(&config, &mut exporter(&["A"], 10)).await.unwrap();

        let second_payload = &client.course_calls()[1];
        assert!(second_payload.contains(r#""status":"INACTIVE""#));
        assert_eq!(audit.total_courses, 1);
        assert_eq!(audit.audit_summary.get("B"), Some(&CatalogEntryState::REMOVED));

        // A course already marked removed is not deactivated again.
        transmitter.transmit(&config, &mut exporter(&["A"], 10)).await.unwrap();
        assert!(!client.course_calls()[2].contains("INACTIVE"));
        assert_eq!(audits.rows().len(), 3);
    }

    #[tokio::test]
    async fn course_with_bad_metadata_is_not_deactivated() {
        let client = Arc::new(MockChannelClient::responding(200, "{}"));
        let audits = Arc::new(InMemoryCatalogAudits::default());
        let config = sap_configuration(1, true);
        let transmitter = transmitter(&client, &audits);

        transmitter.transmit(&config, &mut exporter(&["A", "B"], 10)).await.unwrap();

        let mut catalog = runs(&["A"]);
        catalog.push(CourseRun { key: "B".into(), start: Some("tbd".into()), ..CourseRun::default() });
        let mut second = CourseExporter::new(
            Arc::new(SapSuccessFactorsCourseFormat::new("EDX")),
            &catalog,
            &MockClock::default(),
        );
        let audit = transmitter.transmit(&config, &mut second).await.unwrap();

        assert!(!client.course_calls()[1].contains("INACTIVE"));
        assert_eq!(audit.total_courses, 1);
        assert_eq!(audit.audit_summary.get("B"), Some(&CatalogEntryState::ACTIVE));
    }

    #[tokio::test]
    async fn failed_audits_are_not_used_as_previous_summary() {
        let audits = Arc::new(InMemoryCatalogAudits::default());
        let config = sap_configuration(1, true);
        let mut stale = CatalogSummary::new();
        stale.insert("X", CatalogEntryState::ACTIVE);
        audits
            .create(&CatalogTransmissionAudit {
                id: None,
                enterprise_customer_uuid: config.customer.uuid,
                channel_code: ChannelCode::SapSuccessFactors,
                total_courses: 1,
                status: "500".into(),
                error_message: "down".into(),
                audit_summary: stale,
                created: Utc::now(),
            })
            .await
            .unwrap();
        let client = Arc::new(MockChannelClient::responding(200, "{}"));

        let audit = transmitter(&client, &audits).transmit(&config, &mut exporter(&["A"], 10)).await.unwrap();

        assert!(!audit.audit_summary.contains("X"));
    }

    #[test]
    fn missing_previous_audit_is_empty_summary() {
        assert!(previous_summary(None).is_empty());
    }
}
