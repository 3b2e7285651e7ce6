//! Course metadata exporter
//!
//! Holds the transformed catalog of one customer and hands it out in pages
//! sized for the channel. Deactivation entries for removed courses are queued
//! after the catalog entries so they ship in the same run.

use std::sync::Arc;

use channelsync_common::time::Clock;
use channelsync_domain::{CatalogSummary, CourseRun, Result};
use tracing::{debug, warn};

use crate::channel::{CourseEntry, CourseRecordFormat};

/// One rendered course-import request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoursePage {
    /// Ids of the entries in this page, in payload order.
    pub course_ids: Vec<String>,
    /// Rendered request body.
    pub payload: String,
}

impl CoursePage {
    pub fn len(&self) -> usize {
        self.course_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.course_ids.is_empty()
    }
}

/// Paged course catalog export for one customer and channel.
pub struct CourseExporter {
    format: Arc<dyn CourseRecordFormat>,
    /// Catalog entries first, then any queued removals.
    entries: Vec<CourseEntry>,
    catalog_len: usize,
    /// Ids of runs still in the source that failed to transform.
    rejected: Vec<String>,
    removals_prepared: bool,
}

impl CourseExporter {
    /// Transform every course run. Runs the channel format rejects are
    /// skipped and logged, but still count as present in the catalog.
    pub fn new(format: Arc<dyn CourseRecordFormat>, runs: &[CourseRun], clock: &dyn Clock) -> Self {
        let now = clock.now();
        let mut entries = Vec::with_capacity(runs.len());
        let mut rejected = Vec::new();
        for run in runs {
            match format.course_entry(run, now) {
                Ok(entry) => entries.push(entry),
                Err(err) => {
                    warn!(course_id = %run.key, error = %err, "Skipping course run that could not be exported");
                    rejected.push(run.key.clone());
                }
            }
        }
        let catalog_len = entries.len();

        Self { format, entries, catalog_len, rejected, removals_prepared: false }
    }

    /// Course ids of the current catalog, without removals.
    pub fn courses(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries[..self.catalog_len].iter().map(|entry| entry.course_id.as_str())
    }

    pub const fn course_count(&self) -> usize {
        self.catalog_len
    }

    /// Ids of runs skipped because the channel format rejected them.
    pub fn rejected(&self) -> impl Iterator<Item = &str> + '_ {
        self.rejected.iter().map(String::as_str)
    }

    /// Queue deactivation entries for courses active in `previous` and gone
    /// from the source. Rejected runs are not gone. Returns the number
    /// queued; later calls queue nothing.
    pub fn prepare_removals(&mut self, previous: &CatalogSummary) -> usize {
        if self.removals_prepared {
            return 0;
        }
        self.removals_prepared = true;

        let removals: Vec<CourseEntry> = previous
            .newly_removed(self.courses().chain(self.rejected()))
            .into_iter()
            .filter_map(|course_id| self.format.removal_entry(course_id))
            .collect();

        let queued = removals.len();
        if queued > 0 {
            debug!(queued, "Queued course deactivation entries");
        }
        self.entries.extend(removals);
        queued
    }

    /// Lazily render pages of at most `page_size` entries.
    pub fn export(&self) -> impl Iterator<Item = Result<CoursePage>> + '_ {
        let page_size = self.format.page_size().max(1);
        self.entries.chunks(page_size).map(move |chunk| {
            let payload = self.format.render_page(chunk)?;
            Ok(CoursePage {
                course_ids: chunk.iter().map(|entry| entry.course_id.clone()).collect(),
                payload,
            })
        })
    }

    /// Next catalog ledger: current courses active, previously known ones
    /// that disappeared marked removed. Rejected runs keep their previous
    /// state.
    pub fn resolve_removed_courses(&self, previous: &CatalogSummary) -> CatalogSummary {
        let mut next = CatalogSummary::resolve(previous, self.courses());
        for course_id in self.rejected() {
            if self.courses().any(|exported| exported == course_id) {
                continue;
            }
            if let Some(state) = previous.get(course_id) {
                next.insert(course_id, *state);
            }
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use channelsync_common::testing::MockClock;
    use channelsync_domain::{CatalogEntryState, ChannelSyncError, CourseRun};
    use chrono::{DateTime, Utc};
    use serde_json::json;

    use super::*;

    struct IdsFormat {
        page_size: usize,
        supports_removal: bool,
    }

    impl CourseRecordFormat for IdsFormat {
        fn page_size(&self) -> usize {
            self.page_size
        }

        fn course_entry(&self, run: &CourseRun, _now: DateTime<Utc>) -> Result<CourseEntry> {
            if run.title == "broken" {
                return Err(ChannelSyncError::InvalidInput("broken run".into()));
            }
            Ok(CourseEntry { course_id: run.key.clone(), body: json!(run.key) })
        }

        fn removal_entry(&self, course_id: &str) -> Option<CourseEntry> {
            self.supports_removal
                .then(|| CourseEntry { course_id: course_id.into(), body: json!(format!("-{course_id}")) })
        }

        fn render_page(&self, entries: &[CourseEntry]) -> Result<String> {
            let bodies: Vec<_> = entries.iter().map(|e| &e.body).collect();
            Ok(serde_json::to_string(&bodies).unwrap())
        }
    }

    fn runs(keys: &[&str]) -> Vec<CourseRun> {
        keys.iter()
            .map(|key| CourseRun { key: (*key).into(), title: (*key).into(), ..CourseRun::default() })
            .collect()
    }

    fn exporter(keys: &[&str], page_size: usize, supports_removal: bool) -> CourseExporter {
        CourseExporter::new(
            Arc::new(IdsFormat { page_size, supports_removal }),
            &runs(keys),
            &MockClock::default(),
        )
    }

    #[test]
    fn pages_are_bounded_by_page_size() {
        let exporter = exporter(&["A", "B", "C"], 2, false);

        let pages: Vec<_> = exporter.export().map(|page| page.unwrap()).collect();

        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].course_ids, vec!["A", "B"]);
        assert_eq!(pages[0].payload, r#"["A","B"]"#);
        assert_eq!(pages[1].course_ids, vec!["C"]);
    }

    #[test]
    fn empty_catalog_yields_no_pages() {
        let exporter = exporter(&[], 10, false);
        assert_eq!(exporter.export().count(), 0);
    }

    #[test]
    fn failed_transforms_are_skipped() {
        let mut catalog = runs(&["A"]);
        catalog.push(CourseRun { key: "X".into(), title: "broken".into(), ..CourseRun::default() });

        let exporter = CourseExporter::new(
            Arc::new(IdsFormat { page_size: 10, supports_removal: false }),
            &catalog,
            &MockClock::default(),
        );

        assert_eq!(exporter.courses().collect::<Vec<_>>(), vec!["A"]);
        assert_eq!(exporter.rejected().collect::<Vec<_>>(), vec!["X"]);
    }

    #[test]
    fn rejected_runs_are_not_deactivated() {
        let mut previous = CatalogSummary::new();
        previous.insert("A", CatalogEntryState::ACTIVE);
        previous.insert("B", CatalogEntryState::ACTIVE);
        previous.insert("OLD", CatalogEntryState::ACTIVE);

        let mut catalog = runs(&["A"]);
        catalog.push(CourseRun { key: "B".into(), title: "broken".into(), ..CourseRun::default() });
        let mut exporter = CourseExporter::new(
            Arc::new(IdsFormat { page_size: 10, supports_removal: true }),
            &catalog,
            &MockClock::default(),
        );

        assert_eq!(exporter.prepare_removals(&previous), 1);
        let pages: Vec<_> = exporter.export().map(|page| page.unwrap()).collect();
        assert_eq!(pages[0].course_ids, vec!["A", "OLD"]);

        let summary = exporter.resolve_removed_courses(&previous);
        assert_eq!(summary.get("B"), Some(&CatalogEntryState::ACTIVE));
        assert_eq!(summary.get("OLD"), Some(&CatalogEntryState::REMOVED));
        assert_eq!(exporter.course_count(), 1);
    }

    #[test]
    fn rejected_runs_never_seen_stay_out_of_summary() {
        let mut catalog = runs(&["A"]);
        catalog.push(CourseRun { key: "NEW".into(), title: "broken".into(), ..CourseRun::default() });
        let exporter = CourseExporter::new(
            Arc::new(IdsFormat { page_size: 10, supports_removal: true }),
            &catalog,
            &MockClock::default(),
        );

        let summary = exporter.resolve_removed_courses(&CatalogSummary::new());
        assert!(!summary.contains("NEW"));
        assert_eq!(summary.len(), 1);
    }

    #[test]
    fn removals_are_queued_once_after_catalog() {
        let mut previous = CatalogSummary::new();
        previous.insert("A", CatalogEntryState::ACTIVE);
        previous.insert("OLD", CatalogEntryState::ACTIVE);
        previous.insert("GONE", CatalogEntryState::REMOVED);

        let mut exporter = exporter(&["A"], 10, true);

        assert_eq!(exporter.prepare_removals(&previous), 1);
        assert_eq!(exporter.prepare_removals(&previous), 0);

        let pages: Vec<_> = exporter.export().map(|page| page.unwrap()).collect();
        assert_eq!(pages[0].course_ids, vec!["A", "OLD"]);
        assert_eq!(exporter.course_count(), 1);
    }

    #[test]
    fn channels_without_deactivation_queue_nothing() {
        let mut previous = CatalogSummary::new();
        previous.insert("OLD", CatalogEntryState::ACTIVE);

        let mut exporter = exporter(&["A"], 10, false);

        assert_eq!(exporter.prepare_removals(&previous), 0);
    }

    #[test]
    fn resolved_summary_keeps_removed_courses() {
        let mut previous = CatalogSummary::new();
        previous.insert("A", CatalogEntryState::ACTIVE);
        previous.insert("B", CatalogEntryState::ACTIVE);

        let summary = exporter(&["A", "C"], 10, false).resolve_removed_courses(&previous);

        assert_eq!(summary.get("A"), Some(&CatalogEntryState::ACTIVE));
        assert_eq!(summary.get("B"), Some(&CatalogEntryState::REMOVED));
        assert_eq!(summary.get("C"), Some(&CatalogEntryState::ACTIVE));
    }
}
