//! Catalog summary ledger
//!
//! The summary maps course ids to whether they were in the customer's
//! catalog on the last sync. It only accumulates: a course that disappears is
//! carried forward as removed instead of being dropped.

use std::collections::btree_map::Iter;
use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::errors::{ChannelSyncError, Result};
use crate::impl_domain_status_conversions;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CatalogCourseStatus {
    Active,
    Removed,
}

impl_domain_status_conversions!(CatalogCourseStatus {
    Active => "ACTIVE",
    Removed => "REMOVED",
});

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntryState {
    pub in_catalog: bool,
    pub status: CatalogCourseStatus,
}

impl CatalogEntryState {
    pub const ACTIVE: Self = Self { in_catalog: true, status: CatalogCourseStatus::Active };
    pub const REMOVED: Self = Self { in_catalog: false, status: CatalogCourseStatus::Removed };
}

/// `{course_id: {"in_catalog": bool, "status": "ACTIVE" | "REMOVED"}}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CatalogSummary(BTreeMap<String, CatalogEntryState>);

impl CatalogSummary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the next summary from the previous one and the current catalog.
    ///
    /// Every current course is active. Every previously known course missing
    /// from the current catalog is kept and marked removed.
    pub fn resolve<I, S>(previous: &Self, current: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let current: BTreeSet<String> =
            current.into_iter().map(|id| id.as_ref().to_string()).collect();

        let mut next: BTreeMap<String, CatalogEntryState> = previous
            .0
            .keys()
            .filter(|id| !current.contains(*id))
            .map(|id| (id.clone(), CatalogEntryState::REMOVED))
            .collect();

        next.extend(current.into_iter().map(|id| (id, CatalogEntryState::ACTIVE)));
        Self(next)
    }

    /// Courses that were in the catalog last time and are absent now.
    pub fn newly_removed<'a, I, S>(&'a self, current: I) -> Vec<&'a str>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let current: BTreeSet<String> =
            current.into_iter().map(|id| id.as_ref().to_string()).collect();

        self.0
            .iter()
            .filter(|(id, state)| state.in_catalog && !current.contains(*id))
            .map(|(id, _)| id.as_str())
            .collect()
    }

    pub fn insert(&mut self, course_id: impl Into<String>, state: CatalogEntryState) {
        self.0.insert(course_id.into(), state);
    }

    pub fn get(&self, course_id: &str) -> Option<&CatalogEntryState> {
        self.0.get(course_id)
    }

    pub fn contains(&self, course_id: &str) -> bool {
        self.0.contains_key(course_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> Iter<'_, String, CatalogEntryState> {
        self.0.iter()
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| ChannelSyncError::Internal(format!("failed to encode catalog summary: {e}")))
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).map_err(|e| {
            ChannelSyncError::InvalidInput(format!("failed to decode catalog summary: {e}"))
        })
    }
}

impl FromIterator<(String, CatalogEntryState)> for CatalogSummary {
    fn from_iter<T: IntoIterator<Item = (String, CatalogEntryState)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
