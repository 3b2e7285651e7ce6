//! Enrollment and catalog data read from a JSON snapshot file.
//!
//! ```json
//! {
//!   "customers": {
//!     "<customer uuid>": {
//!       "enrollments": [ ... ],
//!       "course_runs": [ ... ]
//!     }
//!   }
//! }
//! ```
//!
//! The file is re-read on every call so a long-running scheduler picks up
//! new exports without a restart.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use channelsync_core::{CourseCatalogSource, EnrollmentSource};
use channelsync_domain::{
    ChannelSyncError, CourseRun, EnrollmentRecord, EnterpriseCustomer, Result,
};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerSnapshot {
    #[serde(default)]
    pub enrollments: Vec<EnrollmentRecord>,
    #[serde(default)]
    pub course_runs: Vec<CourseRun>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub customers: HashMap<Uuid, CustomerSnapshot>,
}

/// Snapshot-file data source; without a path every customer has no data.
#[derive(Debug, Clone, Default)]
pub struct JsonSnapshotSource {
    path: Option<PathBuf>,
}

impl JsonSnapshotSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: Some(path.into()) }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    async fn load(&self) -> Result<Snapshot> {
        let Some(path) = &self.path else {
            return Ok(Snapshot::default());
        };
        read_snapshot(path).await
    }

    async fn customer(&self, customer: &EnterpriseCustomer) -> Result<CustomerSnapshot> {
        let mut snapshot = self.load().await?;
        let data = snapshot.customers.remove(&customer.uuid).unwrap_or_else(|| {
            debug!(customer_uuid = %customer.uuid, "customer not present in snapshot");
            CustomerSnapshot::default()
        });
        Ok(data)
    }
}

async fn read_snapshot(path: &Path) -> Result<Snapshot> {
    let raw = tokio::fs::read_to_string(path).await.map_err(|e| {
        ChannelSyncError::Config(format!("failed to read snapshot {}: {e}", path.display()))
    })?;
    serde_json::from_str(&raw).map_err(|e| {
        ChannelSyncError::InvalidInput(format!("invalid snapshot {}: {e}", path.display()))
    })
}

#[async_trait]
impl EnrollmentSource for JsonSnapshotSource {
    async fn enrollments(&self, customer: &EnterpriseCustomer) -> Result<Vec<EnrollmentRecord>> {
        Ok(self.customer(customer).await?.enrollments)
    }
}

#[async_trait]
impl CourseCatalogSource for JsonSnapshotSource {
    async fn course_runs(&self, customer: &EnterpriseCustomer) -> Result<Vec<CourseRun>> {
        Ok(self.customer(customer).await?.course_runs)
    }
}
