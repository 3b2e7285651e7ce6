//! Enrollment and catalog data providers

mod json_snapshot;

pub use json_snapshot::{CustomerSnapshot, JsonSnapshotSource, Snapshot};
