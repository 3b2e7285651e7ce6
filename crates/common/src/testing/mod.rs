//! Test helpers shared by the workspace.

pub mod clock;

pub use clock::MockClock;
