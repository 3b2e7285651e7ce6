//! Mock clock for deterministic testing
//!
//! ```
//! use channelsync_common::testing::MockClock;
//! use channelsync_common::time::Clock;
//! use chrono::Duration;
//!
//! let clock = MockClock::default();
//! let start = clock.now();
//! clock.advance(Duration::seconds(5));
//! assert_eq!(clock.now() - start, Duration::seconds(5));
//! ```

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use parking_lot::Mutex;

use crate::time::Clock;

/// Clock that only moves when told to. Clones share the same instant.
#[derive(Debug, Clone)]
pub struct MockClock {
    current: Arc<Mutex<DateTime<Utc>>>,
}

impl MockClock {
    /// Create a clock frozen at `start`.
    pub fn at(start: DateTime<Utc>) -> Self {
        Self { current: Arc::new(Mutex::new(start)) }
    }

    /// Move the clock forward (or backward, for negative durations).
    pub fn advance(&self, by: Duration) {
        let mut current = self.current.lock();
        *current += by;
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.current.lock() = instant;
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::at(Utc::now())
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.current.lock()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn clones_share_the_same_instant() {
        let clock = MockClock::at(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let other = clock.clone();
        clock.advance(Duration::minutes(3));
        assert_eq!(other.now(), Utc.with_ymd_and_hms(2024, 1, 1, 0, 3, 0).unwrap());
    }
}
