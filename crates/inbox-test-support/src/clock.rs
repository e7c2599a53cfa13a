//! Deterministic `Clock` for asserting envelope timestamps.

use chrono::{DateTime, Duration, Utc};
use inbox_core::clock::Clock;

/// A clock stuck at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// Returns a clock `elapsed` after this one, e.g. for stamping a replace
    /// that happens after the insert.
    #[must_use]
    pub fn advanced(self, elapsed: Duration) -> Self {
        Self(self.0 + elapsed)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
