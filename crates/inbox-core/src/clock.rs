//! Time source for envelope timestamps.

use chrono::{DateTime, SubsecRound, Utc};

/// Supplies `created_at` on insert and `updated_at` on replace.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock, truncated to the microsecond precision of `TIMESTAMPTZ` so a
/// timestamp reads back from PostgreSQL exactly as it was written.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now().trunc_subsecs(6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_has_no_sub_microsecond_part() {
        let now = SystemClock.now();
        assert_eq!(now.timestamp_subsec_nanos() % 1_000, 0);
    }
}
