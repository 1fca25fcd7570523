//! Wall-clock sources.
//!
//! Everything time-dependent reads the current instant through [`Clock`] so
//! tests can drive time without sleeping (see
//! [`ManualScheduler`](crate::scheduler::ManualScheduler)).

use chrono::Utc;

/// Source of the current instant, in milliseconds since the Unix epoch.
pub trait Clock {
    fn now_ms(&self) -> i64;
}

/// The host's wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        Utc::now().timestamp_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_clock_is_after_2020() {
        // 2020-01-01T00:00:00Z
        assert!(SystemClock.now_ms() > 1_577_836_800_000);
    }

    #[test]
    fn system_clock_does_not_go_backwards() {
        let first = SystemClock.now_ms();
        assert!(SystemClock.now_ms() >= first);
    }
}
