//! Fixed-rate clocks driving the simulation and render cadences.

use std::time::{Duration, Instant};

/// Fires at most once per period and never tries to catch up on missed beats.
#[derive(Clone, Copy, Debug)]
pub(crate) struct FixedClock {
    period: Duration,
    next: Instant,
}

impl FixedClock {
    pub(crate) fn new(hz: u32, start: Instant) -> Self {
        let period = Duration::from_secs(1) / hz.max(1);
        Self {
            period,
            next: start + period,
        }
    }

    /// Time left until the clock is next due.
    pub(crate) fn until_due(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }

    /// Reports whether the clock is due and, if so, schedules the next beat.
    pub(crate) fn is_due(&mut self, now: Instant) -> bool {
        if now < self.next {
            return false;
        }
        self.next += self.period;
        if self.next <= now {
            self.next = now + self.period;
        }
        true
    }
}
