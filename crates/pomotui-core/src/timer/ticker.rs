//! Wall-clock tick source.
//!
//! The ticker holds the deadline of the next tick. The event loop asks it how
//! long it may block waiting for input, then asks how many ticks fell due.
//! It takes `Instant`s as arguments so tests can drive it without sleeping.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct Ticker {
    interval: Duration,
    next: Instant,
}

impl Ticker {
    pub fn new(interval: Duration, now: Instant) -> Self {
        Self {
            interval,
            next: now + interval,
        }
    }

    /// Restart the interval, e.g. when a countdown is started or resumed.
    pub fn restart(&mut self, now: Instant) {
        self.next = now + self.interval;
    }

    /// How long until the next tick is due.
    pub fn timeout(&self, now: Instant) -> Duration {
        self.next.saturating_duration_since(now)
    }

    /// Number of ticks due at `now`. Advances the deadline past `now`.
    pub fn due(&mut self, now: Instant) -> u32 {
        if self.interval.is_zero() {
            return 0;
        }
        let mut count = 0;
        while self.next <= now {
            self.next += self.interval;
            count += 1;
        }
        count
    }
}
