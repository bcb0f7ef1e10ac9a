//! Countdown timer adapter.
//!
//! A [`Countdown`] does not own a clock. The caller delivers [`Tick`]s, one per
//! interval, and the countdown reports when it has run out.
//!
//! ## State Transitions
//!
//! ```text
//! Fresh -> Running <-> Paused
//!             |
//!             v
//!          Expired
//! ```
//!
//! Each countdown gets a process-unique id. Ticks carry the id they were
//! addressed to, so ticks for a countdown that has since been replaced are
//! ignored.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Default tick interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// A single tick addressed to a countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub id: u64,
}

/// What a tick did to the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Wrong id, paused, or already expired.
    Ignored,
    /// Remaining time went down by one interval.
    Ticked,
    /// Remaining time reached zero. Reported once per countdown.
    Expired,
}

#[derive(Debug, Clone)]
pub struct Countdown {
    id: u64,
    duration: Duration,
    interval: Duration,
    remaining: Duration,
    running: bool,
    started: bool,
    expired: bool,
}

impl Countdown {
    pub fn new(duration: Duration, interval: Duration) -> Self {
        Self {
            id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
            duration,
            interval,
            remaining: duration,
            running: false,
            started: false,
            expired: false,
        }
    }

    pub fn from_minutes(minutes: u64, interval: Duration) -> Self {
        Self::new(Duration::from_secs(minutes.saturating_mul(60)), interval)
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }

    pub fn remaining(&self) -> Duration {
        self.remaining
    }

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn expired(&self) -> bool {
        self.expired
    }

    /// The tick that should be delivered next to this countdown.
    pub fn tick(&self) -> Tick {
        Tick { id: self.id }
    }

    /// 0.0 .. 1.0 elapsed fraction.
    pub fn progress(&self) -> f64 {
        if self.duration.is_zero() {
            return 0.0;
        }
        1.0 - self.remaining.as_secs_f64() / self.duration.as_secs_f64()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start counting from the full duration. Returns `false` if this
    /// countdown was already started.
    pub fn start(&mut self) -> bool {
        if self.started {
            return false;
        }
        self.started = true;
        self.running = !self.expired;
        true
    }

    /// Pause if running, resume if paused. Returns the new running state, or
    /// `None` before `start()` or after expiry.
    pub fn toggle(&mut self) -> Option<bool> {
        if !self.started || self.expired {
            return None;
        }
        self.running = !self.running;
        Some(self.running)
    }

    pub fn on_tick(&mut self, tick: Tick) -> TickOutcome {
        if tick.id != self.id || !self.running || self.expired {
            return TickOutcome::Ignored;
        }
        self.remaining = self.remaining.saturating_sub(self.interval);
        if self.remaining.is_zero() {
            self.running = false;
            self.expired = true;
            return TickOutcome::Expired;
        }
        TickOutcome::Ticked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secs(n: u64) -> Countdown {
        Countdown::new(Duration::from_secs(n), DEFAULT_INTERVAL)
    }

    #[test]
    fn ticks_before_start_are_ignored() {
        let mut c = secs(3);
        assert_eq!(c.on_tick(c.tick()), TickOutcome::Ignored);
        assert_eq!(c.remaining(), Duration::from_secs(3));
    }

    #[test]
    fn start_only_once() {
        let mut c = secs(3);
        assert!(c.start());
        assert!(!c.start());
        assert!(c.running());
    }

    #[test]
    fn counts_down_and_expires_once() {
        let mut c = secs(3);
        c.start();
        assert_eq!(c.on_tick(c.tick()), TickOutcome::Ticked);
        assert_eq!(c.on_tick(c.tick()), TickOutcome::Ticked);
        assert_eq!(c.on_tick(c.tick()), TickOutcome::Expired);
        assert!(c.expired());
        assert!(!c.running());
        assert_eq!(c.on_tick(c.tick()), TickOutcome::Ignored);
        assert_eq!(c.remaining(), Duration::ZERO);
    }

    #[test]
    fn toggle_pauses_without_resetting() {
        let mut c = secs(10);
        assert_eq!(c.toggle(), None);
        c.start();
        c.on_tick(c.tick());
        assert_eq!(c.toggle(), Some(false));
        assert_eq!(c.on_tick(c.tick()), TickOutcome::Ignored);
        assert_eq!(c.toggle(), Some(true));
        assert_eq!(c.remaining(), Duration::from_secs(9));
    }

    #[test]
    fn stale_ids_are_ignored() {
        let old = secs(5);
        let mut new = secs(5);
        new.start();
        assert_ne!(old.id(), new.id());
        assert_eq!(new.on_tick(old.tick()), TickOutcome::Ignored);
    }

    #[test]
    fn uneven_interval_saturates_at_zero() {
        let mut c = Countdown::new(Duration::from_millis(1500), DEFAULT_INTERVAL);
        c.start();
        assert_eq!(c.on_tick(c.tick()), TickOutcome::Ticked);
        assert_eq!(c.on_tick(c.tick()), TickOutcome::Expired);
    }

    #[test]
    fn progress_tracks_elapsed_fraction() {
        let mut c = secs(4);
        assert_eq!(c.progress(), 0.0);
        c.start();
        c.on_tick(c.tick());
        assert!((c.progress() - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn from_minutes_converts() {
        let c = Countdown::from_minutes(25, DEFAULT_INTERVAL);
        assert_eq!(c.duration(), Duration::from_secs(25 * 60));
    }
}
