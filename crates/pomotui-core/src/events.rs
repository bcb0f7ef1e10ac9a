use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::phase::Phase;

/// Inputs recognized by the state machine. Key bindings live outside the core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Input {
    Up,
    Down,
    Enter,
    Confirm,
    StartStop,
    Reset,
    Quit,
}

/// Every state change produces an Event. The CLI logs them; tests assert on
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    PhaseChanged {
        from: Phase,
        to: Phase,
        current_session: u64,
    },
    TimerStarted {
        phase: Phase,
        duration_secs: u64,
    },
    TimerPaused {
        phase: Phase,
        remaining_secs: u64,
    },
    TimerResumed {
        phase: Phase,
        remaining_secs: u64,
    },
    TimerReset {
        phase: Phase,
        duration_secs: u64,
    },
    TimerExpired {
        phase: Phase,
    },
    /// A work session finished and the daily count was bumped.
    SessionCompleted {
        date: NaiveDate,
        total_today: u64,
        persisted: bool,
    },
    Quit,
}
