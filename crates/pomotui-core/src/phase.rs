use std::fmt;

use serde::{Deserialize, Serialize};

use crate::choice::Dimension;

/// One step of the session lifecycle. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    ChooseWorkDuration,
    ChooseBreakDuration,
    ChooseLongBreakDuration,
    ChooseSessionCount,
    Working,
    Break,
    LongBreak,
}

impl Phase {
    /// The setting picked in this phase, for the four setup phases.
    pub fn dimension(self) -> Option<Dimension> {
        match self {
            Phase::ChooseWorkDuration => Some(Dimension::WorkDuration),
            Phase::ChooseBreakDuration => Some(Dimension::BreakDuration),
            Phase::ChooseLongBreakDuration => Some(Dimension::LongBreakDuration),
            Phase::ChooseSessionCount => Some(Dimension::SessionCount),
            _ => None,
        }
    }

    pub fn is_choosing(self) -> bool {
        self.dimension().is_some()
    }

    pub fn is_timer(self) -> bool {
        !self.is_choosing()
    }

    /// The setting whose selection sets this phase's countdown length.
    pub fn duration_dimension(self) -> Option<Dimension> {
        match self {
            Phase::Working => Some(Dimension::WorkDuration),
            Phase::Break => Some(Dimension::BreakDuration),
            Phase::LongBreak => Some(Dimension::LongBreakDuration),
            _ => None,
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Phase::ChooseWorkDuration => "Work Duration:",
            Phase::ChooseBreakDuration => "Break Duration:",
            Phase::ChooseLongBreakDuration => "Long Break Duration:",
            Phase::ChooseSessionCount => "Session Count:",
            Phase::Working => "Work",
            Phase::Break => "Break",
            Phase::LongBreak => "Long Break",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::ChooseWorkDuration => "choose_work_duration",
            Phase::ChooseBreakDuration => "choose_break_duration",
            Phase::ChooseLongBreakDuration => "choose_long_break_duration",
            Phase::ChooseSessionCount => "choose_session_count",
            Phase::Working => "working",
            Phase::Break => "break",
            Phase::LongBreak => "long_break",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn setup_and_timer_phases_partition() {
        let all = [
            Phase::ChooseWorkDuration,
            Phase::ChooseBreakDuration,
            Phase::ChooseLongBreakDuration,
            Phase::ChooseSessionCount,
            Phase::Working,
            Phase::Break,
            Phase::LongBreak,
        ];
        assert_eq!(all.iter().filter(|p| p.is_choosing()).count(), 4);
        for phase in all {
            assert_ne!(phase.is_choosing(), phase.is_timer());
            assert_eq!(phase.duration_dimension().is_some(), phase.is_timer());
        }
    }
}
