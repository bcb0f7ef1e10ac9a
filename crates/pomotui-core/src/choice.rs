//! Single-select choice lists.
//!
//! A [`ChoiceSet`] is a cursor over a fixed list of string options plus at
//! most one selected option. The state machine keeps one per [`Dimension`].

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result, ValidationError};

/// The four settings a user picks before the first work session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    WorkDuration,
    BreakDuration,
    LongBreakDuration,
    SessionCount,
}

impl Dimension {
    pub const ALL: [Dimension; 4] = [
        Dimension::WorkDuration,
        Dimension::BreakDuration,
        Dimension::LongBreakDuration,
        Dimension::SessionCount,
    ];

    /// Position in [`Dimension::ALL`].
    pub fn index(self) -> usize {
        match self {
            Dimension::WorkDuration => 0,
            Dimension::BreakDuration => 1,
            Dimension::LongBreakDuration => 2,
            Dimension::SessionCount => 3,
        }
    }

    /// Unit suffix used when rendering an option.
    pub fn unit(self) -> &'static str {
        match self {
            Dimension::SessionCount => "sessions",
            _ => "mins",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dimension::WorkDuration => "work duration",
            Dimension::BreakDuration => "break duration",
            Dimension::LongBreakDuration => "long break duration",
            Dimension::SessionCount => "session count",
        };
        f.write_str(name)
    }
}

/// Cursor plus optional single selection over a fixed option list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChoiceSet {
    dimension: Dimension,
    choices: Vec<String>,
    cursor: usize,
    selected: Option<usize>,
}

impl ChoiceSet {
    /// Create a choice set with the cursor on the first option.
    ///
    /// # Errors
    /// Returns an error if `choices` is empty.
    pub fn new<I, S>(dimension: Dimension, choices: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let choices: Vec<String> = choices.into_iter().map(Into::into).collect();
        if choices.is_empty() {
            return Err(ValidationError::EmptyChoices(dimension).into());
        }
        Ok(Self {
            dimension,
            choices,
            cursor: 0,
            selected: None,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn choices(&self) -> &[String] {
        &self.choices
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.map(|i| self.choices[i].as_str())
    }

    pub fn has_selection(&self) -> bool {
        self.selected.is_some()
    }

    pub fn is_selected(&self, index: usize) -> bool {
        self.selected == Some(index)
    }

    /// The selection parsed as a positive integer.
    ///
    /// # Errors
    /// Returns [`CoreError::Invariant`] if nothing is selected or the selected
    /// option is not a positive integer.
    pub fn selected_value(&self) -> Result<u64> {
        let raw = self.selected().unwrap_or_default();
        match raw.trim().parse::<u64>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(CoreError::Invariant {
                dimension: self.dimension,
                value: raw.to_string(),
            }),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn move_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.cursor + 1 < self.choices.len() {
            self.cursor += 1;
        }
    }

    /// Select the option under the cursor, or clear the selection if the
    /// option under the cursor has the same value.
    pub fn toggle_at_cursor(&mut self) {
        self.selected = match self.selected {
            Some(i) if self.choices[i] == self.choices[self.cursor] => None,
            _ => Some(self.cursor),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn durations() -> ChoiceSet {
        ChoiceSet::new(Dimension::BreakDuration, ["1", "5", "7", "10"]).unwrap()
    }

    #[test]
    fn empty_choices_rejected() {
        let result = ChoiceSet::new(Dimension::WorkDuration, Vec::<String>::new());
        assert!(result.is_err());
    }

    #[test]
    fn cursor_clamps_at_both_ends() {
        let mut set = durations();
        set.move_up();
        assert_eq!(set.cursor(), 0);
        for _ in 0..10 {
            set.move_down();
        }
        assert_eq!(set.cursor(), 3);
    }

    #[test]
    fn toggle_selects_switches_and_clears() {
        let mut set = durations();
        set.toggle_at_cursor();
        assert_eq!(set.selected(), Some("1"));

        set.move_down();
        set.toggle_at_cursor();
        assert_eq!(set.selected(), Some("5"));

        set.toggle_at_cursor();
        assert_eq!(set.selected(), None);
        assert!(!set.has_selection());
    }

    #[test]
    fn toggle_is_two_cycle_at_fixed_cursor() {
        let mut set = durations();
        set.move_down();
        set.toggle_at_cursor();
        let first = set.clone();
        set.toggle_at_cursor();
        set.toggle_at_cursor();
        assert_eq!(set, first);
    }

    #[test]
    fn toggle_compares_option_values() {
        let mut set = ChoiceSet::new(Dimension::SessionCount, ["4", "4", "5"]).unwrap();
        set.toggle_at_cursor();
        set.move_down();
        set.toggle_at_cursor();
        assert_eq!(set.selected(), None);

        set.move_down();
        set.toggle_at_cursor();
        assert_eq!(set.selected(), Some("5"));
    }

    #[test]
    fn selected_value_parses_positive_integers() {
        let mut set = durations();
        set.move_down();
        set.toggle_at_cursor();
        assert_eq!(set.selected_value().unwrap(), 5);
    }

    #[test]
    fn selected_value_rejects_garbage_and_zero() {
        let mut set = ChoiceSet::new(Dimension::SessionCount, ["four", "0"]).unwrap();
        set.toggle_at_cursor();
        assert!(matches!(
            set.selected_value(),
            Err(CoreError::Invariant { dimension: Dimension::SessionCount, .. })
        ));
        set.move_down();
        set.toggle_at_cursor();
        assert!(set.selected_value().is_err());
    }

    #[test]
    fn selected_value_without_selection_is_invariant_error() {
        assert!(durations().selected_value().is_err());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Up,
        Down,
        Toggle,
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![Just(Op::Up), Just(Op::Down), Just(Op::Toggle)]
    }

    proptest! {
        #[test]
        fn cursor_and_selection_stay_in_bounds(
            len in 1usize..12,
            ops in proptest::collection::vec(op(), 0..64),
        ) {
            let choices: Vec<String> = (1..=len).map(|n| n.to_string()).collect();
            let mut set = ChoiceSet::new(Dimension::WorkDuration, choices.clone()).unwrap();
            for op in ops {
                match op {
                    Op::Up => set.move_up(),
                    Op::Down => set.move_down(),
                    Op::Toggle => set.toggle_at_cursor(),
                }
                prop_assert!(set.cursor() < len);
                if let Some(selected) = set.selected() {
                    prop_assert!(choices.iter().any(|c| c == selected));
                }
            }
        }
    }
}
