//! Phase state machine.
//!
//! Owns the four choice sets, the session counter and the active countdown,
//! and moves between phases on inputs and countdown expiry.
//!
//! ## Phases
//!
//! ```text
//! ChooseWorkDuration -> ChooseBreakDuration -> ChooseLongBreakDuration
//!     -> ChooseSessionCount -> Working <-> Break
//!                                 ^  \
//!                                 |   v (last session of the cycle)
//!                                 LongBreak
//! ```
//!
//! Messages are handled one at a time; `handle` returns the events the
//! message produced. The daily count is written before `handle` returns.
//!
//! ## Usage
//!
//! ```ignore
//! let mut machine = PhaseMachine::from_config(&config, store)?;
//! machine.handle(Msg::Input(Input::Enter))?;
//! // In a loop, once per interval:
//! if let Some(tick) = machine.pending_tick() {
//!     machine.handle(Msg::Tick(tick))?;
//! }
//! ```

use std::time::Duration;

use chrono::{Local, NaiveDate};

use crate::choice::{ChoiceSet, Dimension};
use crate::controls::{Control, Controls};
use crate::error::Result;
use crate::events::{Event, Input};
use crate::phase::Phase;
use crate::session::SessionCounter;
use crate::storage::{ByteStore, Config};
use crate::timer::{Countdown, Tick, TickOutcome};

/// A message for the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Msg {
    Input(Input),
    Tick(Tick),
}

impl From<Input> for Msg {
    fn from(input: Input) -> Self {
        Msg::Input(input)
    }
}

impl From<Tick> for Msg {
    fn from(tick: Tick) -> Self {
        Msg::Tick(tick)
    }
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

pub struct PhaseMachine<S> {
    phase: Phase,
    choices: [ChoiceSet; 4],
    controls: Controls,
    counter: SessionCounter<S>,
    /// 1-based ordinal of the work session in the cycle; 0 when idle or
    /// during a long break.
    current_session: u64,
    timer: Option<Countdown>,
    timer_initialized: bool,
    interval: Duration,
    today: fn() -> NaiveDate,
    finished: bool,
}

impl<S: ByteStore> PhaseMachine<S> {
    /// Build a machine from the configured option lists and tick interval.
    ///
    /// # Errors
    /// Returns an error if an option list is empty.
    pub fn from_config(config: &Config, store: S) -> Result<Self> {
        Ok(Self::new(
            config.choices.choice_sets()?,
            store,
            config.tick_interval(),
        ))
    }

    /// `choices` must be in [`Dimension::ALL`] order.
    pub fn new(choices: [ChoiceSet; 4], store: S, interval: Duration) -> Self {
        Self::with_clock(choices, store, interval, local_today)
    }

    /// Like [`PhaseMachine::new`] with an explicit source for "today".
    pub fn with_clock(
        choices: [ChoiceSet; 4],
        store: S,
        interval: Duration,
        today: fn() -> NaiveDate,
    ) -> Self {
        debug_assert!(choices
            .iter()
            .zip(Dimension::ALL)
            .all(|(set, d)| set.dimension() == d));
        Self {
            phase: Phase::ChooseWorkDuration,
            choices,
            controls: Controls::default(),
            counter: SessionCounter::load(store, today()),
            current_session: 0,
            timer: None,
            timer_initialized: false,
            interval,
            today,
            finished: false,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn choice_set(&self, dimension: Dimension) -> &ChoiceSet {
        &self.choices[dimension.index()]
    }

    /// The choice set being edited, during setup.
    pub fn active_choices(&self) -> Option<&ChoiceSet> {
        self.phase.dimension().map(|d| self.choice_set(d))
    }

    pub fn controls(&self) -> &Controls {
        &self.controls
    }

    pub fn current_session(&self) -> u64 {
        self.current_session
    }

    /// Sessions per cycle, once selected.
    pub fn session_count(&self) -> Option<u64> {
        self.choice_set(Dimension::SessionCount).selected_value().ok()
    }

    pub fn total_today(&self) -> u64 {
        self.counter.total_today()
    }

    pub fn countdown(&self) -> Option<&Countdown> {
        self.timer.as_ref()
    }

    pub fn timer_initialized(&self) -> bool {
        self.timer_initialized
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn store(&self) -> &S {
        self.counter.store()
    }

    /// The tick to deliver next, if a countdown is running.
    pub fn pending_tick(&self) -> Option<Tick> {
        self.timer.as_ref().filter(|t| t.running()).map(Countdown::tick)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Process one message to completion.
    ///
    /// # Errors
    /// Returns [`crate::CoreError::Invariant`] if a selection needed for the
    /// transition is not a positive integer; the machine stays in its
    /// current phase.
    pub fn handle(&mut self, msg: impl Into<Msg>) -> Result<Vec<Event>> {
        if self.finished {
            return Ok(Vec::new());
        }
        let result = match msg.into() {
            Msg::Input(input) => self.handle_input(input),
            Msg::Tick(tick) => self.handle_tick(tick),
        };
        if let Err(e) = &result {
            tracing::error!(phase = %self.phase, error = %e, "transition aborted");
        }
        result
    }

    fn handle_input(&mut self, input: Input) -> Result<Vec<Event>> {
        let allowed = match input {
            Input::Up => self.controls.is_enabled(Control::Up),
            Input::Down => self.controls.is_enabled(Control::Down),
            Input::Enter => self.controls.is_enabled(Control::Enter),
            Input::Confirm => self.controls.is_enabled(Control::Confirm),
            Input::StartStop => {
                self.controls.is_enabled(Control::Start) || self.controls.is_enabled(Control::Stop)
            }
            Input::Reset => self.controls.is_enabled(Control::Reset),
            Input::Quit => self.controls.is_enabled(Control::Quit),
        };
        if !allowed {
            return Ok(Vec::new());
        }

        match input {
            Input::Up | Input::Down | Input::Enter => {
                if let Some(dimension) = self.phase.dimension() {
                    let set = &mut self.choices[dimension.index()];
                    match input {
                        Input::Up => set.move_up(),
                        Input::Down => set.move_down(),
                        _ => set.toggle_at_cursor(),
                    }
                }
                Ok(Vec::new())
            }
            Input::Confirm => self.confirm(),
            Input::StartStop => Ok(self.start_stop()),
            Input::Reset => self.reset(),
            Input::Quit => {
                self.finished = true;
                tracing::info!(phase = %self.phase, "quit");
                Ok(vec![Event::Quit])
            }
        }
    }

    fn confirm(&mut self) -> Result<Vec<Event>> {
        let Some(dimension) = self.phase.dimension() else {
            return Ok(Vec::new());
        };

        self.controls.set(Control::Start, false);
        self.controls.set(Control::Stop, false);
        self.controls.set(Control::Reset, false);
        if !self.choice_set(dimension).has_selection() {
            return Ok(Vec::new());
        }

        let next = match self.phase {
            Phase::ChooseWorkDuration => Phase::ChooseBreakDuration,
            Phase::ChooseBreakDuration => Phase::ChooseLongBreakDuration,
            Phase::ChooseLongBreakDuration => Phase::ChooseSessionCount,
            _ => return self.begin_cycle(),
        };
        Ok(vec![self.enter(next)])
    }

    /// Leave setup for the first work session.
    fn begin_cycle(&mut self) -> Result<Vec<Event>> {
        let per_cycle = self.choice_set(Dimension::SessionCount).selected_value()?;
        let completed = self.counter.recompute_current_session(per_cycle)?;
        let timer = self.countdown_for(Phase::Working)?;

        self.current_session = completed + 1;
        self.install(timer);
        self.controls.set(Control::Start, true);
        self.controls.set(Control::Stop, true);
        self.controls.set(Control::Reset, true);
        for control in [Control::Up, Control::Down, Control::Enter, Control::Confirm] {
            self.controls.set(control, false);
        }
        Ok(vec![self.enter(Phase::Working)])
    }

    fn start_stop(&mut self) -> Vec<Event> {
        let phase = self.phase;
        let Some(timer) = self.timer.as_mut() else {
            return Vec::new();
        };

        if !self.timer_initialized {
            self.timer_initialized = true;
            self.controls.set(Control::Stop, true);
            self.controls.set(Control::Start, false);
            timer.start();
            return vec![Event::TimerStarted {
                phase,
                duration_secs: timer.duration().as_secs(),
            }];
        }

        let Some(running) = timer.toggle() else {
            return Vec::new();
        };
        self.controls.set(Control::Stop, running);
        self.controls.set(Control::Start, !running);
        let remaining_secs = timer.remaining().as_secs();
        if running {
            vec![Event::TimerResumed { phase, remaining_secs }]
        } else {
            vec![Event::TimerPaused { phase, remaining_secs }]
        }
    }

    /// Restart the current phase's countdown from its full length.
    fn reset(&mut self) -> Result<Vec<Event>> {
        if !self.phase.is_timer() {
            return Ok(Vec::new());
        }
        let timer = self.countdown_for(self.phase)?;
        let duration_secs = timer.duration().as_secs();
        self.install(timer);
        Ok(vec![Event::TimerReset {
            phase: self.phase,
            duration_secs,
        }])
    }

    fn handle_tick(&mut self, tick: Tick) -> Result<Vec<Event>> {
        let Some(timer) = self.timer.as_mut() else {
            return Ok(Vec::new());
        };
        match timer.on_tick(tick) {
            TickOutcome::Expired => self.expire(),
            TickOutcome::Ticked | TickOutcome::Ignored => Ok(Vec::new()),
        }
    }

    fn expire(&mut self) -> Result<Vec<Event>> {
        let from = self.phase;
        let mut events = vec![Event::TimerExpired { phase: from }];

        let next = match from {
            Phase::Working => {
                let per_cycle = self.choice_set(Dimension::SessionCount).selected_value()?;
                let next = if self.current_session == per_cycle {
                    Phase::LongBreak
                } else {
                    Phase::Break
                };
                let timer = self.countdown_for(next)?;

                let record = self.counter.record_completed_work_session((self.today)());
                tracing::info!(
                    session = self.current_session,
                    total_today = record.total_today,
                    persisted = record.persisted,
                    "work session completed"
                );
                events.push(Event::SessionCompleted {
                    date: record.date,
                    total_today: record.total_today,
                    persisted: record.persisted,
                });

                if next == Phase::LongBreak {
                    self.current_session = 0;
                }
                self.install(timer);
                next
            }
            Phase::Break | Phase::LongBreak => {
                let timer = self.countdown_for(Phase::Working)?;
                self.current_session = if from == Phase::Break {
                    self.current_session + 1
                } else {
                    1
                };
                self.install(timer);
                Phase::Working
            }
            _ => return Ok(Vec::new()),
        };

        events.push(self.enter(next));
        Ok(events)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn countdown_for(&self, phase: Phase) -> Result<Countdown> {
        let minutes = match phase.duration_dimension() {
            Some(dimension) => self.choice_set(dimension).selected_value()?,
            None => 0,
        };
        Ok(Countdown::from_minutes(minutes, self.interval))
    }

    /// Replace the countdown. The new one waits for StartStop.
    fn install(&mut self, timer: Countdown) {
        self.timer = Some(timer);
        self.timer_initialized = false;
        self.controls.set(Control::Stop, false);
        self.controls.set(Control::Start, true);
    }

    fn enter(&mut self, to: Phase) -> Event {
        let from = std::mem::replace(&mut self.phase, to);
        tracing::info!(%from, %to, current_session = self.current_session, "phase changed");
        Event::PhaseChanged {
            from,
            to,
            current_session: self.current_session,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::CoreError;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    fn sets(session_counts: &[&str]) -> [ChoiceSet; 4] {
        [
            ChoiceSet::new(Dimension::WorkDuration, ["1", "25"]).unwrap(),
            ChoiceSet::new(Dimension::BreakDuration, ["1", "5"]).unwrap(),
            ChoiceSet::new(Dimension::LongBreakDuration, ["2", "15"]).unwrap(),
            ChoiceSet::new(Dimension::SessionCount, session_counts.iter().copied()).unwrap(),
        ]
    }

    fn machine(store: MemoryStore) -> PhaseMachine<MemoryStore> {
        PhaseMachine::with_clock(sets(&["2", "4"]), store, Duration::from_secs(60), day)
    }

    /// Pick the first option everywhere: 1 min work, 1 min break, 2 min long
    /// break, 2 sessions.
    fn configured(store: MemoryStore) -> PhaseMachine<MemoryStore> {
        let mut m = machine(store);
        for _ in 0..4 {
            m.handle(Input::Enter).unwrap();
            m.handle(Input::Confirm).unwrap();
        }
        m
    }

    fn run_out(m: &mut PhaseMachine<MemoryStore>) -> Vec<Event> {
        m.handle(Input::StartStop).unwrap();
        let mut events = Vec::new();
        while let Some(tick) = m.pending_tick() {
            events.extend(m.handle(tick).unwrap());
        }
        events
    }

    #[test]
    fn starts_in_setup() {
        let m = machine(MemoryStore::new());
        assert_eq!(m.phase(), Phase::ChooseWorkDuration);
        assert_eq!(m.current_session(), 0);
        assert!(m.countdown().is_none());
        assert_eq!(m.active_choices().unwrap().dimension(), Dimension::WorkDuration);
    }

    #[test]
    fn confirm_without_selection_is_noop() {
        let mut m = machine(MemoryStore::new());
        assert!(m.handle(Input::Confirm).unwrap().is_empty());
        assert_eq!(m.phase(), Phase::ChooseWorkDuration);
    }

    #[test]
    fn navigation_edits_active_set_only() {
        let mut m = machine(MemoryStore::new());
        m.handle(Input::Down).unwrap();
        m.handle(Input::Enter).unwrap();
        assert_eq!(m.choice_set(Dimension::WorkDuration).selected(), Some("25"));
        assert!(!m.choice_set(Dimension::BreakDuration).has_selection());
        m.handle(Input::Up).unwrap();
        assert_eq!(m.choice_set(Dimension::WorkDuration).cursor(), 0);
    }

    #[test]
    fn setup_walks_all_four_choices() {
        let m = configured(MemoryStore::new());
        assert_eq!(m.phase(), Phase::Working);
        assert_eq!(m.current_session(), 1);
        assert_eq!(m.countdown().unwrap().duration(), Duration::from_secs(60));
        assert!(!m.timer_initialized());
        assert!(m.controls().is_enabled(Control::Start));
        assert!(!m.controls().is_enabled(Control::Confirm));
        assert!(!m.controls().is_enabled(Control::Up));
    }

    #[test]
    fn navigation_ignored_while_timing() {
        let mut m = configured(MemoryStore::new());
        m.handle(Input::Down).unwrap();
        m.handle(Input::Enter).unwrap();
        assert_eq!(m.choice_set(Dimension::SessionCount).selected(), Some("2"));
        assert!(m.handle(Input::Confirm).unwrap().is_empty());
    }

    #[test]
    fn start_stop_before_setup_is_ignored() {
        let mut m = machine(MemoryStore::new());
        assert!(m.handle(Input::StartStop).unwrap().is_empty());
        assert!(!m.timer_initialized());
    }

    #[test]
    fn first_start_then_toggle() {
        let mut m = configured(MemoryStore::new());
        let events = m.handle(Input::StartStop).unwrap();
        assert_eq!(
            events,
            vec![Event::TimerStarted { phase: Phase::Working, duration_secs: 60 }]
        );
        assert!(m.controls().is_enabled(Control::Stop));
        assert!(!m.controls().is_enabled(Control::Start));

        let events = m.handle(Input::StartStop).unwrap();
        assert_eq!(
            events,
            vec![Event::TimerPaused { phase: Phase::Working, remaining_secs: 60 }]
        );
        assert!(m.pending_tick().is_none());
        assert!(m.controls().is_enabled(Control::Start));

        m.handle(Input::StartStop).unwrap();
        assert!(m.countdown().unwrap().running());
    }

    #[test]
    fn work_expiry_records_and_goes_to_break() {
        let mut m = configured(MemoryStore::new());
        let events = run_out(&mut m);
        assert!(events.contains(&Event::SessionCompleted {
            date: day(),
            total_today: 1,
            persisted: true,
        }));
        assert_eq!(m.phase(), Phase::Break);
        assert_eq!(m.store().get_str("2024-06-03").as_deref(), Some("1"));
        assert!(!m.timer_initialized());
        assert!(m.controls().is_enabled(Control::Start));
        assert!(!m.controls().is_enabled(Control::Stop));
    }

    #[test]
    fn break_expiry_advances_session_without_recording() {
        let mut m = configured(MemoryStore::new());
        run_out(&mut m);
        let events = run_out(&mut m);
        assert!(!events.iter().any(|e| matches!(e, Event::SessionCompleted { .. })));
        assert_eq!(m.phase(), Phase::Working);
        assert_eq!(m.current_session(), 2);
        assert_eq!(m.total_today(), 1);
    }

    #[test]
    fn last_session_goes_to_long_break() {
        let mut m = configured(MemoryStore::new());
        run_out(&mut m);
        run_out(&mut m);
        run_out(&mut m);
        assert_eq!(m.phase(), Phase::LongBreak);
        assert_eq!(m.current_session(), 0);
        assert_eq!(m.countdown().unwrap().duration(), Duration::from_secs(120));

        run_out(&mut m);
        assert_eq!(m.phase(), Phase::Working);
        assert_eq!(m.current_session(), 1);
        assert_eq!(m.total_today(), 2);
    }

    #[test]
    fn resumes_mid_cycle_from_stored_total() {
        let store = MemoryStore::new().with_entry("2024-06-03", "3");
        let mut m = configured(store);
        assert_eq!(m.current_session(), 2);
        run_out(&mut m);
        assert_eq!(m.phase(), Phase::LongBreak);
        assert_eq!(m.total_today(), 4);
    }

    #[test]
    fn write_failure_does_not_stop_the_cycle() {
        let mut store = MemoryStore::new();
        store.fail_writes = true;
        let mut m = configured(store);
        let events = run_out(&mut m);
        assert!(events.contains(&Event::SessionCompleted {
            date: day(),
            total_today: 1,
            persisted: false,
        }));
        assert_eq!(m.phase(), Phase::Break);
    }

    #[test]
    fn reset_restarts_phase_countdown() {
        let mut m = configured(MemoryStore::new());
        m.handle(Input::StartStop).unwrap();
        let first_id = m.countdown().unwrap().id();
        let events = m.handle(Input::Reset).unwrap();
        assert_eq!(
            events,
            vec![Event::TimerReset { phase: Phase::Working, duration_secs: 60 }]
        );
        assert_ne!(m.countdown().unwrap().id(), first_id);
        assert!(!m.timer_initialized());
        assert!(m.pending_tick().is_none());
        assert_eq!(m.current_session(), 1);
    }

    #[test]
    fn stale_tick_does_not_touch_new_countdown() {
        let mut m = configured(MemoryStore::new());
        m.handle(Input::StartStop).unwrap();
        let stale = m.pending_tick().unwrap();
        m.handle(Input::Reset).unwrap();
        m.handle(Input::StartStop).unwrap();
        m.handle(stale).unwrap();
        assert_eq!(m.countdown().unwrap().remaining(), Duration::from_secs(60));
    }

    #[test]
    fn unparsable_session_count_aborts_transition() {
        let mut m = PhaseMachine::with_clock(
            sets(&["four"]),
            MemoryStore::new(),
            Duration::from_secs(60),
            day,
        );
        for _ in 0..3 {
            m.handle(Input::Enter).unwrap();
            m.handle(Input::Confirm).unwrap();
        }
        m.handle(Input::Enter).unwrap();
        let err = m.handle(Input::Confirm).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Invariant { dimension: Dimension::SessionCount, .. }
        ));
        assert_eq!(m.phase(), Phase::ChooseSessionCount);
        assert!(m.countdown().is_none());
    }

    #[test]
    fn unparsable_work_duration_aborts_transition() {
        let mut choices = sets(&["2"]);
        choices[0] = ChoiceSet::new(Dimension::WorkDuration, ["x"]).unwrap();
        let mut m =
            PhaseMachine::with_clock(choices, MemoryStore::new(), Duration::from_secs(60), day);
        for _ in 0..3 {
            m.handle(Input::Enter).unwrap();
            m.handle(Input::Confirm).unwrap();
        }
        assert_eq!(m.phase(), Phase::ChooseSessionCount);
        m.handle(Input::Enter).unwrap();
        let err = m.handle(Input::Confirm).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Invariant { dimension: Dimension::WorkDuration, .. }
        ));
        assert_eq!(m.phase(), Phase::ChooseSessionCount);
        assert!(m.countdown().is_none());
        assert_eq!(m.current_session(), 0);
    }

    #[test]
    fn quit_ends_processing() {
        let mut m = configured(MemoryStore::new());
        m.handle(Input::StartStop).unwrap();
        assert_eq!(m.handle(Input::Quit).unwrap(), vec![Event::Quit]);
        assert!(m.is_finished());
        let before = m.countdown().unwrap().remaining();
        assert!(m.handle(Input::StartStop).unwrap().is_empty());
        let tick = m.pending_tick().unwrap();
        assert!(m.handle(tick).unwrap().is_empty());
        assert_eq!(m.countdown().unwrap().remaining(), before);
    }

    #[test]
    fn quit_during_setup() {
        let mut m = machine(MemoryStore::new());
        m.handle(Input::Quit).unwrap();
        assert!(m.is_finished());
        assert!(m.handle(Input::Enter).unwrap().is_empty());
        assert!(!m.choice_set(Dimension::WorkDuration).has_selection());
    }
}
