//! Terminal event loop.
//!
//! Key presses and ticks are fed to the phase machine one at a time. The loop
//! blocks on input for at most the time left until the next tick.

mod keys;
mod view;

use std::io;
use std::time::Instant;

use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use pomotui_core::{ByteStore, Event as CoreEvent, PhaseMachine, Ticker};
use ratatui::prelude::*;

pub fn run<S: ByteStore>(machine: &mut PhaseMachine<S>) -> Result<(), Box<dyn std::error::Error>> {
    // Setup terminal
    enable_raw_mode()?;
    let guard = RestoreOnDrop(restore_terminal);
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, machine);

    drop(guard);
    terminal.show_cursor()?;

    result
}

/// Runs its closure when dropped, including while unwinding from a panic.
struct RestoreOnDrop<F: FnMut()>(F);

impl<F: FnMut()> Drop for RestoreOnDrop<F> {
    fn drop(&mut self) {
        (self.0)()
    }
}

fn restore_terminal() {
    if let Err(e) = disable_raw_mode() {
        tracing::warn!(error = %e, "couldn't disable raw mode");
    }
    if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen) {
        tracing::warn!(error = %e, "couldn't leave alternate screen");
    }
}

fn run_app<B: Backend, S: ByteStore>(
    terminal: &mut Terminal<B>,
    machine: &mut PhaseMachine<S>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut ticker = Ticker::new(machine.interval(), Instant::now());

    loop {
        terminal.draw(|f| view::draw(f, machine))?;
        if machine.is_finished() {
            return Ok(());
        }

        let timeout = ticker.timeout(Instant::now());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(input) = keys::input_for(&key) {
                        let events = machine.handle(input)?;
                        if events.iter().any(restarts_interval) {
                            ticker.restart(Instant::now());
                        }
                        log_events(&events);
                    }
                }
            }
        }

        for _ in 0..ticker.due(Instant::now()) {
            let Some(tick) = machine.pending_tick() else {
                break;
            };
            log_events(&machine.handle(tick)?);
        }
    }
}

/// A countdown that just began or resumed gets a full first interval.
fn restarts_interval(event: &CoreEvent) -> bool {
    matches!(
        event,
        CoreEvent::TimerStarted { .. } | CoreEvent::TimerResumed { .. }
    )
}

fn log_events(events: &[CoreEvent]) {
    for event in events {
        tracing::debug!(?event, "event");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pomotui_core::Phase;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn restore_runs_when_the_loop_panics() {
        let restored = AtomicBool::new(false);
        let result = std::panic::catch_unwind(|| {
            let _guard = RestoreOnDrop(|| restored.store(true, Ordering::SeqCst));
            panic!("draw failed");
        });
        assert!(result.is_err());
        assert!(restored.load(Ordering::SeqCst));
    }

    #[test]
    fn only_start_and_resume_restart_interval() {
        assert!(restarts_interval(&CoreEvent::TimerStarted {
            phase: Phase::Working,
            duration_secs: 60,
        }));
        assert!(restarts_interval(&CoreEvent::TimerResumed {
            phase: Phase::Break,
            remaining_secs: 30,
        }));
        assert!(!restarts_interval(&CoreEvent::TimerPaused {
            phase: Phase::Break,
            remaining_secs: 30,
        }));
        assert!(!restarts_interval(&CoreEvent::Quit));
    }
}
