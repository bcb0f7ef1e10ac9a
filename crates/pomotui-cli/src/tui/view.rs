use std::time::Duration;

use pomotui_core::{ByteStore, ChoiceSet, PhaseMachine};
use ratatui::{
    prelude::*,
    widgets::{Block, BorderType, Borders, Gauge, Paragraph},
};

use super::keys;

pub fn draw<S: ByteStore>(f: &mut Frame, machine: &PhaseMachine<S>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(1),    // Main content
            Constraint::Length(1), // Help
        ])
        .split(f.area());

    let header = Paragraph::new(Line::from(Span::styled(
        machine.phase().title(),
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .title(format!(" pomotui · {} today ", machine.total_today())),
    );
    f.render_widget(header, chunks[0]);

    match machine.active_choices() {
        Some(set) => draw_choices(f, set, chunks[1]),
        None => draw_timer(f, machine, chunks[1]),
    }

    f.render_widget(
        Paragraph::new(help_line(machine)).style(Style::default().fg(Color::DarkGray)),
        chunks[2],
    );
}

fn draw_choices(f: &mut Frame, set: &ChoiceSet, area: Rect) {
    let lines: Vec<Line> = choice_lines(set)
        .into_iter()
        .enumerate()
        .map(|(i, text)| {
            if i == set.cursor() {
                Line::from(Span::styled(text, Style::default().fg(Color::Yellow)))
            } else {
                Line::from(text)
            }
        })
        .collect();
    f.render_widget(Paragraph::new(lines), area);
}

fn draw_timer<S: ByteStore>(f: &mut Frame, machine: &PhaseMachine<S>, area: Rect) {
    let Some(timer) = machine.countdown() else {
        return;
    };
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Remaining
            Constraint::Length(1), // Progress bar
            Constraint::Length(1),
            Constraint::Length(1), // Session dots
            Constraint::Min(0),
        ])
        .split(area);

    let status = if timer.running() {
        ""
    } else if machine.timer_initialized() {
        "  (paused)"
    } else {
        "  (ready)"
    };
    f.render_widget(
        Paragraph::new(format!("{}{status}", format_remaining(timer.remaining()))),
        sections[0],
    );
    f.render_widget(
        Gauge::default()
            .gauge_style(Style::default().fg(Color::Green))
            .ratio(timer.progress().clamp(0.0, 1.0)),
        sections[1],
    );

    let total = machine.session_count().unwrap_or(0);
    f.render_widget(
        Paragraph::new(session_dots(machine.current_session(), total)),
        sections[3],
    );
}

fn help_line<S: ByteStore>(machine: &PhaseMachine<S>) -> String {
    machine
        .controls()
        .enabled()
        .map(|c| {
            let (key, desc) = keys::help(c);
            format!("{key} {desc}")
        })
        .collect::<Vec<_>>()
        .join(" • ")
}

/// `> [x] 25 mins` style rows.
fn choice_lines(set: &ChoiceSet) -> Vec<String> {
    set.choices()
        .iter()
        .enumerate()
        .map(|(i, choice)| {
            let cursor = if i == set.cursor() { ">" } else { " " };
            let checked = if set.is_selected(i) { "x" } else { " " };
            format!("{cursor} [{checked}] {choice} {}", set.dimension().unit())
        })
        .collect()
}

fn format_remaining(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// One dot per session in the cycle, filled up to the current session.
fn session_dots(current: u64, total: u64) -> String {
    (1..=total)
        .map(|i| if current >= i { "●" } else { "○" })
        .collect::<Vec<_>>()
        .join(" ")
}
