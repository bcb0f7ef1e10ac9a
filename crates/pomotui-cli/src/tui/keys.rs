//! Key bindings.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pomotui_core::{Control, Input};

pub fn input_for(key: &KeyEvent) -> Option<Input> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(Input::Quit),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(Input::Up),
        KeyCode::Down | KeyCode::Char('j') => Some(Input::Down),
        KeyCode::Enter | KeyCode::Char(' ') => Some(Input::Enter),
        KeyCode::Char('c') => Some(Input::Confirm),
        KeyCode::Char('s') => Some(Input::StartStop),
        KeyCode::Char('r') => Some(Input::Reset),
        KeyCode::Char('q') => Some(Input::Quit),
        _ => None,
    }
}

/// Key hint and description shown in the help line.
pub fn help(control: Control) -> (&'static str, &'static str) {
    match control {
        Control::Up => ("k/↑", "up"),
        Control::Down => ("j/↓", "down"),
        Control::Enter => ("enter", "select"),
        Control::Confirm => ("c", "confirm"),
        Control::Start => ("s", "start"),
        Control::Stop => ("s", "stop"),
        Control::Reset => ("r", "reset"),
        Control::Quit => ("q", "quit"),
    }
}
