//! Which inputs are currently accepted.
//!
//! A disabled control turns its input into a no-op. Renderers also read the
//! flags to decide which key hints to show.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Control {
    Up,
    Down,
    Enter,
    Confirm,
    Start,
    Stop,
    Reset,
    Quit,
}

impl Control {
    pub const ALL: [Control; 8] = [
        Control::Up,
        Control::Down,
        Control::Enter,
        Control::Confirm,
        Control::Start,
        Control::Stop,
        Control::Reset,
        Control::Quit,
    ];

    fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    enabled: u8,
}

impl Default for Controls {
    /// Setup controls: navigation on, timer controls off.
    fn default() -> Self {
        let mut controls = Self { enabled: 0 };
        for control in Control::ALL {
            controls.set(control, true);
        }
        controls.set(Control::Start, false);
        controls.set(Control::Stop, false);
        controls.set(Control::Reset, false);
        controls
    }
}

impl Controls {
    pub fn is_enabled(&self, control: Control) -> bool {
        self.enabled & control.bit() != 0
    }

    pub fn set(&mut self, control: Control, enabled: bool) {
        if enabled {
            self.enabled |= control.bit();
        } else {
            self.enabled &= !control.bit();
        }
    }

    /// Enabled controls in display order.
    pub fn enabled(&self) -> impl Iterator<Item = Control> + '_ {
        Control::ALL.into_iter().filter(|c| self.is_enabled(*c))
    }
}
