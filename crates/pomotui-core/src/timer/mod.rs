mod countdown;
mod ticker;

pub use countdown::{Countdown, Tick, TickOutcome, DEFAULT_INTERVAL};
pub use ticker::Ticker;
