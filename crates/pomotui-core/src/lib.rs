//! # pomotui Core Library
//!
//! This library provides the core logic of the pomotui terminal pomodoro
//! timer. The CLI crate is a thin terminal layer over it: it maps keys to
//! [`Input`]s, feeds ticks, and renders whatever the machine exposes.
//!
//! ## Architecture
//!
//! - **Choice Selector**: single-select option lists for the four settings
//! - **Session Counter**: per-day completed-session count on a byte store
//! - **Countdown**: a tick-driven countdown with no clock of its own
//! - **Phase State Machine**: setup phases, then work / break / long break
//! - **Storage**: SQLite-backed byte store and TOML-based configuration
//!
//! ## Key Components
//!
//! - [`PhaseMachine`]: Core state machine
//! - [`Countdown`]: Countdown adapter
//! - [`Database`]: Per-day session count persistence
//! - [`Config`]: Application configuration management

pub mod choice;
pub mod controls;
pub mod error;
pub mod events;
pub mod machine;
pub mod phase;
pub mod session;
pub mod storage;
pub mod timer;

pub use choice::{ChoiceSet, Dimension};
pub use controls::{Control, Controls};
pub use error::{ConfigError, CoreError, Result, StoreError, ValidationError};
pub use events::{Event, Input};
pub use machine::{Msg, PhaseMachine};
pub use phase::Phase;
pub use session::{recompute_current_session, SessionCounter, SessionRecord};
pub use storage::{ByteStore, Config, Database, MemoryStore};
pub use timer::{Countdown, Tick, TickOutcome, Ticker};
