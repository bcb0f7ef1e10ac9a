//! Log file setup.
//!
//! The terminal belongs to the UI while the timer runs, so logs go to a file
//! (`debug.log` in the data directory unless configured otherwise).

use std::fs::OpenOptions;
use std::sync::Mutex;

use pomotui_core::Config;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. `RUST_LOG` overrides `log.level`.
pub fn init(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let path = config.log_path()?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .map_err(|e| format!("couldn't open log file {}: {e}", path.display()))?;

    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log.level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| e as Box<dyn std::error::Error>)?;
    Ok(())
}
