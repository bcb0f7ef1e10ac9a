mod config;
pub mod database;
mod memory;

pub use config::{ChoicesConfig, Config, LogConfig};
pub use database::{DailyCount, Database};
pub use memory::MemoryStore;

use std::path::PathBuf;

use crate::error::StoreError;

/// Byte-oriented key-value store holding the per-day session counts.
pub trait ByteStore {
    /// Fetch the value under `key`, or `None` if the key was never written.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError>;
}

impl<S: ByteStore + ?Sized> ByteStore for Box<S> {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// Returns the data directory, creating it if needed.
///
/// `POMOTUI_DATA_DIR` overrides the location outright. Otherwise this is
/// `~/.config/pomotui[-dev]/`, with the `-dev` suffix when `POMOTUI_ENV=dev`.
///
/// # Errors
/// Returns an error if creating the directory fails.
pub fn data_dir() -> std::io::Result<PathBuf> {
    let dir = match std::env::var_os("POMOTUI_DATA_DIR") {
        Some(dir) => PathBuf::from(dir),
        None => {
            let base_dir = dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".config");
            let env = std::env::var("POMOTUI_ENV").unwrap_or_else(|_| "production".to_string());
            if env == "dev" {
                base_dir.join("pomotui-dev")
            } else {
                base_dir.join("pomotui")
            }
        }
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
