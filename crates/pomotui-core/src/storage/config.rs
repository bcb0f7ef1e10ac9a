//! TOML-based application configuration.
//!
//! Stores:
//! - The option lists offered for each setting
//! - Log file location and level
//! - The countdown tick interval
//!
//! Configuration is stored at `~/.config/pomotui/config.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::choice::{ChoiceSet, Dimension};
use crate::error::{ConfigError, Result};

/// Option lists offered during setup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoicesConfig {
    #[serde(default = "default_work_durations")]
    pub work_durations: Vec<String>,
    #[serde(default = "default_break_durations")]
    pub break_durations: Vec<String>,
    #[serde(default = "default_long_break_durations")]
    pub long_break_durations: Vec<String>,
    #[serde(default = "default_session_counts")]
    pub session_counts: Vec<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Log file. Relative paths are resolved against the data directory.
    #[serde(default = "default_log_file")]
    pub file: String,
    /// Filter directive, overridden by `RUST_LOG`.
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/pomotui/config.toml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub choices: ChoicesConfig,
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default = "default_tick_interval_secs")]
    pub tick_interval_secs: u64,
}

// Default functions
fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
fn default_work_durations() -> Vec<String> {
    strings(&["1", "15", "20", "25", "30", "45", "50", "60", "90"])
}
fn default_break_durations() -> Vec<String> {
    strings(&["1", "5", "7", "10"])
}
fn default_long_break_durations() -> Vec<String> {
    strings(&["15", "20", "25", "30"])
}
fn default_session_counts() -> Vec<String> {
    strings(&["4", "5", "6", "7"])
}
fn default_log_file() -> String {
    "debug.log".into()
}
fn default_log_level() -> String {
    "info".into()
}
fn default_tick_interval_secs() -> u64 {
    1
}

impl Default for ChoicesConfig {
    fn default() -> Self {
        Self {
            work_durations: default_work_durations(),
            break_durations: default_break_durations(),
            long_break_durations: default_long_break_durations(),
            session_counts: default_session_counts(),
        }
    }
}

impl ChoicesConfig {
    pub fn for_dimension(&self, dimension: Dimension) -> &[String] {
        match dimension {
            Dimension::WorkDuration => &self.work_durations,
            Dimension::BreakDuration => &self.break_durations,
            Dimension::LongBreakDuration => &self.long_break_durations,
            Dimension::SessionCount => &self.session_counts,
        }
    }

    /// One choice set per dimension, in [`Dimension::ALL`] order.
    ///
    /// # Errors
    /// Returns an error if any list is empty.
    pub fn choice_sets(&self) -> Result<[ChoiceSet; 4]> {
        let [a, b, c, d] = Dimension::ALL;
        Ok([
            ChoiceSet::new(a, self.for_dimension(a).to_vec())?,
            ChoiceSet::new(b, self.for_dimension(b).to_vec())?,
            ChoiceSet::new(c, self.for_dimension(c).to_vec())?,
            ChoiceSet::new(d, self.for_dimension(d).to_vec())?,
        ])
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            file: default_log_file(),
            level: default_log_level(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            choices: ChoicesConfig::default(),
            log: LogConfig::default(),
            tick_interval_secs: default_tick_interval_secs(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_none() {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Number(_) => value
                        .parse::<u64>()
                        .map(|n| serde_json::Value::Number(n.into()))
                        .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?,
                    // Lists are given comma-separated: "4,5,6"
                    serde_json::Value::Array(_) => serde_json::Value::Array(
                        value
                            .split(',')
                            .map(str::trim)
                            .filter(|s| !s.is_empty())
                            .map(|s| serde_json::Value::String(s.to_string()))
                            .collect(),
                    ),
                    serde_json::Value::Object(_) => return Err(unknown()),
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from the default location, writing defaults if the file is missing.
    ///
    /// # Errors
    /// Returns an error if the config file exists but cannot be parsed or is
    /// invalid, or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::path()?)
    }

    /// Load from `path`, writing defaults there if the file is missing.
    ///
    /// # Errors
    /// See [`Config::load`].
    pub fn load_from(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                Ok(cfg)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Persist to the default location.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    /// Returns an error if the config cannot be serialized or written.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Every option list must be non-empty and hold positive integers, and
    /// the tick interval must be non-zero.
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidValue`] naming the first bad key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for dimension in Dimension::ALL {
            let key = format!("choices.{}", list_key(dimension));
            let options = self.choices.for_dimension(dimension);
            if options.is_empty() {
                return Err(ConfigError::InvalidValue {
                    key,
                    message: "at least one option is required".into(),
                });
            }
            if let Some(bad) = options
                .iter()
                .find(|o| !matches!(o.trim().parse::<u64>(), Ok(n) if n > 0))
            {
                return Err(ConfigError::InvalidValue {
                    key,
                    message: format!("'{bad}' is not a positive integer"),
                });
            }
            if let Some(dup) = options
                .iter()
                .enumerate()
                .find(|(i, o)| options[..*i].iter().any(|p| p.trim() == o.trim()))
                .map(|(_, o)| o)
            {
                return Err(ConfigError::InvalidValue {
                    key,
                    message: format!("'{dup}' is listed more than once"),
                });
            }
        }
        if self.tick_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "tick_interval_secs".into(),
                message: "must be at least 1".into(),
            });
        }
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Array(items) => Some(
                items
                    .iter()
                    .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
                    .collect::<Vec<_>>()
                    .join(","),
            ),
            other => Some(other.to_string()),
        }
    }

    /// Update a value by dot-separated key. The result is validated but not
    /// saved.
    ///
    /// # Errors
    /// Returns an error if the key is unknown or the new config is invalid.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_interval_secs)
    }

    /// Log file path, resolved against the data directory when relative.
    ///
    /// # Errors
    /// Returns an error if the data directory cannot be created.
    pub fn log_path(&self) -> Result<PathBuf> {
        let file = PathBuf::from(&self.log.file);
        if file.is_absolute() {
            return Ok(file);
        }
        Ok(data_dir()?.join(file))
    }
}

fn list_key(dimension: Dimension) -> &'static str {
    match dimension {
        Dimension::WorkDuration => "work_durations",
        Dimension::BreakDuration => "break_durations",
        Dimension::LongBreakDuration => "long_break_durations",
        Dimension::SessionCount => "session_counts",
    }
}
