//! Per-day completed session count.
//!
//! The count lives in a [`ByteStore`] under the local calendar date. It is read
//! once when the counter is loaded and written after every completed work
//! session, before the state machine finishes the transition.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, StoreError};
use crate::storage::ByteStore;

/// Key format for the per-day entries.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Sessions already completed within the current cycle:
/// `total_completed mod sessions_per_cycle`.
///
/// # Errors
/// Returns [`ConfigError::ZeroSessionCount`] if `sessions_per_cycle` is 0.
pub fn recompute_current_session(
    total_completed: u64,
    sessions_per_cycle: u64,
) -> Result<u64, ConfigError> {
    if sessions_per_cycle == 0 {
        return Err(ConfigError::ZeroSessionCount);
    }
    Ok(total_completed % sessions_per_cycle)
}

/// Decode a stored decimal count.
pub fn decode_count(key: &str, bytes: &[u8]) -> Result<u64, StoreError> {
    let text = std::str::from_utf8(bytes).map_err(|e| StoreError::Corrupt {
        key: key.to_string(),
        message: e.to_string(),
    })?;
    text.trim().parse::<u64>().map_err(|e| StoreError::Corrupt {
        key: key.to_string(),
        message: format!("'{text}': {e}"),
    })
}

pub fn date_key(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Outcome of recording a completed work session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub date: NaiveDate,
    pub total_today: u64,
    /// `false` if the store write failed. The in-memory count still advanced.
    pub persisted: bool,
}

/// Tracks today's completed work sessions on top of a byte store.
pub struct SessionCounter<S> {
    store: S,
    day: NaiveDate,
    total: u64,
}

impl<S: ByteStore> SessionCounter<S> {
    /// Load today's count. A missing entry, a failed read or a corrupt value
    /// all start the day at 0; the latter two are logged.
    pub fn load(store: S, today: NaiveDate) -> Self {
        let total = read_total(&store, today);
        tracing::info!(date = %today, total, "loaded daily session count");
        Self {
            store,
            day: today,
            total,
        }
    }

    pub fn total_today(&self) -> u64 {
        self.total
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Sessions already completed within the current cycle.
    ///
    /// # Errors
    /// Returns an error if `sessions_per_cycle` is 0.
    pub fn recompute_current_session(&self, sessions_per_cycle: u64) -> Result<u64, ConfigError> {
        recompute_current_session(self.total, sessions_per_cycle)
    }

    /// Count one more completed work session and persist it under `today`.
    ///
    /// If the date moved on since the last load, the count for the new day
    /// is read first. A failed write is logged and reported through
    /// [`SessionRecord::persisted`].
    pub fn record_completed_work_session(&mut self, today: NaiveDate) -> SessionRecord {
        if today != self.day {
            tracing::info!(from = %self.day, to = %today, "day rolled over");
            self.day = today;
            self.total = read_total(&self.store, today);
        }

        self.total += 1;
        let key = date_key(today);
        let persisted = match self.store.set(&key, self.total.to_string().as_bytes()) {
            Ok(()) => true,
            Err(e) => {
                tracing::error!(key = %key, total = self.total, error = %e, "failed to persist session count");
                false
            }
        };

        SessionRecord {
            date: today,
            total_today: self.total,
            persisted,
        }
    }
}

fn read_total<S: ByteStore>(store: &S, day: NaiveDate) -> u64 {
    let key = date_key(day);
    match store.get(&key) {
        Ok(Some(bytes)) => decode_count(&key, &bytes).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring stored session count");
            0
        }),
        Ok(None) => 0,
        Err(e) => {
            tracing::warn!(key = %key, error = %e, "could not read session count, starting at 0");
            0
        }
    }
}
