//! SQLite-backed byte store.
//!
//! Holds one row per calendar day in a `kv` table: the key is the ISO date
//! ("YYYY-MM-DD") and the value is the decimal count of work sessions
//! completed that day.

use std::path::Path;

use chrono::NaiveDate;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};

use super::{data_dir, ByteStore};
use crate::error::{Result, StoreError};
use crate::session::{date_key, decode_count, DATE_FORMAT};

/// Completed work sessions for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCount {
    pub date: NaiveDate,
    pub completed_sessions: u64,
}

/// SQLite database for the per-day session counts.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `<data_dir>/pomotui.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("pomotui.db");
        Self::open_at(&path)
    }

    /// Open the database at an explicit path.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database.
    ///
    /// # Errors
    /// Returns an error if the schema cannot be created.
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value BLOB NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Completed sessions recorded for `date`, 0 if none.
    ///
    /// # Errors
    /// Returns an error if the query fails or the stored value is corrupt.
    pub fn daily_count(&self, date: NaiveDate) -> Result<DailyCount> {
        let key = date_key(date);
        let completed_sessions = match self.get(&key)? {
            Some(bytes) => decode_count(&key, &bytes)?,
            None => 0,
        };
        Ok(DailyCount {
            date,
            completed_sessions,
        })
    }

    /// Every day with a recorded count, oldest first. Keys that are not
    /// dates are skipped.
    ///
    /// # Errors
    /// Returns an error if the query fails or a stored value is corrupt.
    pub fn history(&self) -> Result<Vec<DailyCount>> {
        let mut stmt = self.conn.prepare("SELECT key, value FROM kv ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, Vec<u8>>(1)?))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (key, value) = row?;
            let Ok(date) = NaiveDate::parse_from_str(&key, DATE_FORMAT) else {
                continue;
            };
            out.push(DailyCount {
                date,
                completed_sessions: decode_count(&key, &value)?,
            });
        }
        Ok(out)
    }
}

impl ByteStore for Database {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT value FROM kv WHERE key = ?1")?;
        let result = stmt.query_row(params![key], |row| row.get::<_, Vec<u8>>(0));
        match result {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv (key, value) VALUES (?1, ?2)",
            params![key, value],
        )?;
        Ok(())
    }
}
