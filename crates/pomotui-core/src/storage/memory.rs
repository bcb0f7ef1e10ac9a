use std::collections::HashMap;

use super::ByteStore;
use crate::error::StoreError;

/// Process-local store. Used in tests and as a fallback when the database
/// cannot be opened.
///
/// `fail_reads` / `fail_writes` make every call fail, to exercise the
/// degraded paths of the session counter.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, Vec<u8>>,
    pub fail_reads: bool,
    pub fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, key: &str, value: &str) -> Self {
        self.entries.insert(key.to_string(), value.as_bytes().to_vec());
        self
    }

    /// Value under `key` decoded as UTF-8.
    pub fn get_str(&self, key: &str) -> Option<String> {
        self.entries
            .get(key)
            .map(|v| String::from_utf8_lossy(v).into_owned())
    }
}

impl ByteStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        if self.fail_reads {
            return Err(StoreError::Unavailable("reads disabled".into()));
        }
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &[u8]) -> Result<(), StoreError> {
        if self.fail_writes {
            return Err(StoreError::Unavailable("writes disabled".into()));
        }
        self.entries.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}
