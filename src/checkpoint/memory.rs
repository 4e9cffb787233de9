use crate::checkpoint::CheckpointStore;
use crate::CheckpointResult;
use chrono::NaiveDateTime;
use std::sync::{Mutex, PoisonError};

/// In-process checkpoint store
///
/// Keeps every saved value so callers can inspect the save history.
#[derive(Debug, Default)]
pub struct MemoryStore {
    saved: Mutex<Vec<NaiveDateTime>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds `timestamp`
    pub fn with_value(timestamp: NaiveDateTime) -> Self {
        Self {
            saved: Mutex::new(vec![timestamp]),
        }
    }

    /// All values saved so far, oldest first
    pub fn history(&self) -> Vec<NaiveDateTime> {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl CheckpointStore for MemoryStore {
    fn load(&self) -> NaiveDateTime {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .copied()
            .unwrap_or_default()
    }

    fn save(&self, timestamp: NaiveDateTime) -> CheckpointResult<()> {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(timestamp);
        Ok(())
    }
}
