//! Checkpoint module for the last-check watermark
//!
//! The watermark is the timestamp up to which reports have already been
//! returned. This module loads and persists it; it holds no crawl logic.
//!
//! Loading never fails: a missing, unreadable, or corrupt checkpoint is
//! logged with its fault class and replaced by the default timestamp.

mod json_file;
mod memory;

pub use json_file::{load_checkpoint, read_checkpoint, save_checkpoint, JsonFileStore};
pub use memory::MemoryStore;

use crate::CheckpointResult;
use chrono::NaiveDateTime;
use thiserror::Error;

/// Reasons a stored checkpoint could not be read
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckpointFault {
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    #[error("directory does not exist: {0}")]
    MissingDirectory(String),

    #[error("file does not exist: {0}")]
    MissingFile(String),

    #[error("no usable content: {0}")]
    MissingContent(String),

    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

/// Storage for the last-check watermark
pub trait CheckpointStore: Send + Sync {
    /// Returns the stored watermark, or the default timestamp if none is usable
    fn load(&self) -> NaiveDateTime;

    /// Replaces the stored watermark
    fn save(&self, timestamp: NaiveDateTime) -> CheckpointResult<()>;
}
