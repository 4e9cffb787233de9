//! JSON file checkpoint storage
//!
//! The watermark is stored as a single pretty-printed JSON string such as
//! `"2015-09-17T00:00:00"`. Writes go through a temporary file in the same
//! directory which is then renamed over the target, so a concurrent reader
//! sees either the old value or the new one.

use crate::checkpoint::{CheckpointFault, CheckpointStore};
use crate::{CheckpointError, CheckpointResult};
use chrono::NaiveDateTime;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Checkpoint store backed by a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CheckpointStore for JsonFileStore {
    fn load(&self) -> NaiveDateTime {
        load_checkpoint(&self.path)
    }

    fn save(&self, timestamp: NaiveDateTime) -> CheckpointResult<()> {
        save_checkpoint(timestamp, &self.path)
    }
}

/// Reads the stored watermark without any recovery
///
/// # Returns
///
/// * `Ok(NaiveDateTime)` - The stored timestamp
/// * `Err(CheckpointFault)` - Why no usable timestamp could be read
pub fn read_checkpoint(path: &Path) -> Result<NaiveDateTime, CheckpointFault> {
    let content = std::fs::read_to_string(path).map_err(|e| classify_io_error(path, e))?;

    if content.trim().is_empty() {
        return Err(CheckpointFault::MissingContent(
            "checkpoint file is empty".to_string(),
        ));
    }

    serde_json::from_str(&content).map_err(|e| CheckpointFault::MissingContent(e.to_string()))
}

/// Loads the stored watermark, healing the checkpoint location on failure
///
/// Never fails. When the file cannot be used, the fault is logged with its
/// class and the default timestamp is returned. A missing parent directory is
/// created, and the default is written back only when the file or its content
/// is missing. An unreadable file is left untouched so its value survives.
pub fn load_checkpoint(path: &Path) -> NaiveDateTime {
    let fault = match read_checkpoint(path) {
        Ok(timestamp) => {
            tracing::debug!("Loaded checkpoint {} from {}", timestamp, path.display());
            return timestamp;
        }
        Err(fault) => fault,
    };

    let fallback = NaiveDateTime::default();
    match &fault {
        CheckpointFault::PermissionDenied(msg) => {
            tracing::error!(
                "Permission denied reading checkpoint {}: {}. Check access rights",
                path.display(),
                msg
            );
            return fallback;
        }
        CheckpointFault::MissingDirectory(msg) => {
            tracing::error!(
                "Checkpoint directory for {} does not exist: {}. Creating...",
                path.display(),
                msg
            );
            if let Some(parent) = non_empty_parent(path) {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    tracing::error!("Failed to create {}: {}", parent.display(), e);
                }
            }
        }
        CheckpointFault::MissingFile(msg) => tracing::error!(
            "Checkpoint file {} does not exist: {}. Creating...",
            path.display(),
            msg
        ),
        CheckpointFault::MissingContent(msg) => tracing::error!(
            "Checkpoint file {} has no usable content: {}",
            path.display(),
            msg
        ),
        CheckpointFault::Unexpected(msg) => {
            tracing::error!(
                "Unexpected failure reading checkpoint {}: {}",
                path.display(),
                msg
            );
            return fallback;
        }
    }

    if let Err(e) = save_checkpoint(fallback, path) {
        tracing::error!("Failed to write default checkpoint: {}", e);
    }
    fallback
}

/// Atomically replaces the stored watermark
pub fn save_checkpoint(timestamp: NaiveDateTime, path: &Path) -> CheckpointResult<()> {
    let dir = non_empty_parent(path).unwrap_or_else(|| Path::new("."));
    let io_error = |source: std::io::Error| CheckpointError::Io {
        path: path.display().to_string(),
        source,
    };

    std::fs::create_dir_all(dir).map_err(io_error)?;

    let json = serde_json::to_string_pretty(&timestamp)?;
    let mut file = NamedTempFile::new_in(dir).map_err(io_error)?;
    file.write_all(json.as_bytes()).map_err(io_error)?;
    file.flush().map_err(io_error)?;
    file.persist(path).map_err(|source| CheckpointError::Persist {
        path: path.display().to_string(),
        source,
    })?;

    tracing::debug!("Saved checkpoint {} to {}", timestamp, path.display());
    Ok(())
}

fn classify_io_error(path: &Path, error: std::io::Error) -> CheckpointFault {
    match error.kind() {
        ErrorKind::PermissionDenied => CheckpointFault::PermissionDenied(error.to_string()),
        ErrorKind::NotFound => match non_empty_parent(path) {
            Some(parent) if !parent.is_dir() => {
                CheckpointFault::MissingDirectory(error.to_string())
            }
            _ => CheckpointFault::MissingFile(error.to_string()),
        },
        _ => CheckpointFault::Unexpected(error.to_string()),
    }
}

fn non_empty_parent(path: &Path) -> Option<&Path> {
    path.parent().filter(|p| !p.as_os_str().is_empty())
}
