//! Typed error enum for the storage layer.

use std::path::PathBuf;

use thiserror::Error;

/// Storage-layer error with variants covering every expected failure mode.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading, writing or renaming a file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// File contents could not be deserialized into domain type.
    #[error("data corruption in {}: {source}", path.display())]
    DataCorruption {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StorageError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io { path: path.into(), source }
    }

    /// Whether the underlying file holds unreadable data.
    #[must_use]
    pub const fn is_corruption(&self) -> bool {
        matches!(self, Self::DataCorruption { .. })
    }
}
