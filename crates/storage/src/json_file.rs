//! Whole-file JSON read/write helpers.

use std::fs::{File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::error::StorageError;

/// Reads and parses `path`; a missing file yields `Ok(None)`.
pub(crate) fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StorageError> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(StorageError::io(path, e)),
    };
    serde_json::from_str(&content)
        .map(Some)
        .map_err(|source| StorageError::DataCorruption { path: path.to_path_buf(), source })
}

/// Serializes `value` to `path` atomically via temp file + rename.
pub(crate) fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StorageError> {
    write_atomic(path, value, false)
}

/// Like [`write_json`], but the file is readable by its owner only.
pub(crate) fn write_private_json<T: Serialize + ?Sized>(
    path: &Path,
    value: &T,
) -> Result<(), StorageError> {
    write_atomic(path, value, true)
}

fn write_atomic<T: Serialize + ?Sized>(path: &Path, value: &T, private: bool) -> Result<(), StorageError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
    }
    let content = serde_json::to_string_pretty(value)
        .map_err(|source| StorageError::DataCorruption { path: path.to_path_buf(), source })?;
    let tmp_path = path.with_extension("json.tmp");
    // A leftover temp file would keep its old permissions.
    remove_file(&tmp_path)?;
    let mut file = open_for_write(&tmp_path, private).map_err(|e| StorageError::io(&tmp_path, e))?;
    file.write_all(content.as_bytes())
        .and_then(|()| file.sync_all())
        .map_err(|e| StorageError::io(&tmp_path, e))?;
    drop(file);
    std::fs::rename(&tmp_path, path).map_err(|e| StorageError::io(path, e))?;
    Ok(())
}

#[cfg(unix)]
fn open_for_write(path: &Path, private: bool) -> std::io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);
    if private {
        options.mode(0o600);
    }
    options.open(path)
}

#[cfg(not(unix))]
fn open_for_write(path: &Path, _private: bool) -> std::io::Result<File> {
    OpenOptions::new().write(true).create_new(true).open(path)
}

/// Removes `path`; returns whether it existed.
pub(crate) fn remove_file(path: &Path) -> Result<bool, StorageError> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(StorageError::io(path, e)),
    }
}
