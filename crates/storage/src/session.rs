use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use prompt_library_core::Credential;
use prompt_library_core::constants::SESSION_FILE_NAME;
use serde::{Deserialize, Serialize};

use crate::error::StorageError;
use crate::json_file::{read_json, remove_file, write_private_json};

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionRecord {
    token: String,
    login_time: DateTime<Utc>,
}

/// A persisted sign-in.
#[derive(Debug, Clone)]
pub struct StoredSession {
    pub credential: Credential,
    pub login_time: DateTime<Utc>,
}

/// Persists the bearer credential between runs.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self { path: data_dir.as_ref().join(SESSION_FILE_NAME) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Stores `credential` stamped with the current time.
    ///
    /// # Errors
    /// Returns an error if the session file cannot be written.
    pub fn save(&self, credential: &Credential) -> Result<StoredSession, StorageError> {
        let record = SessionRecord { token: credential.expose().to_owned(), login_time: Utc::now() };
        write_private_json(&self.path, &record)?;
        tracing::info!(path = %self.path.display(), "session saved");
        Ok(StoredSession { credential: credential.clone(), login_time: record.login_time })
    }

    /// Loads the stored session, if any.
    ///
    /// An unreadable session record is discarded: it is deleted, logged, and
    /// treated as signed out.
    ///
    /// # Errors
    /// Returns an error only for I/O failures.
    pub fn load(&self) -> Result<Option<StoredSession>, StorageError> {
        let record: SessionRecord = match read_json(&self.path) {
            Ok(Some(r)) => r,
            Ok(None) => return Ok(None),
            Err(e) if e.is_corruption() => {
                tracing::warn!(error = %e, "discarding unreadable session file");
                remove_file(&self.path)?;
                return Ok(None);
            },
            Err(e) => return Err(e),
        };
        match Credential::new(record.token) {
            Ok(credential) => Ok(Some(StoredSession { credential, login_time: record.login_time })),
            Err(e) => {
                tracing::warn!(error = %e, "discarding session with blank token");
                remove_file(&self.path)?;
                Ok(None)
            },
        }
    }

    /// Removes the stored session; returns whether one existed.
    ///
    /// # Errors
    /// Returns an error if the file exists but cannot be removed.
    pub fn clear(&self) -> Result<bool, StorageError> {
        remove_file(&self.path)
    }
}
