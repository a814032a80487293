use std::path::{Path, PathBuf};

use prompt_library_core::Prompt;
use prompt_library_core::constants::{LOCAL_ID_PREFIX, LOCAL_PROMPTS_KEY};

use crate::error::StorageError;
use crate::json_file::{read_json, write_json};

/// Offline prompt list persisted under [`LOCAL_PROMPTS_KEY`].
///
/// The list is read and written whole; there is no per-record access.
#[derive(Debug, Clone)]
pub struct LocalPromptStore {
    path: PathBuf,
}

impl LocalPromptStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        Self { path: data_dir.as_ref().join(format!("{LOCAL_PROMPTS_KEY}.json")) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the stored list. A missing file is an empty list.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or holds malformed JSON.
    pub fn load(&self) -> Result<Vec<Prompt>, StorageError> {
        let prompts: Vec<Prompt> = read_json(&self.path)?.unwrap_or_default();
        tracing::debug!(path = %self.path.display(), count = prompts.len(), "loaded local prompts");
        Ok(prompts)
    }

    /// Replaces the stored list.
    ///
    /// # Errors
    /// Returns an error if the data dir cannot be created or the file written.
    pub fn save(&self, prompts: &[Prompt]) -> Result<(), StorageError> {
        write_json(&self.path, prompts)
    }
}

/// Random id for a local-only prompt, disjoint from server-assigned ids.
#[must_use]
pub fn generate_local_id() -> String {
    format!("{LOCAL_ID_PREFIX}{}", uuid::Uuid::new_v4())
}

#[must_use]
pub fn is_local_id(id: &str) -> bool {
    id.starts_with(LOCAL_ID_PREFIX)
}
