//! Runtime configuration from flags and `PROMPT_LIBRARY_*` variables.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use prompt_library_core::constants::{
    APP_DIR_NAME, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS, ENV_API_URL, ENV_DATA_DIR,
    ENV_TIMEOUT_SECS, ENV_TOKEN,
};
use prompt_library_core::{Credential, env_non_empty, env_parse_with_default};
use prompt_library_storage::SessionStore;

#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub api_url: String,
    pub timeout: Duration,
    pub data_dir: PathBuf,
    /// Token from the environment, which wins over the stored session.
    pub env_token: Option<Credential>,
}

impl Config {
    pub(crate) fn resolve(api_url: Option<String>, data_dir: Option<PathBuf>) -> Result<Self> {
        let api_url = api_url
            .or_else(|| env_non_empty(ENV_API_URL))
            .unwrap_or_else(|| DEFAULT_API_URL.to_owned());
        let timeout = Duration::from_secs(env_parse_with_default(ENV_TIMEOUT_SECS, DEFAULT_TIMEOUT_SECS));
        let data_dir = match data_dir.or_else(|| env_non_empty(ENV_DATA_DIR).map(PathBuf::from)) {
            Some(dir) => dir,
            None => default_data_dir(),
        };
        let env_token = env_non_empty(ENV_TOKEN)
            .map(Credential::new)
            .transpose()
            .with_context(|| format!("{ENV_TOKEN} is set but unusable"))?;
        Ok(Self { api_url, timeout, data_dir, env_token })
    }

    pub(crate) fn session_store(&self) -> SessionStore {
        SessionStore::new(&self.data_dir)
    }

    /// Credential to use: environment first, then the stored session.
    pub(crate) fn credential(&self) -> Result<Option<Credential>> {
        if let Some(token) = &self.env_token {
            return Ok(Some(token.clone()));
        }
        Ok(self.session_store().load()?.map(|s| s.credential))
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir().unwrap_or_else(|| PathBuf::from(".")).join(APP_DIR_NAME)
}
