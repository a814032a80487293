//! Shared constants for the prompt library.

/// Base URL of the remote prompt store when none is configured.
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8787/api";

/// HTTP request timeout in seconds when none is configured.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Resource collection path on the remote store.
pub const PROMPTS_PATH: &str = "prompts";

/// Namespaced key under which the local fallback list is persisted.
pub const LOCAL_PROMPTS_KEY: &str = "prompt-library.local-prompts";

/// Prefix for client-generated ids, keeps them disjoint from server ids.
pub const LOCAL_ID_PREFIX: &str = "local-";

/// Directory name under the platform data dir.
pub const APP_DIR_NAME: &str = "prompt-library";

/// File holding the persisted sign-in session.
pub const SESSION_FILE_NAME: &str = "session.json";

pub const ENV_API_URL: &str = "PROMPT_LIBRARY_API_URL";
pub const ENV_TOKEN: &str = "PROMPT_LIBRARY_TOKEN";
pub const ENV_TIMEOUT_SECS: &str = "PROMPT_LIBRARY_TIMEOUT_SECS";
pub const ENV_DATA_DIR: &str = "PROMPT_LIBRARY_DATA_DIR";
