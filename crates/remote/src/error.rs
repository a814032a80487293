//! Typed error enum for the remote store crate.

use thiserror::Error;

/// Errors from remote prompt store calls.
#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] reqwest::Error),
    /// 401: the credential is missing, invalid or expired.
    #[error("credential rejected by prompt store")]
    Unauthorized,
    /// 404: the addressed prompt does not exist server-side.
    #[error("prompt not found in store")]
    NotFound,
    #[error("HTTP status {code}: {body}")]
    HttpStatus { code: u16, body: String },
    #[error("JSON parse error in {context}: {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("client initialization failed: {0}")]
    ClientInit(String),
}

impl RemoteError {
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized)
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}
