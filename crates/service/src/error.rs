//! Typed error enum for the service layer.
//!
//! Every manager failure is returned as a [`PromptError`] so the presentation
//! layer can match on the failure mode instead of parsing messages.

use prompt_library_core::CoreError;
use prompt_library_remote::RemoteError;
use prompt_library_storage::StorageError;
use thiserror::Error;

/// Why an operation was refused for lack of a valid session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthFailure {
    /// No credential present; nothing was sent.
    #[error("not signed in")]
    MissingCredential,
    /// The store answered 401.
    #[error("credential rejected, please sign in again")]
    Rejected,
    /// The user signed out or switched while the request was outstanding;
    /// its response was not applied.
    #[error("signed-in user changed before the request completed")]
    SessionChanged,
}

/// Manager-boundary error.
#[derive(Debug, Error)]
pub enum PromptError {
    /// Empty title or content after trimming. Nothing was sent.
    #[error("invalid input: {0}")]
    Validation(#[from] CoreError),

    #[error("authentication: {0}")]
    Authentication(AuthFailure),

    /// The prompt does not exist in the store (update only; delete treats it as success).
    #[error("prompt {id} not found")]
    NotFound { id: String },

    /// Network failure, unexpected status, or undecodable response.
    #[error("prompt store unavailable: {0}")]
    Transport(#[source] RemoteError),

    /// Another update/remove on the same id is still outstanding.
    #[error("an operation on prompt {id} is already in flight")]
    Busy { id: String },

    /// Local fallback file could not be read or written.
    #[error("local storage: {0}")]
    Storage(#[from] StorageError),
}

impl PromptError {
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    #[must_use]
    pub const fn is_missing_credential(&self) -> bool {
        matches!(self, Self::Authentication(AuthFailure::MissingCredential))
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Maps a store failure on a collection-level call (list, create).
    pub(crate) fn from_remote(err: RemoteError) -> Self {
        match err {
            RemoteError::Unauthorized => Self::Authentication(AuthFailure::Rejected),
            other => Self::Transport(other),
        }
    }
}

/// Outcome of a successful remove.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Removal {
    /// The store deleted the prompt.
    Deleted,
    /// The store no longer had it; treated as success.
    AlreadyGone,
}
