use async_trait::async_trait;
use prompt_library_core::{Credential, Prompt, PromptDraft};

use crate::error::RemoteError;

/// Authoritative per-user prompt collection, keyed by prompt id.
///
/// Every call is authenticated with the given bearer credential.
#[async_trait]
pub trait RemotePromptStore: Send + Sync {
    /// Full collection for the authenticated user.
    async fn list(&self, credential: &Credential) -> Result<Vec<Prompt>, RemoteError>;

    /// Creates a prompt; the store assigns id and timestamps.
    async fn create(&self, credential: &Credential, draft: &PromptDraft) -> Result<Prompt, RemoteError>;

    /// Replaces title, content and tag of `id`, refreshing `updated_at`.
    async fn update(
        &self,
        credential: &Credential,
        id: &str,
        draft: &PromptDraft,
    ) -> Result<Prompt, RemoteError>;

    /// Deletes `id`. A missing id surfaces as [`RemoteError::NotFound`].
    async fn delete(&self, credential: &Credential, id: &str) -> Result<(), RemoteError>;
}
