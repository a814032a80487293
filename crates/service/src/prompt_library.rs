use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use prompt_library_core::{Credential, Prompt, PromptCache, PromptDraft};
use prompt_library_remote::{RemoteError, RemotePromptStore};
use tokio::sync::{RwLock, RwLockWriteGuard};

use crate::error::{AuthFailure, PromptError, Removal};
use crate::in_flight::{InFlight, InFlightGuard};

/// Client-side cache of a signed-in user's prompts, kept consistent with the
/// remote store.
///
/// Operations take `&self` and may be issued concurrently. The cache lock is
/// only taken once the store has answered, so each completion applies its
/// change atomically and the last response to arrive wins for a given id.
/// A response that arrives after the credential changed is discarded.
pub struct PromptLibrary {
    store: Arc<dyn RemotePromptStore>,
    credential: RwLock<Option<Credential>>,
    /// Bumped under the credential write lock whenever the user changes.
    session: AtomicU64,
    cache: RwLock<PromptCache>,
    in_flight: Option<InFlight>,
}

impl std::fmt::Debug for PromptLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromptLibrary")
            .field("guarded", &self.in_flight.is_some())
            .finish_non_exhaustive()
    }
}

impl PromptLibrary {
    #[must_use]
    pub fn new(store: Arc<dyn RemotePromptStore>, credential: Option<Credential>) -> Self {
        Self {
            store,
            credential: RwLock::new(credential),
            session: AtomicU64::new(0),
            cache: RwLock::new(PromptCache::new()),
            in_flight: None,
        }
    }

    /// Rejects an update/remove on an id that already has one outstanding,
    /// instead of letting both race.
    #[must_use]
    pub fn with_in_flight_guard(mut self) -> Self {
        self.in_flight = Some(InFlight::default());
        self
    }

    /// Switches to `credential`. A different user starts with an empty cache.
    pub async fn sign_in(&self, credential: Credential) {
        let mut current = self.credential.write().await;
        if current.as_ref() != Some(&credential) {
            self.session.fetch_add(1, Ordering::SeqCst);
            self.cache.write().await.clear();
        }
        *current = Some(credential);
    }

    /// Drops the credential and the cached prompts.
    pub async fn sign_out(&self) {
        let mut current = self.credential.write().await;
        *current = None;
        self.session.fetch_add(1, Ordering::SeqCst);
        self.cache.write().await.clear();
        tracing::info!("signed out, prompt cache cleared");
    }

    pub async fn is_signed_in(&self) -> bool {
        self.credential.read().await.is_some()
    }

    /// Current cache contents, newest first.
    pub async fn snapshot(&self) -> Vec<Prompt> {
        self.cache.read().await.to_vec()
    }

    pub async fn len(&self) -> usize {
        self.cache.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.cache.read().await.is_empty()
    }

    /// Replaces the whole cache with the store's collection.
    ///
    /// Returns the number of prompts loaded. Without a credential this does
    /// nothing and reports [`AuthFailure::MissingCredential`].
    pub async fn load(&self) -> Result<usize, PromptError> {
        let (credential, session) = self.credential("load").await?;
        let prompts = self.store.list(&credential).await.map_err(PromptError::from_remote)?;
        let count = prompts.len();
        self.cache_for(session, "load").await?.replace_all(prompts);
        tracing::info!(count, "prompt library loaded");
        Ok(count)
    }

    /// Creates a prompt and puts the stored result at the head of the cache.
    pub async fn create(&self, title: &str, content: &str, tag: &str) -> Result<Prompt, PromptError> {
        let draft = PromptDraft::new(title, content, tag)?;
        let (credential, session) = self.credential("create").await?;
        let created =
            self.store.create(&credential, &draft).await.map_err(PromptError::from_remote)?;
        self.cache_for(session, "create").await?.insert(created.clone());
        tracing::info!(id = %created.id, "prompt created");
        Ok(created)
    }

    /// Updates `id` and replaces its cache entry with the stored result.
    ///
    /// If the store no longer has `id`, the local copy is dropped and
    /// [`PromptError::NotFound`] is returned.
    pub async fn update(
        &self,
        id: &str,
        title: &str,
        content: &str,
        tag: &str,
    ) -> Result<Prompt, PromptError> {
        let draft = PromptDraft::new(title, content, tag)?;
        let (credential, session) = self.credential("update").await?;
        let _guard = self.begin(id)?;

        match self.store.update(&credential, id, &draft).await {
            Ok(updated) => {
                let replaced = self.cache_for(session, "update").await?.upsert(updated.clone());
                if !replaced {
                    tracing::warn!(id, "updated prompt was missing from cache, inserted it");
                }
                tracing::info!(id, "prompt updated");
                Ok(updated)
            },
            Err(RemoteError::NotFound) => {
                let dropped = self.cache_for(session, "update").await?.remove(id).is_some();
                tracing::warn!(id, dropped, "prompt no longer exists in store");
                Err(PromptError::NotFound { id: id.to_owned() })
            },
            Err(e) => Err(PromptError::from_remote(e)),
        }
    }

    /// Deletes `id` and removes it from the cache.
    ///
    /// A prompt the store no longer has counts as removed. Callers are
    /// expected to have confirmed the deletion with the user beforehand.
    pub async fn remove(&self, id: &str) -> Result<Removal, PromptError> {
        let (credential, session) = self.credential("remove").await?;
        let _guard = self.begin(id)?;

        let removal = match self.store.delete(&credential, id).await {
            Ok(()) => Removal::Deleted,
            Err(RemoteError::NotFound) => Removal::AlreadyGone,
            Err(e) => return Err(PromptError::from_remote(e)),
        };
        let dropped = self.cache_for(session, "remove").await?.remove(id).is_some();
        tracing::info!(id, ?removal, dropped, "prompt removed");
        Ok(removal)
    }

    /// The current credential and the session it belongs to.
    async fn credential(&self, operation: &'static str) -> Result<(Credential, u64), PromptError> {
        let current = self.credential.read().await;
        match current.as_ref() {
            Some(c) => Ok((c.clone(), self.session.load(Ordering::SeqCst))),
            None => {
                tracing::debug!(operation, "no credential, skipping prompt store call");
                Err(PromptError::Authentication(AuthFailure::MissingCredential))
            },
        }
    }

    /// Write access to the cache, refused if the user changed since `session`.
    async fn cache_for(
        &self,
        session: u64,
        operation: &'static str,
    ) -> Result<RwLockWriteGuard<'_, PromptCache>, PromptError> {
        let cache = self.cache.write().await;
        if self.session.load(Ordering::SeqCst) != session {
            tracing::warn!(operation, "session changed while request was in flight, response discarded");
            return Err(PromptError::Authentication(AuthFailure::SessionChanged));
        }
        Ok(cache)
    }

    fn begin(&self, id: &str) -> Result<Option<InFlightGuard<'_>>, PromptError> {
        self.in_flight.as_ref().map(|guard| guard.begin(id)).transpose()
    }
}
