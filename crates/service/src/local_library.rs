use chrono::Utc;
use prompt_library_core::{Prompt, PromptCache, PromptDraft};
use prompt_library_storage::{LocalPromptStore, generate_local_id};

use crate::error::{PromptError, Removal};

/// Offline prompt list for use without a session.
///
/// Ids are generated locally and never sent anywhere; this list is never
/// merged with a signed-in user's prompts. Every mutation is written through
/// to disk before the in-memory copy changes.
#[derive(Debug)]
pub struct LocalPromptLibrary {
    store: LocalPromptStore,
    cache: PromptCache,
}

impl LocalPromptLibrary {
    /// Opens the list persisted by `store`.
    pub fn open(store: LocalPromptStore) -> Result<Self, PromptError> {
        let cache = PromptCache::from_entries(store.load()?);
        Ok(Self { store, cache })
    }

    #[must_use]
    pub fn snapshot(&self) -> Vec<Prompt> {
        self.cache.to_vec()
    }

    #[must_use]
    pub fn prompts(&self) -> &[Prompt] {
        self.cache.as_slice()
    }

    pub fn create(&mut self, title: &str, content: &str, tag: &str) -> Result<Prompt, PromptError> {
        let draft = PromptDraft::new(title, content, tag)?;
        let prompt = draft.into_prompt(generate_local_id(), Utc::now());
        let mut next = self.cache.clone();
        next.insert(prompt.clone());
        self.commit(next)?;
        tracing::info!(id = %prompt.id, "local prompt created");
        Ok(prompt)
    }

    pub fn update(
        &mut self,
        id: &str,
        title: &str,
        content: &str,
        tag: &str,
    ) -> Result<Prompt, PromptError> {
        let draft = PromptDraft::new(title, content, tag)?;
        let mut prompt =
            self.cache.get(id).cloned().ok_or_else(|| PromptError::NotFound { id: id.to_owned() })?;
        prompt.apply(draft, Utc::now());
        let mut next = self.cache.clone();
        next.upsert(prompt.clone());
        self.commit(next)?;
        tracing::info!(id, "local prompt updated");
        Ok(prompt)
    }

    pub fn remove(&mut self, id: &str) -> Result<Removal, PromptError> {
        let mut next = self.cache.clone();
        if next.remove(id).is_none() {
            return Ok(Removal::AlreadyGone);
        }
        self.commit(next)?;
        tracing::info!(id, "local prompt removed");
        Ok(Removal::Deleted)
    }

    fn commit(&mut self, next: PromptCache) -> Result<(), PromptError> {
        self.store.save(next.as_slice())?;
        self.cache = next;
        Ok(())
    }
}
