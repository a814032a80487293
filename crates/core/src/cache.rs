//! Newest-first ordered collection of prompts.
//!
//! Entries are kept sorted by `created_at` descending. Ties keep their
//! relative insertion order, except that a newly inserted entry goes ahead of
//! existing entries with the same timestamp (it is "prepended").

use crate::Prompt;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptCache {
    entries: Vec<Prompt>,
}

impl PromptCache {
    #[must_use]
    pub const fn new() -> Self {
        Self { entries: Vec::new() }
    }

    /// Builds a cache from an arbitrary list, stably sorting it.
    #[must_use]
    pub fn from_entries(entries: Vec<Prompt>) -> Self {
        let mut cache = Self { entries };
        cache.sort();
        cache
    }

    /// Replaces every entry; no merge with previous contents.
    pub fn replace_all(&mut self, entries: Vec<Prompt>) {
        self.entries = entries;
        self.sort();
    }

    /// Inserts ahead of every entry that is not newer than `prompt`.
    pub fn insert(&mut self, prompt: Prompt) {
        let pos = self
            .entries
            .iter()
            .position(|p| p.created_at <= prompt.created_at)
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, prompt);
    }

    /// Replaces the entry with the same id in place, or inserts it when absent.
    ///
    /// Returns `true` if an existing entry was replaced.
    pub fn upsert(&mut self, prompt: Prompt) -> bool {
        match self.entries.iter().position(|p| p.id == prompt.id) {
            Some(idx) => {
                let reordered = self.entries[idx].created_at != prompt.created_at;
                self.entries[idx] = prompt;
                if reordered {
                    self.sort();
                }
                true
            },
            None => {
                self.insert(prompt);
                false
            },
        }
    }

    /// Removes the entry with `id`, if any.
    pub fn remove(&mut self, id: &str) -> Option<Prompt> {
        let idx = self.entries.iter().position(|p| p.id == id)?;
        Some(self.entries.remove(idx))
    }

    #[must_use]
    pub fn get(&self, id: &str) -> Option<&Prompt> {
        self.entries.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn as_slice(&self) -> &[Prompt] {
        &self.entries
    }

    #[must_use]
    pub fn to_vec(&self) -> Vec<Prompt> {
        self.entries.clone()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn sort(&mut self) {
        // `sort_by` is stable, which is what keeps ties in insertion order.
        self.entries.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    }
}

/// Whether `prompts` is sorted by `created_at` descending.
#[must_use]
pub fn is_newest_first(prompts: &[Prompt]) -> bool {
    prompts.windows(2).all(|w| w[0].created_at >= w[1].created_at)
}
