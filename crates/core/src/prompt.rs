use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// A saved, reusable piece of text with a title and optional tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    /// Store-assigned identifier, immutable once assigned.
    pub id: String,
    pub title: String,
    pub content: String,
    /// Free-form label, empty when unset.
    #[serde(default)]
    pub tag: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Validated `{title, content, tag}` payload for create and update requests.
///
/// Only obtainable through [`PromptDraft::new`], so a draft in hand always has
/// a non-empty trimmed title and content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PromptDraft {
    title: String,
    content: String,
    tag: String,
}

impl PromptDraft {
    /// Trims all fields and checks that title and content are non-empty.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptyField`] naming the first empty required field.
    pub fn new(title: &str, content: &str, tag: &str) -> Result<Self> {
        let title = title.trim();
        let content = content.trim();
        if title.is_empty() {
            return Err(CoreError::EmptyField("title"));
        }
        if content.is_empty() {
            return Err(CoreError::EmptyField("content"));
        }
        Ok(Self { title: title.to_owned(), content: content.to_owned(), tag: tag.trim().to_owned() })
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Materializes the draft as a prompt with caller-supplied identity.
    /// Used by the local fallback, which has no store to assign these.
    #[must_use]
    pub fn into_prompt(self, id: String, created_at: DateTime<Utc>) -> Prompt {
        Prompt {
            id,
            title: self.title,
            content: self.content,
            tag: self.tag,
            created_at,
            updated_at: created_at,
        }
    }
}

impl Prompt {
    /// Applies an edit in place, keeping `id` and `created_at`.
    pub fn apply(&mut self, draft: PromptDraft, updated_at: DateTime<Utc>) {
        self.title = draft.title;
        self.content = draft.content;
        self.tag = draft.tag;
        self.updated_at = updated_at;
    }
}
