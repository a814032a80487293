use crate::error::{CoreError, Result};

/// Opaque bearer token proving the caller's identity to the remote store.
///
/// The token is never printed: `Debug` redacts it.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wraps a bearer token, rejecting blank input.
    ///
    /// # Errors
    /// Returns [`CoreError::BlankCredential`] if the token is empty after trimming.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(CoreError::BlankCredential);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Raw token, for the `Authorization` header and session persistence only.
    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Value of the `Authorization` header.
    #[must_use]
    pub fn bearer_header(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Credential").field(&"***").finish()
    }
}
