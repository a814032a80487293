use std::time::Duration;

use async_trait::async_trait;
use prompt_library_core::constants::PROMPTS_PATH;
use prompt_library_core::{Credential, Prompt, PromptDraft};
use reqwest::{Method, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;

use crate::error::RemoteError;
use crate::store::RemotePromptStore;

/// Maximum error body length kept in [`RemoteError::HttpStatus`].
pub const MAX_ERROR_BODY_LEN: usize = 500;

/// reqwest-backed [`RemotePromptStore`].
pub struct HttpPromptStore {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for HttpPromptStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPromptStore").field("base_url", &self.base_url.as_str()).finish()
    }
}

impl HttpPromptStore {
    /// Creates a store client rooted at `base_url` (e.g. `https://host/api`).
    ///
    /// # Errors
    /// Returns an error if the URL cannot be used as a base or the HTTP client
    /// cannot be built (TLS backend failure).
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RemoteError> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed).map_err(|e| RemoteError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(RemoteError::InvalidBaseUrl {
                url: base_url.to_owned(),
                reason: "URL cannot be a base".to_owned(),
            });
        }
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| RemoteError::ClientInit(e.to_string()))?;
        Ok(Self { client, base_url: parsed })
    }

    /// Returns the base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    fn url(&self, id: Option<&str>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(PROMPTS_PATH);
            if let Some(id) = id {
                // push() percent-encodes, so an id can never escape its segment.
                segments.push(id);
            }
        }
        url
    }

    fn request(&self, method: Method, url: Url, credential: &Credential) -> RequestBuilder {
        tracing::debug!(%method, %url, "prompt store request");
        self.client.request(method, url).header(reqwest::header::AUTHORIZATION, credential.bearer_header())
    }
}

#[async_trait]
impl RemotePromptStore for HttpPromptStore {
    async fn list(&self, credential: &Credential) -> Result<Vec<Prompt>, RemoteError> {
        let response = self.request(Method::GET, self.url(None), credential).send().await?;
        decode(check_status(response).await?, "prompt list").await
    }

    async fn create(&self, credential: &Credential, draft: &PromptDraft) -> Result<Prompt, RemoteError> {
        let response =
            self.request(Method::POST, self.url(None), credential).json(draft).send().await?;
        decode(check_status(response).await?, "created prompt").await
    }

    async fn update(
        &self,
        credential: &Credential,
        id: &str,
        draft: &PromptDraft,
    ) -> Result<Prompt, RemoteError> {
        let response =
            self.request(Method::PUT, self.url(Some(id)), credential).json(draft).send().await?;
        decode(check_status(response).await?, "updated prompt").await
    }

    async fn delete(&self, credential: &Credential, id: &str) -> Result<(), RemoteError> {
        let response = self.request(Method::DELETE, self.url(Some(id)), credential).send().await?;
        check_status(response).await?;
        Ok(())
    }
}

async fn check_status(response: Response) -> Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    match status.as_u16() {
        401 => Err(RemoteError::Unauthorized),
        404 => Err(RemoteError::NotFound),
        code => {
            let body =
                response.text().await.unwrap_or_else(|_| "Could not read error body".to_owned());
            Err(RemoteError::HttpStatus { code, body: truncate(&body, MAX_ERROR_BODY_LEN).to_owned() })
        },
    }
}

async fn decode<T: DeserializeOwned>(response: Response, what: &str) -> Result<T, RemoteError> {
    let body = response.text().await?;
    serde_json::from_str(&body).map_err(|e| RemoteError::JsonParse {
        context: format!("{what} (body: {})", truncate(&body, 200)),
        source: e,
    })
}

/// Truncates a string to the given maximum length at a char boundary.
#[must_use]
pub fn truncate(s: &str, max_len: usize) -> &str {
    if s.len() <= max_len {
        s
    } else {
        let mut end = max_len;
        while end > 0 && !s.is_char_boundary(end) {
            end = end.saturating_sub(1);
        }
        s.get(..end).unwrap_or("")
    }
}
