//! [`Publisher`] implementations.
//!
//! [`HttpPublisher`] talks to a JSON relay that fronts the social platform:
//!
//! - `POST {endpoint}/media` with the raw image bytes answers `{"media_id": "..."}`
//! - `POST {endpoint}/posts` with `{"text": "...", "media_ids": [...]}` answers `{"id": "..."}`

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use newsrelay_core::{PostId, PublishError, Publisher};
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Longest slice of an error body carried into [`PublishError::Rejected`].
const MAX_ERROR_BODY_CHARS: usize = 200;

#[derive(Serialize)]
struct PostRequest<'a> {
    text: &'a str,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    media_ids: Vec<String>,
}

#[derive(Deserialize)]
struct PostResponse {
    id: String,
}

#[derive(Deserialize)]
struct MediaResponse {
    media_id: String,
}

pub struct HttpPublisher {
    client: Client,
    endpoint: Url,
    token: Option<String>,
}

impl std::fmt::Debug for HttpPublisher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpPublisher")
            .field("endpoint", &self.endpoint.as_str())
            .field("token", &self.token.as_ref().map(|_| "[redacted]"))
            .finish_non_exhaustive()
    }
}

impl HttpPublisher {
    /// Creates a publisher for the relay at `endpoint`. When `token` is set
    /// every request carries it as a bearer credential.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`ClientError::InvalidUrl`] if `endpoint` does not parse.
    pub fn new(
        endpoint: &str,
        token: Option<&str>,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()?;

        Ok(Self {
            client,
            endpoint: base_url(endpoint)?,
            token: token.map(str::to_owned),
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    fn url(&self, path: &str) -> Result<Url, PublishError> {
        self.endpoint
            .join(path)
            .map_err(|e| PublishError::InvalidResponse(format!("cannot build {path} URL: {e}")))
    }

    async fn upload_media(&self, image: &[u8]) -> Result<String, PublishError> {
        let request = self
            .client
            .post(self.url("media")?)
            .header(CONTENT_TYPE, "application/octet-stream")
            .body(image.to_vec());
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| PublishError::Transport(e.to_string()))?;
        let media: MediaResponse = read_json(response).await?;
        Ok(media.media_id)
    }
}

#[async_trait]
impl Publisher for HttpPublisher {
    async fn post(&self, text: &str, image: Option<&[u8]>) -> Result<PostId, PublishError> {
        // A failed upload still publishes the text.
        let mut media_ids = Vec::new();
        if let Some(bytes) = image {
            match self.upload_media(bytes).await {
                Ok(id) => {
                    tracing::debug!(media_id = %id, bytes = bytes.len(), "uploaded media");
                    media_ids.push(id);
                }
                Err(e) => tracing::warn!(error = %e, "media upload failed, posting text only"),
            }
        }

        let request = self
            .client
            .post(self.url("posts")?)
            .json(&PostRequest { text, media_ids });
        let response = self
            .authorized(request)
            .send()
            .await
            .map_err(|e| PublishError::Transport(e.to_string()))?;
        let posted: PostResponse = read_json(response).await?;
        Ok(PostId(posted.id))
    }
}

async fn read_json<T: for<'de> Deserialize<'de>>(response: Response) -> Result<T, PublishError> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(PublishError::Rejected {
            status: status.as_u16(),
            message: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
        });
    }
    let body = response
        .text()
        .await
        .map_err(|e| PublishError::Transport(e.to_string()))?;
    serde_json::from_str(&body).map_err(|e| PublishError::InvalidResponse(e.to_string()))
}

/// Parse `raw` and ensure it ends with exactly one slash, so relative joins
/// append to the path instead of replacing its last segment.
pub(crate) fn base_url(raw: &str) -> Result<Url, ClientError> {
    let normalised = format!("{}/", raw.trim_end_matches('/'));
    Url::parse(&normalised).map_err(|e| ClientError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

/// Logs posts instead of publishing them.
#[derive(Debug, Default)]
pub struct DryRunPublisher {
    posted: AtomicU64,
}

impl DryRunPublisher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Publisher for DryRunPublisher {
    async fn post(&self, text: &str, image: Option<&[u8]>) -> Result<PostId, PublishError> {
        let n = self.posted.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::info!(
            chars = text.chars().count(),
            image_bytes = image.map_or(0, <[u8]>::len),
            text = %text,
            "dry run: post not published"
        );
        Ok(PostId(format!("dry-run-{n}")))
    }
}
