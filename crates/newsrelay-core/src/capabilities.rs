//! Outbound collaborators the pipeline calls but does not implement.
//!
//! Concrete HTTP implementations live in `newsrelay-clients`; tests supply
//! in-memory fakes.

use async_trait::async_trait;
use thiserror::Error;

/// Platform identifier of a published post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostId(pub String);

impl std::fmt::Display for PostId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Error)]
pub enum PublishError {
    /// The request never produced a response (connect failure, timeout).
    #[error("publish transport error: {0}")]
    Transport(String),

    /// The platform answered with a non-success status.
    #[error("publish rejected with status {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("unexpected publish response: {0}")]
    InvalidResponse(String),
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("image transport error: {0}")]
    Transport(String),

    #[error("image service returned status {0}")]
    Status(u16),

    #[error("unexpected image response: {0}")]
    InvalidResponse(String),
}

/// Posts text, optionally with one attached image.
#[async_trait]
pub trait Publisher: Send + Sync {
    /// Publish `text` with an optional image payload.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] when the platform does not confirm the post.
    async fn post(&self, text: &str, image: Option<&[u8]>) -> Result<PostId, PublishError>;
}

/// Finds an illustrative image for a keyword.
#[async_trait]
pub trait ImageSearch: Send + Sync {
    /// Returns the raw image bytes, or `None` when nothing matched.
    ///
    /// # Errors
    ///
    /// Returns [`ImageError`] on transport or decoding failures.
    async fn find(&self, keyword: &str) -> Result<Option<Vec<u8>>, ImageError>;
}
