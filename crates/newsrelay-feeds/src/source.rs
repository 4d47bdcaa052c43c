use async_trait::async_trait;
use chrono::{DateTime, Utc};
use newsrelay_core::SourceConfig;

use crate::error::SourceError;

/// One item as it appeared in a feed, before filtering and normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEntry {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub link: Option<String>,
    pub published: Option<DateTime<Utc>>,
    pub updated: Option<DateTime<Utc>>,
    pub image_url: Option<String>,
}

/// Retrieves the raw entries of one configured source.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// # Errors
    ///
    /// Returns [`SourceError`]; [`SourceError::is_transient`] decides whether
    /// the caller retries.
    async fn fetch(&self, source: &SourceConfig) -> Result<Vec<RawEntry>, SourceError>;
}
