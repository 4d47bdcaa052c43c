use chrono::{DateTime, Utc};

/// A normalized feed item. The URL is the identity used for history checks.
///
/// Fields are private so an article cannot change after it has been
/// deduplicated and handed to the scheduler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    title: String,
    summary: String,
    url: String,
    published_at: DateTime<Utc>,
    source: String,
    image_hint: Option<String>,
}

impl Article {
    #[must_use]
    pub fn new(
        title: impl Into<String>,
        summary: impl Into<String>,
        url: impl Into<String>,
        published_at: DateTime<Utc>,
        source: impl Into<String>,
        image_hint: Option<String>,
    ) -> Self {
        Self {
            title: title.into(),
            summary: summary.into(),
            url: url.into(),
            published_at,
            source: source.into(),
            image_hint,
        }
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    #[must_use]
    pub fn published_at(&self) -> DateTime<Utc> {
        self.published_at
    }

    /// Name of the configured source the article came from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Image URL advertised by the feed entry, if any.
    #[must_use]
    pub fn image_hint(&self) -> Option<&str> {
        self.image_hint.as_deref()
    }
}
