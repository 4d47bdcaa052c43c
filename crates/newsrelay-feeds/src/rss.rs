//! RSS/Atom [`FeedSource`] over HTTP.

use std::time::Duration;

use async_trait::async_trait;
use feed_rs::model::Entry;
use newsrelay_core::SourceConfig;
use reqwest::Client;

use crate::error::SourceError;
use crate::source::{FeedSource, RawEntry};

/// Fetches and parses RSS 2.0, Atom, and JSON Feed documents.
pub struct RssFeedSource {
    client: Client,
}

impl RssFeedSource {
    /// Creates a source whose requests all share the given timeout and `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError::Http`] if the `reqwest::Client` cannot be built.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, SourceError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(timeout_secs.min(10)))
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FeedSource for RssFeedSource {
    async fn fetch(&self, source: &SourceConfig) -> Result<Vec<RawEntry>, SourceError> {
        let response = self.client.get(&source.url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            return Err(SourceError::RateLimited {
                url: source.url.clone(),
            });
        }
        if !status.is_success() {
            return Err(SourceError::UnexpectedStatus {
                status: status.as_u16(),
                url: source.url.clone(),
            });
        }

        let body = response.bytes().await?;
        let entries = parse_feed(&body, &source.url)?;
        tracing::debug!(
            source = %source.name,
            entries = entries.len(),
            "parsed feed"
        );
        Ok(entries)
    }
}

/// Parse a feed document into raw entries, in document order.
///
/// # Errors
///
/// Returns [`SourceError::Parse`] if the body is not a recognizable feed.
pub fn parse_feed(body: &[u8], url: &str) -> Result<Vec<RawEntry>, SourceError> {
    let feed = feed_rs::parser::parse(body).map_err(|e| SourceError::Parse {
        url: url.to_string(),
        reason: e.to_string(),
    })?;
    Ok(feed.entries.into_iter().map(raw_entry).collect())
}

fn raw_entry(entry: Entry) -> RawEntry {
    let image_url = image_url(&entry);

    let link = entry
        .links
        .iter()
        .find(|l| l.rel.as_deref().is_none_or(|rel| rel == "alternate"))
        .or_else(|| entry.links.first())
        .map(|l| l.href.trim().to_string())
        .filter(|href| !href.is_empty());

    let summary = entry
        .summary
        .map(|s| s.content)
        .or_else(|| entry.content.and_then(|c| c.body))
        .map(|s| strip_html(&s))
        .filter(|s| !s.is_empty());

    RawEntry {
        title: entry
            .title
            .map(|t| strip_html(&t.content))
            .filter(|t| !t.is_empty()),
        summary,
        link,
        published: entry.published,
        updated: entry.updated,
        image_url,
    }
}

/// First image advertised by the entry: media content, then media
/// thumbnails, then an `image/*` enclosure link.
fn image_url(entry: &Entry) -> Option<String> {
    let from_media = entry.media.iter().find_map(|m| {
        m.content
            .iter()
            .filter(|c| {
                c.content_type
                    .as_ref()
                    .is_none_or(|t| t.essence().to_string().starts_with("image/"))
            })
            .find_map(|c| c.url.as_ref().map(ToString::to_string))
            .or_else(|| m.thumbnails.first().map(|t| t.image.uri.clone()))
    });

    from_media.or_else(|| {
        entry
            .links
            .iter()
            .find(|l| {
                l.rel.as_deref() == Some("enclosure")
                    && l.media_type
                        .as_deref()
                        .is_some_and(|t| t.starts_with("image/"))
            })
            .map(|l| l.href.clone())
    })
}

/// Strip HTML tags and collapse whitespace.
fn strip_html(html: &str) -> String {
    let mut result = String::with_capacity(html.len());
    let mut in_tag = false;
    let mut chars = html.chars().peekable();
    while let Some(ch) = chars.next() {
        match ch {
            // A bare `<` in text, as in "BTC < $70k", is kept.
            '<' if !in_tag
                && chars
                    .peek()
                    .is_some_and(|&c| c.is_ascii_alphabetic() || matches!(c, '/' | '!')) =>
            {
                in_tag = true;
            }
            '>' if in_tag => {
                in_tag = false;
                result.push(' ');
            }
            _ if !in_tag => result.push(ch),
            _ => {}
        }
    }
    result.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_RSS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/">
  <channel>
    <title>Crypto Wire</title>
    <item>
      <title>Bitcoin Price Reaches New All-Time High</title>
      <link>https://example.com/btc-ath</link>
      <description><![CDATA[<p>BTC broke <b>$75,000</b> overnight.</p>]]></description>
      <pubDate>Mon, 11 Nov 2024 09:30:00 GMT</pubDate>
      <media:content url="https://example.com/btc.jpg" medium="image" type="image/jpeg"/>
    </item>
    <item>
      <title>Ethereum upgrade scheduled</title>
      <link>https://example.com/eth-upgrade</link>
    </item>
  </channel>
</rss>"#;

    #[test]
    fn parses_rss_items_in_order() {
        let entries = parse_feed(SAMPLE_RSS.as_bytes(), "https://example.com/rss").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(
            entries[0].title.as_deref(),
            Some("Bitcoin Price Reaches New All-Time High")
        );
        assert_eq!(entries[0].link.as_deref(), Some("https://example.com/btc-ath"));
        assert_eq!(
            entries[0].summary.as_deref(),
            Some("BTC broke $75,000 overnight.")
        );
        assert!(entries[0].published.is_some());
        assert_eq!(entries[1].link.as_deref(), Some("https://example.com/eth-upgrade"));
    }

    #[test]
    fn extracts_media_image_hint() {
        let entries = parse_feed(SAMPLE_RSS.as_bytes(), "https://example.com/rss").unwrap();
        assert_eq!(
            entries[0].image_url.as_deref(),
            Some("https://example.com/btc.jpg")
        );
        assert!(entries[1].image_url.is_none());
    }

    #[test]
    fn undated_entry_has_no_timestamps() {
        let entries = parse_feed(SAMPLE_RSS.as_bytes(), "https://example.com/rss").unwrap();
        assert!(entries[1].published.is_none());
        assert!(entries[1].summary.is_none());
    }

    #[test]
    fn parses_atom_updated_time() {
        let atom = r#"<?xml version="1.0" encoding="utf-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <title>Atom Wire</title>
  <id>urn:example:feed</id>
  <updated>2024-11-11T10:00:00Z</updated>
  <entry>
    <title>Solana network upgrade</title>
    <id>urn:example:1</id>
    <link href="https://example.com/sol"/>
    <updated>2024-11-11T10:00:00Z</updated>
    <summary>Validators adopt new release.</summary>
  </entry>
</feed>"#;
        let entries = parse_feed(atom.as_bytes(), "https://example.com/atom").unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].published.is_none());
        assert!(entries[0].updated.is_some());
        assert_eq!(entries[0].link.as_deref(), Some("https://example.com/sol"));
    }

    #[test]
    fn malformed_body_is_parse_error() {
        let err = parse_feed(b"this is not a feed", "https://example.com/rss").unwrap_err();
        assert!(matches!(err, SourceError::Parse { .. }));
        assert!(!err.is_transient());
    }

    #[test]
    fn strip_html_removes_tags_and_collapses_whitespace() {
        assert_eq!(
            strip_html("<p>Hello\n  <em>world</em></p>"),
            "Hello world"
        );
    }

    #[test]
    fn strip_html_keeps_literal_less_than() {
        assert_eq!(
            strip_html("BTC < $70k as miners sell"),
            "BTC < $70k as miners sell"
        );
        assert_eq!(strip_html("<b>ETH</b> <2% fee <!-- x -->"), "ETH <2% fee");
    }
}
