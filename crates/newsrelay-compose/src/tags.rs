//! Hashtag and mention assembly under the platform character limit.

use std::collections::HashSet;

use newsrelay_core::ContentConfig;
use rand::seq::IndexedRandom;
use rand::Rng;

use crate::error::ComposeError;
use crate::post::ComposedPost;
use crate::rewrite::truncate_at_word;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagConfig {
    pub max_post_length: usize,
    pub hashtags_per_post: usize,
    pub include_mentions: bool,
}

impl TagConfig {
    #[must_use]
    pub fn from_content(content: &ContentConfig) -> Self {
        Self {
            max_post_length: content.max_post_length,
            hashtags_per_post: content.hashtags_per_post,
            include_mentions: content.include_mentions,
        }
    }
}

pub struct TagComposer {
    config: TagConfig,
}

impl TagComposer {
    #[must_use]
    pub fn new(config: TagConfig) -> Self {
        Self { config }
    }

    /// Assemble `body [mention] #tag1 #tag2 ... [url]` within the limit.
    ///
    /// Hashtags are drawn without replacement and dropped from the end while
    /// the post is too long. The mention is never dropped; if body and
    /// mention alone overflow, the body is cut at a word boundary with
    /// `"..."`. The URL is appended only if it still fits.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::EmptyBody`] for a blank body and
    /// [`ComposeError::LimitTooSmall`] when the mention leaves no room for
    /// a truncated body.
    pub fn compose<R: Rng + ?Sized>(
        &self,
        body: &str,
        hashtags: &[String],
        mentions: &[String],
        url: Option<&str>,
        rng: &mut R,
    ) -> Result<ComposedPost, ComposeError> {
        let limit = self.config.max_post_length;
        let body = body.trim();
        if body.is_empty() {
            return Err(ComposeError::EmptyBody);
        }

        let pool = distinct(hashtags);
        let mut tags: Vec<&str> = pool
            .choose_multiple(rng, self.config.hashtags_per_post)
            .copied()
            .collect();

        let mention = if self.config.include_mentions {
            mentions.choose(rng).map(|m| m.trim())
        } else {
            None
        };

        let mention_len = mention.map_or(0, |m| m.chars().count() + 1);
        let body_budget = limit.saturating_sub(mention_len);
        let body = if body.chars().count() > body_budget {
            let required = mention_len + 4;
            if body_budget < 4 {
                return Err(ComposeError::LimitTooSmall { limit, required });
            }
            let cut = truncate_at_word(body, body_budget);
            tracing::debug!(limit, body_budget, "hard-truncated body to fit mention");
            cut
        } else {
            body.to_string()
        };

        let head = match mention {
            Some(m) => format!("{body} {m}"),
            None => body,
        };

        let mut text = with_tags(&head, &tags);
        while text.chars().count() > limit && !tags.is_empty() {
            tags.pop();
            text = with_tags(&head, &tags);
        }

        if let Some(url) = url.map(str::trim).filter(|u| !u.is_empty()) {
            if text.chars().count() + url.chars().count() + 1 <= limit {
                text.push(' ');
                text.push_str(url);
            }
        }

        ComposedPost::new(text, limit)
    }
}

fn with_tags(head: &str, tags: &[&str]) -> String {
    if tags.is_empty() {
        head.to_string()
    } else {
        format!("{head} {}", tags.join(" "))
    }
}

/// Non-blank tags, first spelling wins for case-insensitive repeats.
fn distinct(tags: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    tags.iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty() && seen.insert(t.to_lowercase()))
        .collect()
}

#[cfg(test)]
#[path = "tags_test.rs"]
mod tests;
