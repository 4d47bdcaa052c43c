use newsrelay_core::{Article, BotConfig};
use rand::Rng;

use crate::error::ComposeError;
use crate::post::ComposedPost;
use crate::rewrite::{RewriteConfig, Rewriter};
use crate::tags::{TagComposer, TagConfig};

/// Rewrite plus tag composition for one article, driven by the bot config.
pub struct Composer {
    rewriter: Rewriter,
    tags: TagComposer,
    hashtags: Vec<String>,
    mentions: Vec<String>,
}

impl Composer {
    #[must_use]
    pub fn new(
        rewriter: Rewriter,
        tags: TagComposer,
        hashtags: Vec<String>,
        mentions: Vec<String>,
    ) -> Self {
        Self {
            rewriter,
            tags,
            hashtags,
            mentions,
        }
    }

    #[must_use]
    pub fn from_config(config: &BotConfig) -> Self {
        Self::new(
            Rewriter::new(RewriteConfig::from_content(&config.content)),
            TagComposer::new(TagConfig::from_content(&config.content)),
            config.hashtags.clone(),
            config.mentions.clone(),
        )
    }

    /// Build the post text for `article`, including its link when it fits.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError`] when no post can be produced within the limit.
    pub fn compose<R: Rng + ?Sized>(
        &self,
        article: &Article,
        rng: &mut R,
    ) -> Result<ComposedPost, ComposeError> {
        let body = self.rewriter.rewrite(article.title(), article.summary(), rng);
        self.tags.compose(
            &body,
            &self.hashtags,
            &self.mentions,
            Some(article.url()),
            rng,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn article(title: &str) -> Article {
        Article::new(
            title,
            "",
            "https://news.example.com/story",
            Utc.with_ymd_and_hms(2024, 11, 11, 9, 0, 0).unwrap(),
            "coindesk",
            None,
        )
    }

    fn five_tag_config() -> BotConfig {
        let mut config = BotConfig::default();
        config.hashtags = ["#Bitcoin", "#BTC", "#Crypto", "#Blockchain", "#HODL"]
            .iter()
            .map(|t| (*t).to_string())
            .collect();
        config
    }

    #[test]
    fn all_time_high_headline_fits_with_two_of_five_tags() {
        let config = five_tag_config();
        let composer = Composer::from_config(&config);
        for seed in 0..50 {
            let post = composer
                .compose(
                    &article("Bitcoin Price Reaches New All-Time High"),
                    &mut StdRng::seed_from_u64(seed),
                )
                .unwrap();
            assert!(post.char_len() <= 250, "{}", post.body());
            let tags: Vec<&str> = post
                .body()
                .split_whitespace()
                .filter(|w| w.starts_with('#'))
                .collect();
            assert_eq!(tags.len(), 2, "{}", post.body());
            assert!(tags.iter().all(|t| config.hashtags.iter().any(|h| h == t)));
            assert_ne!(tags[0], tags[1]);
        }
    }

    #[test]
    fn same_seed_same_post() {
        let composer = Composer::from_config(&BotConfig::default());
        let headline = article("Ethereum Announces Significant Platform Launch");
        let a = composer
            .compose(&headline, &mut StdRng::seed_from_u64(3))
            .unwrap();
        let b = composer
            .compose(&headline, &mut StdRng::seed_from_u64(3))
            .unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn link_is_appended_when_room_remains() {
        let composer = Composer::from_config(&five_tag_config());
        let post = composer
            .compose(&article("Solana validators upgrade"), &mut StdRng::seed_from_u64(1))
            .unwrap();
        assert!(post.body().ends_with("https://news.example.com/story"));
    }
}
