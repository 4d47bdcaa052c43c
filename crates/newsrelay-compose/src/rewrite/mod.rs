//! Headline rewriting: clean, substitute, simplify, embellish, then bound.

mod clean;
mod length;
mod lexicon;

pub use lexicon::Lexicon;

pub(crate) use length::truncate_at_word;

use newsrelay_core::ContentConfig;
use rand::distr::{Bernoulli, Distribution};
use rand::seq::IndexedRandom;
use rand::Rng;
use regex::Regex;

use crate::error::ComposeError;
use clean::clean_text;
use length::cap_words;
use lexicon::STRUCTURAL_RULES;

#[derive(Debug, Clone, PartialEq)]
pub struct RewriteConfig {
    pub max_words: usize,
    /// Character budget of the body, leaving room for tags.
    pub max_content_chars: usize,
    pub prefix_probability: f64,
    pub suffix_probability: f64,
    pub fallback_chars: usize,
}

impl RewriteConfig {
    #[must_use]
    pub fn from_content(content: &ContentConfig) -> Self {
        Self {
            max_words: content.max_words,
            max_content_chars: content
                .max_post_length
                .saturating_sub(content.reserved_chars),
            prefix_probability: content.prefix_probability,
            suffix_probability: content.suffix_probability,
            fallback_chars: content.fallback_chars,
        }
    }
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self::from_content(&ContentConfig::default())
    }
}

pub struct Rewriter {
    config: RewriteConfig,
    lexicon: Lexicon,
    rules: Vec<(Regex, &'static str)>,
}

impl Rewriter {
    #[must_use]
    pub fn new(config: RewriteConfig) -> Self {
        Self::with_lexicon(config, Lexicon::default())
    }

    #[must_use]
    pub fn with_lexicon(config: RewriteConfig, lexicon: Lexicon) -> Self {
        let rules = STRUCTURAL_RULES
            .iter()
            .map(|(phrase, replacement)| {
                let pattern = format!(r"(?i)\b{}\b", regex::escape(phrase));
                let re = Regex::new(&pattern).expect("valid structural regex");
                (re, *replacement)
            })
            .collect();
        Self {
            config,
            lexicon,
            rules,
        }
    }

    #[must_use]
    pub fn config(&self) -> &RewriteConfig {
        &self.config
    }

    /// Rewrite a headline into a post body.
    ///
    /// Never fails: if any rewriting step errors, the cleaned title cut to
    /// `fallback_chars` characters is returned instead. The result depends
    /// only on the inputs and the state of `rng`.
    pub fn rewrite<R: Rng + ?Sized>(&self, title: &str, summary: &str, rng: &mut R) -> String {
        match self.try_rewrite(title, summary, rng) {
            Ok(body) => {
                tracing::debug!(original = title, rewritten = %body, "rewrote headline");
                body
            }
            Err(e) => {
                tracing::warn!(original = title, error = %e, "rewrite failed, using cleaned title");
                self.fallback(title)
            }
        }
    }

    /// Rewrite without the fallback.
    ///
    /// The summary is used only when the title is empty after cleaning.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError`] when the lexicon or probabilities are unusable,
    /// or when there is no text to rewrite.
    pub fn try_rewrite<R: Rng + ?Sized>(
        &self,
        title: &str,
        summary: &str,
        rng: &mut R,
    ) -> Result<String, ComposeError> {
        let mut text = clean_text(title);
        if text.is_empty() {
            text = clean_text(summary);
        }
        if text.is_empty() {
            return Err(ComposeError::EmptyBody);
        }

        let substituted = self.substitute(&text, rng)?;
        let simplified = self.simplify(&substituted);
        let embellished = self.embellish(&simplified, rng)?;

        let capped = cap_words(&embellished, self.config.max_words);
        Ok(truncate_at_word(&capped, self.config.max_content_chars))
    }

    fn fallback(&self, title: &str) -> String {
        clean_text(title)
            .chars()
            .take(self.config.fallback_chars)
            .collect()
    }

    fn substitute<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> Result<String, ComposeError> {
        let mut words = Vec::new();
        for word in text.split_whitespace() {
            let key: String = word
                .chars()
                .filter(|c| c.is_alphanumeric() || *c == '_')
                .collect::<String>()
                .to_lowercase();

            let Some(choices) = self.lexicon.synonyms_for(&key)? else {
                words.push(word.to_string());
                continue;
            };
            let choice = choices
                .choose(rng)
                .ok_or_else(|| ComposeError::EmptySynonymList { key: key.clone() })?;

            let (lead, core, trail) = split_punctuation(word);
            let replacement = if core.starts_with(char::is_uppercase) {
                capitalize_first(choice)
            } else {
                choice.clone()
            };
            words.push(format!("{lead}{replacement}{trail}"));
        }
        Ok(words.join(" "))
    }

    fn simplify(&self, text: &str) -> String {
        let mut out = text.to_string();
        for (re, replacement) in &self.rules {
            out = re.replace_all(&out, *replacement).into_owned();
        }
        out
    }

    fn embellish<R: Rng + ?Sized>(&self, text: &str, rng: &mut R) -> Result<String, ComposeError> {
        let mut text = text.to_string();

        if roll("prefix_probability", self.config.prefix_probability, rng)? {
            let prefix = self
                .lexicon
                .prefixes()
                .choose(rng)
                .ok_or(ComposeError::EmptyAffixPool { kind: "prefix" })?;
            text = format!("{prefix} {text}");
        }

        if roll("suffix_probability", self.config.suffix_probability, rng)? {
            let suffix = self
                .lexicon
                .suffixes()
                .choose(rng)
                .ok_or(ComposeError::EmptyAffixPool { kind: "suffix" })?;
            text = format!("{text} {suffix}");
        }

        Ok(text)
    }
}

fn roll<R: Rng + ?Sized>(name: &'static str, p: f64, rng: &mut R) -> Result<bool, ComposeError> {
    let dist =
        Bernoulli::new(p).map_err(|_| ComposeError::InvalidProbability { name, value: p })?;
    Ok(dist.sample(rng))
}

/// Split a token into leading punctuation, the word, and trailing punctuation.
fn split_punctuation(word: &str) -> (&str, &str, &str) {
    let start = word
        .find(|c: char| c.is_alphanumeric())
        .unwrap_or(word.len());
    let end = word
        .rfind(|c: char| c.is_alphanumeric())
        .map_or(start, |i| i + word[i..].chars().next().map_or(0, char::len_utf8));
    (&word[..start], &word[start..end.max(start)], &word[end.max(start)..])
}

/// Uppercase the first character, leaving the rest untouched.
fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
#[path = "rewrite_test.rs"]
mod tests;
