//! Near-duplicate collapsing by title-token overlap.
//!
//! Each candidate is compared against every title already accepted, so a run
//! costs O(n² · w) for n articles of w words. That is fine for the few dozen
//! articles a fetch cycle produces; an index (e.g. `MinHash`) would be needed
//! before feeding thousands of items through here.

use std::collections::HashSet;

use newsrelay_core::Article;

/// Overlap at or above which two titles are considered the same story.
pub const DEDUP_THRESHOLD: f64 = 0.7;

/// Leading labels that carry no story content.
const NOISE_PREFIXES: &[&str] = &[
    "breaking:",
    "update:",
    "news:",
    "crypto:",
    "bitcoin:",
    "ethereum:",
    "exclusive:",
    "analysis:",
];

/// Drop articles whose URL was already kept or whose title overlaps a kept
/// title by at least [`DEDUP_THRESHOLD`]. The first occurrence wins and input
/// order is preserved.
#[must_use]
pub fn dedupe(articles: Vec<Article>) -> Vec<Article> {
    let mut kept: Vec<Article> = Vec::with_capacity(articles.len());
    let mut kept_tokens: Vec<HashSet<String>> = Vec::with_capacity(articles.len());
    let mut kept_urls: HashSet<String> = HashSet::new();

    for article in articles {
        if kept_urls.contains(article.url()) {
            tracing::debug!(url = article.url(), "dropping repeated url");
            continue;
        }

        let tokens = title_tokens(&normalize_title(article.title()));
        if let Some(existing) = kept_tokens
            .iter()
            .position(|seen| overlap(&tokens, seen) >= DEDUP_THRESHOLD)
        {
            tracing::debug!(
                title = article.title(),
                duplicate_of = kept[existing].title(),
                "dropping near-duplicate title"
            );
            continue;
        }

        kept_urls.insert(article.url().to_string());
        kept_tokens.push(tokens);
        kept.push(article);
    }

    kept
}

/// Lowercase, trim, and repeatedly strip leading noise labels.
#[must_use]
pub fn normalize_title(title: &str) -> String {
    let mut normalized = title.trim().to_lowercase();
    while let Some(rest) = NOISE_PREFIXES
        .iter()
        .find_map(|p| normalized.strip_prefix(p))
    {
        normalized = rest.trim_start().to_string();
    }
    normalized
}

/// Word set of a normalized title.
///
/// Surrounding punctuation is trimmed so `$75k` and `75k` agree, digit-group
/// commas are dropped, and a trailing `k`/`m`/`b` on a number is expanded so
/// `75k` and `75,000` yield the same token.
#[must_use]
pub fn title_tokens(normalized: &str) -> HashSet<String> {
    normalized
        .split_whitespace()
        .map(normalize_token)
        .filter(|t| !t.is_empty())
        .collect()
}

fn normalize_token(word: &str) -> String {
    let trimmed = word.trim_matches(|c: char| !c.is_alphanumeric());
    if !trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        return trimmed.to_string();
    }

    let digits: String = trimmed.chars().filter(|c| *c != ',').collect();
    expand_magnitude(&digits).unwrap_or(digits)
}

fn expand_magnitude(token: &str) -> Option<String> {
    let (number, multiplier) = match token.char_indices().last()? {
        (i, 'k') => (&token[..i], 1e3),
        (i, 'm') => (&token[..i], 1e6),
        (i, 'b') => (&token[..i], 1e9),
        _ => return None,
    };
    let value = number.parse::<f64>().ok()? * multiplier;
    if value.fract().abs() < f64::EPSILON && value < 1e15 {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let whole = value as u64;
        Some(whole.to_string())
    } else {
        Some(value.to_string())
    }
}

/// `|A ∩ B| / min(|A|, |B|)`; zero when either set is empty.
#[must_use]
pub fn overlap(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let smaller = a.len().min(b.len());
    if smaller == 0 {
        return 0.0;
    }
    let common = a.intersection(b).count();
    #[allow(clippy::cast_precision_loss)]
    let ratio = common as f64 / smaller as f64;
    ratio
}
