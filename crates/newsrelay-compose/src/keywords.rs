//! Image search keyword derived from a headline.

use rand::seq::IndexedRandom;
use rand::Rng;

/// Headline words and the image search term they map to. The first matching
/// entry wins.
const KEYWORD_MAP: &[(&str, &str)] = &[
    ("bitcoin", "bitcoin"),
    ("btc", "bitcoin"),
    ("ethereum", "ethereum"),
    ("ether", "ethereum"),
    ("eth", "ethereum"),
    ("crypto", "cryptocurrency"),
    ("cryptocurrency", "cryptocurrency"),
    ("cryptocurrencies", "cryptocurrency"),
    ("defi", "decentralized finance"),
    ("nft", "nft blockchain"),
    ("trading", "crypto trading"),
    ("market", "financial market"),
    ("regulation", "finance regulation"),
    ("adoption", "blockchain technology"),
    ("investment", "investment finance"),
];

/// Pick an image search term for `title`.
///
/// A headline word equal to a mapped word, optionally followed by a plural or
/// possessive ending, decides the term; otherwise
/// a random entry of `fallback` is used. Returns `None` only when nothing
/// matched and `fallback` is empty.
pub fn select_image_keyword<R: Rng + ?Sized>(
    title: &str,
    fallback: &[String],
    rng: &mut R,
) -> Option<String> {
    let words: Vec<String> = title
        .split_whitespace()
        .map(|w| {
            w.trim_matches(|c: char| !c.is_alphanumeric())
                .to_lowercase()
        })
        .filter(|w| !w.is_empty())
        .collect();

    KEYWORD_MAP
        .iter()
        .find(|(key, _)| words.iter().any(|w| is_word_form(w, key)))
        .map(|(_, term)| (*term).to_string())
        .or_else(|| fallback.choose(rng).cloned())
}

/// `word` is `key`, `key`s, `key`es, or `key`'s.
fn is_word_form(word: &str, key: &str) -> bool {
    word.strip_prefix(key)
        .is_some_and(|rest| matches!(rest, "" | "s" | "es" | "'s" | "\u{2019}s"))
}
