//! Word tables used by the rewrite engine.

use std::collections::HashMap;

use crate::error::ComposeError;

/// Headline words and their interchangeable replacements.
///
/// Keys are lowercase single words compared against a token stripped of
/// non-word characters.
pub(crate) const SYNONYMS: &[(&str, &[&str])] = &[
    ("bitcoin", &["BTC", "Bitcoin", "digital gold"]),
    ("ethereum", &["ETH", "Ethereum", "smart contracts platform"]),
    (
        "cryptocurrency",
        &["crypto", "digital currency", "virtual currency"],
    ),
    ("blockchain", &["distributed ledger", "DLT", "blockchain tech"]),
    ("price", &["value", "trading at", "worth"]),
    ("increases", &["rises", "surges", "climbs", "jumps", "spikes"]),
    ("decreases", &["falls", "drops", "declines", "dips", "slides"]),
    ("reaches", &["hits", "touches", "achieves"]),
    ("announces", &["reveals", "unveils", "declares"]),
    ("partnership", &["collaboration", "alliance", "deal"]),
    ("investment", &["funding", "capital injection", "backing"]),
    ("regulation", &["rules", "oversight", "compliance"]),
    ("adoption", &["acceptance", "integration", "implementation"]),
    ("market", &["trading", "exchange", "marketplace"]),
    ("significant", &["major", "important", "key", "crucial"]),
    ("development", &["advancement", "progress", "breakthrough"]),
    ("launch", &["debut", "release", "rollout"]),
    ("platform", &["network", "ecosystem", "infrastructure"]),
];

/// Attention-grabbing openers.
pub(crate) const PREFIXES: &[&str] = &[
    "🚨 Breaking:",
    "⚡ Alert:",
    "📈 Update:",
    "💎 News:",
    "🔥 Hot:",
    "⭐ Latest:",
    "📢 Announcement:",
    "🎯 Focus:",
    "💥 Big move:",
    "🌟 Spotlight:",
    "📊 Market update:",
    "🚀 Major news:",
    "💰 Financial update:",
    "🔔 Notice:",
];

/// Calls to action appended after the body.
pub(crate) const SUFFIXES: &[&str] = &[
    "Thoughts?",
    "What do you think?",
    "Big news!",
    "Stay tuned!",
    "More to come!",
    "Bullish or bearish?",
    "Game changer?",
    "This could be huge!",
    "Exciting times!",
    "Keep watching!",
    "To the moon? 🚀",
    "WAGMI! 💎",
    "LFG! 🔥",
];

/// Labels that news sites put in front of headlines.
pub(crate) const EDITORIAL_PREFIXES: &[&str] = &[
    "Breaking:",
    "BREAKING:",
    "Update:",
    "UPDATE:",
    "News:",
    "NEWS:",
    "Exclusive:",
    "EXCLUSIVE:",
    "Alert:",
    "ALERT:",
    "Analysis:",
    "Opinion:",
    "Editorial:",
    "Report:",
    "REPORT:",
];

/// Phrase simplifications, applied in order and case-insensitively.
pub(crate) const STRUCTURAL_RULES: &[(&str, &str)] = &[
    ("is expected to", "will likely"),
    ("are expected to", "will likely"),
    ("has been", "got"),
    ("have been", "got"),
    ("in order to", "to"),
    ("despite the fact that", "despite"),
    ("due to the fact that", "because"),
    ("for the reason that", "because"),
    ("at this point in time", "now"),
    ("with regard to", "about"),
    ("in the event that", "if"),
    ("as a result of", "from"),
];

/// Synonyms and embellishments the rewriter draws from.
#[derive(Debug, Clone)]
pub struct Lexicon {
    synonyms: HashMap<String, Vec<String>>,
    prefixes: Vec<String>,
    suffixes: Vec<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self {
            synonyms: SYNONYMS
                .iter()
                .map(|(key, words)| {
                    (
                        (*key).to_string(),
                        words.iter().map(|w| (*w).to_string()).collect(),
                    )
                })
                .collect(),
            prefixes: PREFIXES.iter().map(|p| (*p).to_string()).collect(),
            suffixes: SUFFIXES.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

impl Lexicon {
    /// Add or replace the synonyms for `key` (matched lowercase).
    #[must_use]
    pub fn with_synonyms(mut self, key: &str, words: Vec<String>) -> Self {
        self.synonyms.insert(key.to_lowercase(), words);
        self
    }

    #[must_use]
    pub fn with_prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.prefixes = prefixes;
        self
    }

    #[must_use]
    pub fn with_suffixes(mut self, suffixes: Vec<String>) -> Self {
        self.suffixes = suffixes;
        self
    }

    /// Replacement candidates for a lowercase key, if it is in the table.
    ///
    /// # Errors
    ///
    /// Returns [`ComposeError::EmptySynonymList`] for a key mapped to no words.
    pub(crate) fn synonyms_for(&self, key: &str) -> Result<Option<&[String]>, ComposeError> {
        match self.synonyms.get(key) {
            None => Ok(None),
            Some(words) if words.is_empty() => Err(ComposeError::EmptySynonymList {
                key: key.to_string(),
            }),
            Some(words) => Ok(Some(words)),
        }
    }

    pub(crate) fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    pub(crate) fn suffixes(&self) -> &[String] {
        &self.suffixes
    }
}
