use std::sync::LazyLock;

use regex::Regex;

use super::lexicon::EDITORIAL_PREFIXES;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid tags regex"));

/// Strip markup, collapse whitespace, and drop leading editorial labels.
pub(crate) fn clean_text(text: &str) -> String {
    let without_tags = TAG_RE.replace_all(text, "");
    let mut cleaned = without_tags.split_whitespace().collect::<Vec<_>>().join(" ");

    while let Some(rest) = EDITORIAL_PREFIXES
        .iter()
        .find_map(|p| cleaned.strip_prefix(p))
    {
        cleaned = rest.trim_start().to_string();
    }
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_tags_and_whitespace() {
        assert_eq!(
            clean_text("<p>Bitcoin   <b>rallies</b>\n today</p>"),
            "Bitcoin rallies today"
        );
    }

    #[test]
    fn strips_editorial_prefixes() {
        assert_eq!(clean_text("BREAKING: SEC approves ETF"), "SEC approves ETF");
        assert_eq!(
            clean_text("Update: Analysis: Miners sell"),
            "Miners sell"
        );
    }

    #[test]
    fn leaves_prefix_inside_text() {
        assert_eq!(
            clean_text("Why Breaking: is overused"),
            "Why Breaking: is overused"
        );
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(clean_text("   "), "");
    }
}
