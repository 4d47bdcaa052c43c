pub(crate) const ELLIPSIS: &str = "...";

/// Keep at most `max_words` whitespace-separated words.
pub(crate) fn cap_words(text: &str, max_words: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= max_words {
        return text.to_string();
    }
    words[..max_words].join(" ")
}

/// Fit `text` into `max_chars` characters.
///
/// Text that already fits is returned unchanged. Otherwise the longest
/// whole-word prefix of at most `max_chars - 3` characters is kept and
/// `"..."` appended. A first word longer than that budget is cut mid-word.
pub(crate) fn truncate_at_word(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }

    let ellipsis_len = ELLIPSIS.chars().count();
    let budget = max_chars.saturating_sub(ellipsis_len);
    let mut truncated = String::new();
    let mut used = 0usize;

    for word in text.split_whitespace() {
        let word_len = word.chars().count();
        let needed = if truncated.is_empty() {
            word_len
        } else {
            used + 1 + word_len
        };
        if needed > budget {
            break;
        }
        if !truncated.is_empty() {
            truncated.push(' ');
        }
        truncated.push_str(word);
        used = needed;
    }

    if truncated.is_empty() {
        truncated = text.trim_start().chars().take(budget).collect();
    }
    if max_chars < ellipsis_len {
        return ELLIPSIS.chars().take(max_chars).collect();
    }
    truncated.push_str(ELLIPSIS);
    truncated
}
