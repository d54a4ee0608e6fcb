//! Word counting for generated novellas.

use crate::text::cleaner::strip_wrapper_markers;
use once_cell::sync::Lazy;
use regex::Regex;

static MARKUP: Lazy<Regex> = Lazy::new(|| Regex::new(r"[#*_]+").expect("markup pattern is valid"));

static CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```.*?```|`[^`]*`").expect("code pattern is valid"));

/// Count the words in `text`, ignoring wrapper lines, markup and code.
///
/// Hyphenated compounds ("well-known") count once; tokens made only of
/// punctuation ("--", "...") are not words.
pub fn count_words(text: &str) -> usize {
    let text = strip_wrapper_markers(text);
    let text = MARKUP.replace_all(&text, " ");
    let text = CODE.replace_all(&text, " ");

    text.split_whitespace()
        .filter(|token| token.chars().any(char::is_alphanumeric))
        .count()
}
