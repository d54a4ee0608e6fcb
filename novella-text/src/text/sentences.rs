//! Sentence splitting on terminal punctuation followed by whitespace.

use super::Span;
use once_cell::sync::Lazy;
use regex::Regex;

// Closing quotes and brackets stay with the sentence they end.
static SENTENCE_END: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"([.!?]+["'\x{201D}\x{2019})\]]*)\s+"#).expect("sentence end pattern is valid")
});

/// Split the text under `span` into trimmed sentence spans, in order.
pub(crate) fn split_sentences(text: &str, span: Span) -> Vec<Span> {
    let slice = span.slice(text);
    let mut sentences = Vec::new();
    let mut cursor = 0;

    for caps in SENTENCE_END.captures_iter(slice) {
        let (Some(whole), Some(terminal)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if let Some(sentence) =
            Span::new(span.start + cursor, span.start + terminal.end()).trimmed(text)
        {
            sentences.push(sentence);
        }
        cursor = whole.end();
    }

    if let Some(rest) = Span::new(span.start + cursor, span.end).trimmed(text) {
        sentences.push(rest);
    }

    sentences
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentences(text: &str) -> Vec<&str> {
        split_sentences(text, Span::whole(text))
            .into_iter()
            .map(|s| s.slice(text))
            .collect()
    }

    #[test]
    fn test_split_into_sentences() {
        assert_eq!(
            sentences("One. Two! Three? Four"),
            vec!["One.", "Two!", "Three?", "Four"]
        );
    }

    #[test]
    fn test_keeps_closing_quotes() {
        assert_eq!(
            sentences("\"Run!\" she said. \"Now.\" Then"),
            vec!["\"Run!\"", "she said.", "\"Now.\"", "Then"]
        );
    }

    #[test]
    fn test_no_break_without_whitespace() {
        assert_eq!(sentences("Version 2.5 shipped.Then"), vec!["Version 2.5 shipped.Then"]);
    }

    #[test]
    fn test_sub_span() {
        let text = "Skip. Keep one. Keep two. Skip.";
        let span = Span::new(6, 25);
        let parts: Vec<&str> = split_sentences(text, span)
            .into_iter()
            .map(|s| s.slice(text))
            .collect();
        assert_eq!(parts, vec!["Keep one.", "Keep two."]);
    }

    #[test]
    fn test_empty() {
        assert!(sentences("   ").is_empty());
    }
}
