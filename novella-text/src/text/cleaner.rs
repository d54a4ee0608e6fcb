//! Text cleaning: strip generation artifacts and lightweight markup.
//!
//! The passes run in a fixed order; later passes assume the artifacts removed
//! by earlier ones are gone (a wrapper banner would otherwise look like a
//! double hyphen, a heading marker like a chapter line, and so on).

use super::Span;
use log::debug;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// Banner, end marker, word-count footer and interruption marker written by
/// the generator, each removed with the blank line that follows it.
static WRAPPER_MARKER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^[ \t]*--- (?:NOVELLA: [^\n]*?|END OF NOVELLA|WORD COUNT: \d+|GENERATION INTERRUPTED BY USER) ---[ \t]*(?:\n(?:[ \t]*\n)?|\z)",
    )
    .expect("wrapper marker pattern is valid")
});

static HEADING: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?m)^[ \t]*#+[ \t]+(\S[^\n]*?)[ \t]*$").expect("heading pattern is valid")
});

static BOLD: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*([^\n]+?)\*\*").expect("bold pattern is valid"));

static STRONG_UNDERLINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"__([^\n]+?)__").expect("strong underline pattern is valid"));

// Markdown rule: the wrapped text may not start or end with whitespace, so
// "2 * 3 * 4" and "* * *" scene breaks are left alone.
static ITALIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*([^*\s](?:[^*\n]*?[^*\s])?)\*").expect("italic pattern is valid")
});

// Underscores inside identifiers like snake_case are not markup.
static UNDERLINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(^|[^\w])_([^_\s](?:[^_\n]*?[^_\s])?)_\b").expect("underline pattern is valid")
});

static FENCED_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```.*?```").expect("fenced code pattern is valid"));

static INLINE_CODE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"`[^`]*`").expect("inline code pattern is valid"));

static DOUBLE_HYPHEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]*--[ \t]*").expect("double hyphen pattern is valid"));

// Any newline run with the horizontal whitespace around it.
static LINE_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t]*\n(?:[ \t]*\n)*[ \t]*").expect("line break pattern is valid"));

/// Marker left between paragraphs after cleaning: a soft pause for speech
/// that still tells the splitters where paragraphs end.
pub const SOFT_PARAGRAPH_BREAK: &str = " \n ";

/// Clean raw generated text for analysis and pronunciation.
///
/// Pure and deterministic. With `speech_cues` set, ellipses become the word
/// " pause " and double hyphens become commas; document callers turn this off
/// so neither substitution shows up on the page.
pub fn normalize(text: &str, speech_cues: bool) -> String {
    let text = text.replace("\r\n", "\n");
    let text = strip_wrapper_markers(&text);
    let text = headings_to_sentences(&text);
    let text = strip_emphasis(&text);
    let text = strip_code(&text);
    let text = if speech_cues {
        add_speech_cues(&text)
    } else {
        text
    };
    let text = collapse_paragraph_breaks(&text);
    let normalized = text.trim().to_string();

    debug!(
        "Normalized {} chars into {} chars",
        text.chars().count(),
        normalized.chars().count()
    );

    normalized
}

/// A markdown `#` heading line in raw text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct MarkdownHeading {
    /// The heading line, without its trailing newline
    pub line: Span,
    /// Heading text with the hashes, emphasis and any trailing colon removed
    pub title: String,
}

/// Find `#` heading lines, in text order.
pub(crate) fn markdown_headings(text: &str) -> Vec<MarkdownHeading> {
    HEADING
        .captures_iter(text)
        .filter_map(|caps| {
            let line = caps.get(0)?;
            let title = strip_emphasis(&caps[1])
                .trim_end_matches(':')
                .trim()
                .to_string();
            Some(MarkdownHeading {
                line: Span::new(line.start(), line.end()),
                title,
            })
        })
        .filter(|heading| !heading.title.is_empty())
        .collect()
}

/// Remove the generator's wrapper lines.
pub(crate) fn strip_wrapper_markers(text: &str) -> String {
    WRAPPER_MARKER.replace_all(text, "").into_owned()
}

/// "## The Storm" becomes "The Storm:".
fn headings_to_sentences(text: &str) -> String {
    HEADING
        .replace_all(text, |caps: &Captures| {
            let heading = &caps[1];
            if heading.ends_with(':') {
                heading.to_string()
            } else {
                format!("{}:", heading)
            }
        })
        .into_owned()
}

/// Collapse bold, italic and underline wrappers to the wrapped text.
fn strip_emphasis(text: &str) -> String {
    let text = BOLD.replace_all(text, "$1");
    let text = STRONG_UNDERLINE.replace_all(&text, "$1");
    let text = ITALIC.replace_all(&text, "$1");
    UNDERLINE.replace_all(&text, "${1}${2}").into_owned()
}

/// Code is neither speakable nor prose; each span becomes a single space.
pub(crate) fn strip_code(text: &str) -> String {
    let text = FENCED_CODE.replace_all(text, " ");
    INLINE_CODE.replace_all(&text, " ").into_owned()
}

fn add_speech_cues(text: &str) -> String {
    let text = text.replace("...", " pause ");
    DOUBLE_HYPHEN.replace_all(&text, ", ").into_owned()
}

/// Blank-line runs become the soft break; a single newline loses the spaces
/// around it, so wrapped or indented lines stay inside their paragraph. An
/// existing soft break is kept as is.
fn collapse_paragraph_breaks(text: &str) -> String {
    LINE_BREAK
        .replace_all(text, |caps: &Captures| {
            let run = &caps[0];
            if run == SOFT_PARAGRAPH_BREAK || run.matches('\n').count() > 1 {
                SOFT_PARAGRAPH_BREAK
            } else {
                "\n"
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_wrapper_markers() {
        let text = "--- NOVELLA: The Lost City ---\n\nIt began.\n\n--- END OF NOVELLA ---\n--- WORD COUNT: 2 ---\n";
        assert_eq!(normalize(text, true), "It began.");
    }

    #[test]
    fn test_strip_interruption_marker() {
        let text = "It began.\n\n--- GENERATION INTERRUPTED BY USER ---\n--- WORD COUNT: 2 ---\n";
        assert_eq!(normalize(text, true), "It began.");
    }

    #[test]
    fn test_heading_becomes_sentence() {
        assert_eq!(normalize("# The Storm\nRain fell.", true), "The Storm:\nRain fell.");
        assert_eq!(normalize("### Part I", true), "Part I:");
    }

    #[test]
    fn test_heading_keeps_existing_colon() {
        assert_eq!(normalize("# Chapter 1:", true), "Chapter 1:");
    }

    #[test]
    fn test_strip_emphasis() {
        let text = "She was **very** *quietly* _certain_ and __sure__.";
        assert_eq!(normalize(text, true), "She was very quietly certain and sure.");
    }

    #[test]
    fn test_emphasis_leaves_identifiers_and_arithmetic() {
        let text = "The file snake_case_name held 2 * 3 * 4 items.";
        assert_eq!(normalize(text, true), text);
    }

    #[test]
    fn test_strip_code() {
        let text = "Before\n```rust\nfn secret() {}\n```\nafter `inline` end";
        let cleaned = normalize(text, true);
        assert!(!cleaned.contains("secret"));
        assert!(!cleaned.contains("inline"));
        assert!(!cleaned.contains('`'));
        assert!(cleaned.starts_with("Before"));
        assert!(cleaned.ends_with("end"));
    }

    #[test]
    fn test_bold_code_and_ellipsis() {
        let text = "**Bold** start.\n\n```\nlet x = 1;\n```\n\nAnd then... silence.";
        let cleaned = normalize(text, true);
        assert!(!cleaned.contains('*'));
        assert!(!cleaned.contains("let x"));
        assert!(cleaned.contains(" pause "));
        assert!(!cleaned.contains("..."));
    }

    #[test]
    fn test_double_hyphen_becomes_comma() {
        assert_eq!(normalize("Wait--no.", true), "Wait, no.");
        assert_eq!(normalize("Wait -- no.", true), "Wait, no.");
    }

    #[test]
    fn test_speech_cues_disabled() {
        let text = "And then... Wait--no.";
        assert_eq!(normalize(text, false), text);
    }

    #[test]
    fn test_paragraph_breaks_collapse() {
        let text = "First paragraph.\n\nSecond paragraph.\n\n\n\nThird.";
        assert_eq!(
            normalize(text, true),
            "First paragraph. \n Second paragraph. \n Third."
        );
    }

    #[test]
    fn test_wrapped_lines_stay_in_paragraph() {
        let text = "A line wrapped  \n   with indent.\nAnd a plain wrap. \n\nNext.";
        assert_eq!(
            normalize(text, true),
            "A line wrapped\nwith indent.\nAnd a plain wrap. \n Next."
        );
    }

    #[test]
    fn test_soft_break_survives_second_pass() {
        let once = normalize("First.\n\nSecond.\nStill second.", true);
        assert_eq!(once, "First. \n Second.\nStill second.");
        assert_eq!(normalize(&once, true), once);
    }

    #[test]
    fn test_markdown_headings() {
        let text = "Intro.\n# Chapter One: Dawn\nText.\n## **The Storm**:\n#hashtag line";
        let headings = markdown_headings(text);
        let titles: Vec<&str> = headings.iter().map(|h| h.title.as_str()).collect();
        assert_eq!(titles, vec!["Chapter One: Dawn", "The Storm"]);
        assert_eq!(headings[0].line.slice(text), "# Chapter One: Dawn");
    }

    #[test]
    fn test_crlf_input() {
        let text = "First.\r\n\r\nSecond.";
        assert_eq!(normalize(text, true), "First. \n Second.");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let text = "--- NOVELLA: X ---\n\n# Chapter 1\n\nShe **ran**... fast--faster.\n\n\nThe end.";
        let once = normalize(text, true);
        let twice = normalize(&once, true);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_whitespace_only() {
        assert_eq!(normalize("  \n\n \t ", true), "");
    }
}
