//! Chapter, part, book, prologue and epilogue detection.
//!
//! Detection is a single line-anchored pattern, not a parser. Keywords match
//! in any case; roman numerals only in upper case, since lines like
//! "Part civil, part..." would otherwise read as headings.

use super::{Boundary, Heading, Span};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

static HEADING_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^[ \t]*(?P<marker>(?i:chapter|part|book)[ \t]+(?:\d+|[IVXLCDM]+)\b|(?i:prologue|epilogue)\b)(?:[ \t]*:[ \t]*|[ \t]+)?(?P<label>[^\n]*)",
    )
    .expect("heading line pattern is valid")
});

/// A chapter-granularity slice of text, before any size bounding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuralSegment {
    pub span: Span,
    /// The heading that opened this segment; `None` for front matter
    pub heading: Option<Heading>,
}

/// Find every heading line, in text order.
///
/// The result always starts with the boundary at offset 0. A heading at the
/// very start of the text labels that boundary instead of adding a second one.
pub fn scan_boundaries(text: &str) -> Vec<Boundary> {
    let mut boundaries = vec![Boundary::start()];

    for caps in HEADING_LINE.captures_iter(text) {
        let Some(marker) = caps.name("marker") else {
            continue;
        };
        let heading = Heading {
            marker: marker.as_str().to_string(),
            label: caps.name("label").and_then(|m| clean_label(m.as_str())),
        };
        let offset = marker.start();

        match boundaries.last_mut() {
            Some(last) if offset <= last.offset => {
                if last.heading.is_none() {
                    last.heading = Some(heading);
                }
            }
            _ => boundaries.push(Boundary {
                offset,
                heading: Some(heading),
            }),
        }
    }

    boundaries
}

/// Boundaries if the text has chapter structure, `None` if it does not.
///
/// Fewer than two boundaries (the implicit one included) means the caller
/// should fall back to size-based splitting.
pub fn detect_structure(text: &str) -> Option<Vec<Boundary>> {
    let boundaries = scan_boundaries(text);
    debug!("Detected {} structural boundaries", boundaries.len());

    if boundaries.len() < 2 {
        None
    } else {
        Some(boundaries)
    }
}

/// Cut text at each boundary. Whitespace-only spans are dropped.
pub fn split_at_boundaries(text: &str, boundaries: &[Boundary]) -> Vec<StructuralSegment> {
    boundaries
        .iter()
        .enumerate()
        .filter_map(|(i, boundary)| {
            let end = boundaries.get(i + 1).map_or(text.len(), |next| next.offset);
            Span::new(boundary.offset, end)
                .trimmed(text)
                .map(|span| StructuralSegment {
                    span,
                    heading: boundary.heading.clone(),
                })
        })
        .collect()
}

fn clean_label(raw: &str) -> Option<String> {
    let label = raw
        .trim()
        .trim_start_matches([':', '.', ',', ';', '-'])
        .trim_end_matches(':')
        .trim();
    if label.is_empty() {
        None
    } else {
        Some(label.to_string())
    }
}
