//! Text processing: cleaning, boundary detection, and size-bounded splitting.

pub mod boundaries;
pub mod chunker;
pub mod cleaner;
mod sentences;

pub use boundaries::{detect_structure, scan_boundaries, split_at_boundaries};
pub use chunker::{resplit_overflow, split_by_size};
pub use cleaner::normalize;

use serde::{Deserialize, Serialize};
use std::fmt;

/// A byte range into normalized text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Span covering all of `text`.
    pub fn whole(text: &str) -> Self {
        Self::new(0, text.len())
    }

    pub fn slice<'a>(&self, text: &'a str) -> &'a str {
        &text[self.start..self.end]
    }

    /// Size in characters, which is what downstream limits are expressed in.
    pub fn char_len(&self, text: &str) -> usize {
        self.slice(text).chars().count()
    }

    /// Shrink past leading and trailing whitespace; `None` if nothing is left.
    pub fn trimmed(self, text: &str) -> Option<Span> {
        let slice = self.slice(text);
        let leading = slice.len() - slice.trim_start().len();
        if leading == slice.len() {
            return None;
        }
        let trailing = slice.len() - slice.trim_end().len();
        Some(Span::new(self.start + leading, self.end - trailing))
    }
}

/// A bounded, ordered slice of normalized text handed to a downstream consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    /// 1-based position in the final sequence
    pub index: usize,
    /// The segment text
    pub text: String,
    /// Size in characters
    pub size: usize,
    /// Byte offset where the segment starts in the normalized text
    pub start: usize,
    /// Byte offset just past the segment in the normalized text
    pub end: usize,
}

impl Segment {
    pub fn new(index: usize, normalized: &str, span: Span) -> Self {
        let text = span.slice(normalized).to_string();
        Self {
            index,
            size: text.chars().count(),
            text,
            start: span.start,
            end: span.end,
        }
    }

    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }
}

/// A recognized heading such as "Chapter 3" with its optional trailing label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// The marker as written, e.g. "CHAPTER IV" or "Prologue"
    pub marker: String,
    /// Text after the marker on the same line, e.g. "The Storm"
    pub label: Option<String>,
}

impl fmt::Display for Heading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.label {
            Some(label) => write!(f, "{}: {}", self.marker, label),
            None => write!(f, "{}", self.marker),
        }
    }
}

/// A structural division point in normalized text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Boundary {
    pub offset: usize,
    /// `None` for the implicit boundary at offset 0
    pub heading: Option<Heading>,
}

impl Boundary {
    pub fn start() -> Self {
        Self {
            offset: 0,
            heading: None,
        }
    }
}
