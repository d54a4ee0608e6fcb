//! Chapter-level outline for document (EPUB/PDF) generation.
//!
//! Works at structural granularity only: no size bounding, and the
//! audio-only cues are never applied.

use crate::document::Document;
use crate::error::{NovellaError, Result};
use crate::text::chunker::paragraph_spans;
use crate::text::cleaner::{MarkdownHeading, markdown_headings, strip_code, strip_wrapper_markers};
use crate::text::{Span, normalize, scan_boundaries, split_at_boundaries};
use crate::words::count_words;
use log::debug;
use serde::Serialize;

/// Title used when the text has no chapter markers at all.
const DEFAULT_SECTION_TITLE: &str = "Chapter 1";

#[derive(Debug, Clone, Serialize)]
pub struct Section {
    /// Heading shown in the table of contents
    pub title: String,
    /// Body paragraphs, heading line excluded
    pub paragraphs: Vec<String>,
    pub word_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct Outline {
    pub title: String,
    pub sections: Vec<Section>,
}

impl Outline {
    pub fn word_count(&self) -> usize {
        self.sections.iter().map(|s| s.word_count).sum()
    }
}

/// Build the chapter outline of a document.
///
/// Markdown `#` headings open sections when the text has any; otherwise the
/// chapter, part, book, prologue and epilogue markers do. Text before the
/// first heading becomes a front-matter section titled after the document.
/// Sections without body text are dropped.
pub fn outline(document: &Document) -> Result<Outline> {
    let source = strip_code(&strip_wrapper_markers(&document.text().replace("\r\n", "\n")));
    let headings = markdown_headings(&source);

    let sections = if headings.is_empty() {
        marker_sections(document)?
    } else {
        debug!("Outlining \"{}\" by {} markdown headings", document.title(), headings.len());
        heading_sections(document.title(), &source, &headings)
    };

    Ok(Outline {
        title: document.title().to_string(),
        sections,
    })
}

/// Sections cut at `#` heading lines, titled with the heading text.
fn heading_sections(title: &str, source: &str, headings: &[MarkdownHeading]) -> Vec<Section> {
    let front_matter = (title.to_string(), &source[..headings[0].line.start]);
    let chapters = headings.iter().enumerate().map(|(i, heading)| {
        let end = headings.get(i + 1).map_or(source.len(), |next| next.line.start);
        (heading.title.clone(), &source[heading.line.end..end])
    });

    std::iter::once(front_matter)
        .chain(chapters)
        .filter_map(|(title, body)| {
            let normalized = normalize(body, false);
            let paragraphs = paragraph_spans(&normalized, Span::whole(&normalized))
                .into_iter()
                .map(|p| p.slice(&normalized).to_string())
                .collect();
            build_section(title, paragraphs)
        })
        .collect()
}

/// Sections cut at chapter-style markers in the normalized text.
fn marker_sections(document: &Document) -> Result<Vec<Section>> {
    let normalized = normalize(document.text(), false);
    if normalized.is_empty() {
        return Err(NovellaError::EmptyInput);
    }

    let boundaries = scan_boundaries(&normalized);
    let structural = boundaries.iter().any(|b| b.heading.is_some());

    Ok(split_at_boundaries(&normalized, &boundaries)
        .into_iter()
        .filter_map(|segment| {
            let (title, body) = match segment.heading {
                Some(heading) => (
                    heading.to_string(),
                    skip_heading_line(&normalized, segment.span),
                ),
                None if structural => (document.title().to_string(), Some(segment.span)),
                None => (DEFAULT_SECTION_TITLE.to_string(), Some(segment.span)),
            };

            let paragraphs = body
                .map(|span| {
                    paragraph_spans(&normalized, span)
                        .into_iter()
                        .map(|p| p.slice(&normalized).to_string())
                        .collect()
                })
                .unwrap_or_default();
            build_section(title, paragraphs)
        })
        .collect())
}

fn build_section(title: String, paragraphs: Vec<String>) -> Option<Section> {
    if paragraphs.is_empty() {
        debug!("Dropping empty section \"{}\"", title);
        return None;
    }

    let word_count = paragraphs.iter().map(|p| count_words(p)).sum();
    Some(Section {
        title,
        paragraphs,
        word_count,
    })
}

/// The part of a structural segment after its heading line.
fn skip_heading_line(text: &str, span: Span) -> Option<Span> {
    let slice = span.slice(text);
    let line_end = slice.find('\n')?;
    Span::new(span.start + line_end + 1, span.end).trimmed(text)
}
