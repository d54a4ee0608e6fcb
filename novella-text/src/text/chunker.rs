//! Size-bounded splitting.
//!
//! Two tiers: paragraphs are packed up to a soft `target_size`, and anything
//! still above the hard maximum is narrowed, sentence packing first and fixed
//! character windows last. Every function works on spans over one normalized
//! string, so segments stay contiguous slices of it.

use super::Span;
use super::sentences::split_sentences;
use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;

/// A blank line, or the soft " \n " break left by the cleaner. The cleaner
/// strips spaces around every other single newline, so wrapped lines never
/// match the second form.
static PARAGRAPH_BREAK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[ \t]*\n(?:[ \t]*\n)+[ \t]*| \n ").expect("paragraph break pattern is valid")
});

/// A narrowing step: cut an oversized span into finer pieces.
type Strategy = fn(&str, Span, usize) -> Vec<Span>;

/// Narrowing steps tried, in order, on a span above the hard maximum.
/// Fixed-width windows always follow as the last resort.
const SENTENCE_FIRST: &[Strategy] = &[pack_sentences];

/// Split the text under `span` into trimmed paragraph spans, in order.
pub(crate) fn paragraph_spans(text: &str, span: Span) -> Vec<Span> {
    let slice = span.slice(text);
    let mut paragraphs = Vec::new();
    let mut cursor = 0;

    for m in PARAGRAPH_BREAK.find_iter(slice) {
        let candidate = Span::new(span.start + cursor, span.start + m.start());
        if let Some(paragraph) = candidate.trimmed(text) {
            paragraphs.push(paragraph);
        }
        cursor = m.end();
    }

    if let Some(rest) = Span::new(span.start + cursor, span.end).trimmed(text) {
        paragraphs.push(rest);
    }

    paragraphs
}

/// Greedily merge consecutive units while the merged span stays within `limit`.
///
/// A unit that alone exceeds `limit` is still emitted whole; callers decide
/// whether that is acceptable.
fn pack(text: &str, units: Vec<Span>, limit: usize) -> Vec<Span> {
    let (mut packed, running) = units.into_iter().fold(
        (Vec::new(), None::<(Span, usize)>),
        |(mut packed, running), unit| {
            let unit_size = unit.char_len(text);
            let next = match running {
                Some((run, size)) => {
                    let merged = size + Span::new(run.end, unit.start).char_len(text) + unit_size;
                    if merged > limit {
                        packed.push(run);
                        (unit, unit_size)
                    } else {
                        (Span::new(run.start, unit.end), merged)
                    }
                }
                None => (unit, unit_size),
            };
            (packed, Some(next))
        },
    );

    packed.extend(running.map(|(span, _)| span));
    packed
}

/// Pack paragraphs into segments of roughly `target_size` characters.
///
/// `target_size` is a preference: a segment closes before the paragraph that
/// would push it over, and a single paragraph larger than the target becomes
/// its own oversized segment.
pub fn split_by_size(text: &str, span: Span, target_size: usize) -> Vec<Span> {
    let segments = pack(text, paragraph_spans(text, span), target_size);
    debug!(
        "Size-based split produced {} segments (target {})",
        segments.len(),
        target_size
    );
    segments
}

fn pack_sentences(text: &str, span: Span, limit: usize) -> Vec<Span> {
    pack(text, split_sentences(text, span), limit)
}

/// Cut a span into consecutive windows of exactly `limit` characters.
///
/// Never fails, whatever the input: no punctuation and no whitespace still
/// yields windows. Windows are trimmed, so a window may come out shorter.
pub(crate) fn fixed_windows(text: &str, span: Span, limit: usize) -> Vec<Span> {
    let slice = span.slice(text);
    let mut cuts: Vec<usize> = slice
        .char_indices()
        .map(|(i, _)| i)
        .step_by(limit.max(1))
        .collect();
    cuts.push(slice.len());

    cuts.windows(2)
        .filter_map(|w| Span::new(span.start + w[0], span.start + w[1]).trimmed(text))
        .collect()
}

fn narrow(text: &str, span: Span, limit: usize, chain: &[Strategy], out: &mut Vec<Span>) {
    if span.char_len(text) <= limit {
        out.push(span);
        return;
    }

    match chain.split_first() {
        Some((strategy, rest)) => {
            for piece in strategy(text, span, limit) {
                narrow(text, piece, limit, rest, out);
            }
        }
        None => {
            warn!(
                "Cutting {} chars into fixed windows of {} (no usable sentence break)",
                span.char_len(text),
                limit
            );
            out.extend(fixed_windows(text, span, limit));
        }
    }
}

/// Ensure every span is at most `hard_max` characters, preserving order.
pub fn resplit_overflow(
    text: &str,
    spans: &[Span],
    hard_max: usize,
    prefer_sentence_breaks: bool,
) -> Vec<Span> {
    let chain: &[Strategy] = if prefer_sentence_breaks {
        SENTENCE_FIRST
    } else {
        &[]
    };

    let mut bounded = Vec::with_capacity(spans.len());
    for &span in spans {
        narrow(text, span, hard_max, chain, &mut bounded);
    }

    if bounded.len() > spans.len() {
        debug!(
            "Overflow resplit: {} segments became {} (hard max {})",
            spans.len(),
            bounded.len(),
            hard_max
        );
    }

    bounded
}
