//! The segmentation pipeline: normalize, split, bound, index.

use crate::document::Document;
use crate::error::{NovellaError, Result};
use crate::policy::SegmentationPolicy;
use crate::text::{
    Segment, Span, detect_structure, normalize, resplit_overflow, split_at_boundaries,
    split_by_size,
};
use log::{debug, info};

/// Result of segmenting one document.
#[derive(Debug, Clone)]
pub struct Segmentation {
    /// The cleaned text every segment points into
    pub normalized: String,
    /// Bounded segments in reading order, indexed 1..=N
    pub segments: Vec<Segment>,
    /// Whether chapter structure was found (otherwise size-based splitting was used)
    pub structural: bool,
}

impl Segmentation {
    /// Rebuild the normalized text from the segments and the separators
    /// between them.
    pub fn reconstruct(&self) -> String {
        let mut text = String::with_capacity(self.normalized.len());
        let mut cursor = self.segments.first().map_or(0, |s| s.start);
        for segment in &self.segments {
            text.push_str(&self.normalized[cursor..segment.start]);
            text.push_str(&segment.text);
            cursor = segment.end;
        }
        text
    }

    pub fn total_chars(&self) -> usize {
        self.segments.iter().map(|s| s.size).sum()
    }
}

/// Split a document into ordered segments no larger than `policy.hard_max`.
///
/// Never fails on irregular text: missing chapter markers fall back to
/// paragraph packing, run-on sentences to fixed windows. Only a document with
/// no text at all is an error.
pub fn segment(document: &Document, policy: &SegmentationPolicy) -> Result<Segmentation> {
    policy.validate()?;

    let normalized = normalize(document.text(), policy.speech_cues);
    if normalized.is_empty() {
        return Err(NovellaError::EmptyInput);
    }

    let whole = Span::whole(&normalized);
    let (coarse, structural) = match detect_structure(&normalized) {
        Some(boundaries) => {
            let spans: Vec<Span> = split_at_boundaries(&normalized, &boundaries)
                .into_iter()
                .map(|s| s.span)
                .collect();
            (spans, true)
        }
        None if policy.prefer_paragraph_breaks => {
            debug!("No chapter structure in \"{}\"; splitting by size", document.title());
            (split_by_size(&normalized, whole, policy.target_size), false)
        }
        None => (vec![whole], false),
    };

    let bounded = resplit_overflow(
        &normalized,
        &coarse,
        policy.hard_max,
        policy.prefer_sentence_breaks,
    );

    let segments: Vec<Segment> = bounded
        .into_iter()
        .enumerate()
        .map(|(i, span)| Segment::new(i + 1, &normalized, span))
        .collect();

    info!(
        "Segmented \"{}\": {} segments from {} {} (hard max {})",
        document.title(),
        segments.len(),
        coarse.len(),
        if structural { "chapters" } else { "size blocks" },
        policy.hard_max
    );

    Ok(Segmentation {
        normalized,
        segments,
        structural,
    })
}
