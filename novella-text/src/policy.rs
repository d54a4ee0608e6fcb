//! Segmentation policy: soft target size, hard ceiling, and strategy toggles.

use crate::error::{NovellaError, Result};
use log::warn;
use serde::{Deserialize, Serialize};

/// Preferred segment size when accumulating paragraphs.
pub const DEFAULT_TARGET_SIZE: usize = 3500;

/// Absolute per-segment ceiling (speech APIs typically cap requests near 4096).
pub const DEFAULT_HARD_MAX: usize = 4000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentationPolicy {
    /// Soft size used to decide when to start a new segment
    #[serde(default = "default_target_size")]
    pub target_size: usize,

    /// No emitted segment may exceed this many characters
    #[serde(default = "default_hard_max")]
    pub hard_max: usize,

    /// Accumulate whole paragraphs when no chapter structure is found
    #[serde(default = "default_true")]
    pub prefer_paragraph_breaks: bool,

    /// Cut oversized segments at sentence ends before falling back to fixed windows
    #[serde(default = "default_true")]
    pub prefer_sentence_breaks: bool,

    /// Apply the audio-only cues ("..." becomes " pause ", "--" becomes a comma)
    #[serde(default = "default_true")]
    pub speech_cues: bool,
}

fn default_target_size() -> usize {
    DEFAULT_TARGET_SIZE
}

fn default_hard_max() -> usize {
    DEFAULT_HARD_MAX
}

fn default_true() -> bool {
    true
}

impl Default for SegmentationPolicy {
    fn default() -> Self {
        Self {
            target_size: default_target_size(),
            hard_max: default_hard_max(),
            prefer_paragraph_breaks: true,
            prefer_sentence_breaks: true,
            speech_cues: true,
        }
    }
}

impl SegmentationPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_target_size(mut self, target_size: usize) -> Self {
        self.target_size = target_size;
        self
    }

    pub fn with_hard_max(mut self, hard_max: usize) -> Self {
        self.hard_max = hard_max;
        self
    }

    pub fn with_paragraph_breaks(mut self, enabled: bool) -> Self {
        self.prefer_paragraph_breaks = enabled;
        self
    }

    pub fn with_sentence_breaks(mut self, enabled: bool) -> Self {
        self.prefer_sentence_breaks = enabled;
        self
    }

    pub fn with_speech_cues(mut self, enabled: bool) -> Self {
        self.speech_cues = enabled;
        self
    }

    /// Reject sizes that would make splitting impossible.
    ///
    /// A target above the hard maximum is legal: the overflow pass still
    /// enforces the ceiling, so it only means paragraph packing rarely closes
    /// a segment on its own.
    pub fn validate(&self) -> Result<()> {
        if self.target_size == 0 || self.hard_max == 0 {
            return Err(NovellaError::InvalidPolicy {
                target_size: self.target_size,
                hard_max: self.hard_max,
            });
        }

        if self.target_size > self.hard_max {
            warn!(
                "target_size {} exceeds hard_max {}; overflow splitting will do most of the work",
                self.target_size, self.hard_max
            );
        }

        Ok(())
    }
}
