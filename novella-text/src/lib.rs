//! Segmentation of long-form generated prose.
//!
//! A novella comes in as one plain-text blob. This crate cleans it, finds
//! chapter-like divisions, and cuts it into ordered segments that never exceed
//! a hard character ceiling:
//! - speech pipelines get one synthesis request per [`Segment`]
//! - document pipelines get chapter-level sections via [`outline`]

pub mod document;
pub mod error;
pub mod outline;
pub mod pipeline;
pub mod policy;
pub mod speech;
pub mod text;
pub mod words;

pub use document::Document;
pub use error::{NovellaError, Result};
pub use outline::{Outline, Section, outline};
pub use pipeline::{Segmentation, segment};
pub use policy::SegmentationPolicy;
pub use speech::{ClipJoiner, RenderOptions, RenderReport, SpeechSynthesizer, render_audiobook};
pub use text::{Boundary, Heading, Segment, Span};
pub use words::count_words;
