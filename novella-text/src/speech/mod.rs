//! Speech rendering: one synthesis request per segment, joined in order.
//!
//! The synthesis service and the audio joiner are collaborators behind
//! traits; this module only drives them in reading order.

pub mod ffmpeg;

pub use ffmpeg::FfmpegJoiner;

use crate::error::{NovellaError, Result};
use crate::text::Segment;
use async_trait::async_trait;
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Silence inserted between consecutive clips.
pub const DEFAULT_GAP: Duration = Duration::from_millis(500);

/// Delay between consecutive synthesis requests.
pub const DEFAULT_PACING: Duration = Duration::from_millis(500);

/// A speech-synthesis backend. Each call gets one segment's text, which is
/// guaranteed to fit the backend's request limit if the segments came from
/// the pipeline with a matching `hard_max`.
///
/// No backend ships with this crate; callers implement this for their
/// service and pass it to [`render_audiobook`].
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    /// Synthesize `text` into an audio file at `output_path`.
    async fn synthesize(&self, text: &str, output_path: &Path) -> Result<()>;

    /// Backend name for display.
    fn name(&self) -> &str;
}

/// Joins ordered audio clips into one file with a fixed gap between clips.
pub trait ClipJoiner: Send + Sync {
    fn join(&self, clips: &[PathBuf], gap: Duration, output_path: &Path) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Directory receiving per-segment clips and the combined file
    pub output_dir: PathBuf,
    /// File name of the combined audio
    pub combined_name: String,
    /// Clip file extension, e.g. "mp3"
    pub clip_extension: String,
    pub gap: Duration,
    pub pacing: Duration,
}

impl RenderOptions {
    pub fn new(output_dir: impl Into<PathBuf>, title: &str) -> Self {
        Self {
            output_dir: output_dir.into(),
            combined_name: format!("{}_audiobook.mp3", file_safe(title)),
            clip_extension: "mp3".to_string(),
            gap: DEFAULT_GAP,
            pacing: DEFAULT_PACING,
        }
    }

    pub fn with_gap(mut self, gap: Duration) -> Self {
        self.gap = gap;
        self
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Clip path for a segment, e.g. `segment_007.mp3`.
    pub fn clip_path(&self, index: usize) -> PathBuf {
        self.output_dir
            .join(format!("segment_{:03}.{}", index, self.clip_extension))
    }

    pub fn combined_path(&self) -> PathBuf {
        self.output_dir.join(&self.combined_name)
    }
}

#[derive(Debug, Clone)]
pub struct RenderReport {
    /// Clips that were synthesized, in index order
    pub clips: Vec<PathBuf>,
    /// Indices of segments whose synthesis failed
    pub failed: Vec<usize>,
    /// The joined audio file
    pub combined: PathBuf,
}

/// Synthesize each segment in order and join the clips.
///
/// A failed segment is logged and skipped; the remaining clips are still
/// joined in index order. `progress` receives `(completed, total)` after each
/// segment.
pub async fn render_audiobook<F>(
    segments: &[Segment],
    synthesizer: &dyn SpeechSynthesizer,
    joiner: &dyn ClipJoiner,
    options: &RenderOptions,
    mut progress: F,
) -> Result<RenderReport>
where
    F: FnMut(usize, usize),
{
    tokio::fs::create_dir_all(&options.output_dir).await?;

    let total = segments.len();
    let mut clips = Vec::with_capacity(total);
    let mut failed = Vec::new();

    info!(
        "Rendering {} segments with {}",
        total,
        synthesizer.name()
    );

    for (i, segment) in segments.iter().enumerate() {
        if i > 0 && !options.pacing.is_zero() {
            tokio::time::sleep(options.pacing).await;
        }

        let clip_path = options.clip_path(segment.index);
        match synthesizer.synthesize(&segment.text, &clip_path).await {
            Ok(()) => clips.push(clip_path),
            Err(e) => {
                warn!("Segment {} failed: {}", segment.index, e);
                failed.push(segment.index);
            }
        }

        progress(i + 1, total);
    }

    if clips.is_empty() {
        return Err(NovellaError::NoClips);
    }

    let combined = options.combined_path();
    joiner.join(&clips, options.gap, &combined)?;

    info!(
        "Joined {} clips into {} ({} failed)",
        clips.len(),
        combined.display(),
        failed.len()
    );

    Ok(RenderReport {
        clips,
        failed,
        combined,
    })
}

/// Replace everything but ASCII letters and digits with underscores.
fn file_safe(title: &str) -> String {
    title
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::Span;
    use std::sync::Mutex;

    /// Writes the segment text as the "audio", failing on chosen calls.
    struct MockSynthesizer {
        fail_on: Vec<String>,
        calls: Mutex<Vec<String>>,
    }

    impl MockSynthesizer {
        fn new() -> Self {
            Self {
                fail_on: Vec::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn failing_on(text: &str) -> Self {
            Self {
                fail_on: vec![text.to_string()],
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SpeechSynthesizer for MockSynthesizer {
        async fn synthesize(&self, text: &str, output_path: &Path) -> Result<()> {
            self.calls.lock().unwrap().push(text.to_string());
            if self.fail_on.iter().any(|t| t == text) {
                return Err(NovellaError::Synthesis {
                    index: 0,
                    message: "mock failure".to_string(),
                });
            }
            std::fs::write(output_path, text)?;
            Ok(())
        }

        fn name(&self) -> &str {
            "mock"
        }
    }

    /// Concatenates clip contents with a "|" standing in for the gap.
    struct MockJoiner;

    impl ClipJoiner for MockJoiner {
        fn join(&self, clips: &[PathBuf], _gap: Duration, output_path: &Path) -> Result<()> {
            let parts = clips
                .iter()
                .map(std::fs::read_to_string)
                .collect::<std::io::Result<Vec<_>>>()?;
            std::fs::write(output_path, parts.join("|"))?;
            Ok(())
        }
    }

    fn segments(texts: &[&str]) -> Vec<Segment> {
        let joined = texts.join(" ");
        let mut start = 0;
        texts
            .iter()
            .enumerate()
            .map(|(i, t)| {
                let span = Span::new(start, start + t.len());
                start += t.len() + 1;
                Segment::new(i + 1, &joined, span)
            })
            .collect()
    }

    fn options(dir: &Path) -> RenderOptions {
        RenderOptions::new(dir, "My Novella").with_pacing(Duration::ZERO)
    }

    #[test]
    fn test_render_options_paths() {
        let opts = RenderOptions::new("/out", "The Lost City!");
        assert_eq!(opts.clip_path(7), PathBuf::from("/out/segment_007.mp3"));
        assert_eq!(
            opts.combined_path(),
            PathBuf::from("/out/The_Lost_City__audiobook.mp3")
        );
        assert_eq!(opts.gap, Duration::from_millis(500));
    }

    #[tokio::test]
    async fn test_render_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let synth = MockSynthesizer::new();
        let mut seen = Vec::new();

        let report = render_audiobook(
            &segments(&["one", "two", "three"]),
            &synth,
            &MockJoiner,
            &options(dir.path()),
            |done, total| seen.push((done, total)),
        )
        .await
        .unwrap();

        assert_eq!(report.clips.len(), 3);
        assert!(report.failed.is_empty());
        assert_eq!(
            std::fs::read_to_string(&report.combined).unwrap(),
            "one|two|three"
        );
        assert_eq!(seen, vec![(1, 3), (2, 3), (3, 3)]);
        assert_eq!(*synth.calls.lock().unwrap(), vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn test_render_skips_failed_segment() {
        let dir = tempfile::tempdir().unwrap();
        let synth = MockSynthesizer::failing_on("two");

        let report = render_audiobook(
            &segments(&["one", "two", "three"]),
            &synth,
            &MockJoiner,
            &options(dir.path()),
            |_, _| {},
        )
        .await
        .unwrap();

        assert_eq!(report.failed, vec![2]);
        assert_eq!(
            std::fs::read_to_string(&report.combined).unwrap(),
            "one|three"
        );
    }

    #[tokio::test]
    async fn test_render_all_failed() {
        let dir = tempfile::tempdir().unwrap();
        let synth = MockSynthesizer::failing_on("only");

        let result = render_audiobook(
            &segments(&["only"]),
            &synth,
            &MockJoiner,
            &options(dir.path()),
            |_, _| {},
        )
        .await;

        assert!(matches!(result, Err(NovellaError::NoClips)));
    }
}
