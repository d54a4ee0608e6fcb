//! Clip joining with FFmpeg.

use super::ClipJoiner;
use crate::error::{NovellaError, Result};
use log::debug;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

/// Joins clips by padding each one (except the last) with `gap` of silence
/// and concatenating them with FFmpeg's concat filter.
#[derive(Debug, Clone)]
pub struct FfmpegJoiner {
    program: PathBuf,
}

impl Default for FfmpegJoiner {
    fn default() -> Self {
        Self {
            program: PathBuf::from("ffmpeg"),
        }
    }
}

impl FfmpegJoiner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a specific FFmpeg executable instead of the one on `PATH`.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Check if FFmpeg can be run.
    pub fn is_available(&self) -> bool {
        Command::new(&self.program)
            .arg("-version")
            .output()
            .map(|o| o.status.success())
            .unwrap_or(false)
    }
}

/// Filter graph padding every input but the last, then concatenating all.
pub(crate) fn build_filter_graph(clip_count: usize, gap: Duration) -> String {
    let gap_secs = gap.as_secs_f64();
    let mut graph = String::new();
    let mut labels = String::new();

    for i in 0..clip_count {
        if i + 1 < clip_count && gap_secs > 0.0 {
            graph.push_str(&format!("[{}:a]apad=pad_dur={:.3}[a{}];", i, gap_secs, i));
        } else {
            graph.push_str(&format!("[{}:a]anull[a{}];", i, i));
        }
        labels.push_str(&format!("[a{}]", i));
    }

    graph.push_str(&format!("{}concat=n={}:v=0:a=1[out]", labels, clip_count));
    graph
}

impl ClipJoiner for FfmpegJoiner {
    fn join(&self, clips: &[PathBuf], gap: Duration, output_path: &Path) -> Result<()> {
        if clips.is_empty() {
            return Err(NovellaError::NoClips);
        }

        if clips.len() == 1 {
            std::fs::copy(&clips[0], output_path)?;
            return Ok(());
        }

        let graph = build_filter_graph(clips.len(), gap);
        debug!("ffmpeg filter graph: {}", graph);

        let mut cmd = Command::new(&self.program);
        cmd.arg("-y");
        for clip in clips {
            cmd.arg("-i").arg(clip);
        }
        cmd.args(["-filter_complex", graph.as_str(), "-map", "[out]"])
            .arg(output_path);

        let output = cmd
            .output()
            .map_err(|e| NovellaError::Join(format!("failed to run ffmpeg: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(NovellaError::Join(stderr.trim().to_string()));
        }

        Ok(())
    }
}
