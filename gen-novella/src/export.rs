//! Writing segments to disk for downstream speech jobs.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use novella_text::{Segment, Segmentation, SegmentationPolicy};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Summary written next to the segment files.
#[derive(Debug, Serialize)]
pub struct Manifest<'a> {
    pub title: &'a str,
    pub created_at: DateTime<Utc>,
    pub structural: bool,
    pub policy: &'a SegmentationPolicy,
    pub segments: &'a [Segment],
}

/// File name for a segment, e.g. `segment_001.txt`.
pub fn segment_file_name(index: usize) -> String {
    format!("segment_{:03}.txt", index)
}

/// Write one text file per segment plus `manifest.json`, returning the segment paths.
pub fn write_segments(
    dir: &Path,
    title: &str,
    segmentation: &Segmentation,
    policy: &SegmentationPolicy,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

    let mut paths = Vec::with_capacity(segmentation.segments.len());
    for segment in &segmentation.segments {
        let path = dir.join(segment_file_name(segment.index));
        fs::write(&path, &segment.text)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        paths.push(path);
    }

    let manifest = Manifest {
        title,
        created_at: Utc::now(),
        structural: segmentation.structural,
        policy,
        segments: &segmentation.segments,
    };
    let manifest_path = dir.join("manifest.json");
    fs::write(&manifest_path, serde_json::to_string_pretty(&manifest)?)
        .with_context(|| format!("Failed to write {}", manifest_path.display()))?;

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use novella_text::{Document, segment};

    #[test]
    fn test_segment_file_name() {
        assert_eq!(segment_file_name(1), "segment_001.txt");
        assert_eq!(segment_file_name(42), "segment_042.txt");
        assert_eq!(segment_file_name(1234), "segment_1234.txt");
    }

    #[test]
    fn test_write_segments() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("segments");
        let policy = SegmentationPolicy::default();
        let doc = Document::new(
            "Short",
            "Chapter 1\n\nFirst part.\n\nChapter 2\n\nSecond part.",
        );
        let segmentation = segment(&doc, &policy).unwrap();

        let paths = write_segments(&out, doc.title(), &segmentation, &policy).unwrap();

        assert_eq!(paths.len(), 2);
        assert_eq!(
            fs::read_to_string(&paths[1]).unwrap(),
            "Chapter 2 \n Second part."
        );

        let manifest: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(out.join("manifest.json")).unwrap()).unwrap();
        assert_eq!(manifest["title"], "Short");
        assert_eq!(manifest["structural"], true);
        assert_eq!(manifest["segments"].as_array().unwrap().len(), 2);
        assert_eq!(manifest["policy"]["hard_max"], 4000);
    }
}
