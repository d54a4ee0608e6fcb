//! gen-novella configuration management.

use anyhow::{Context, Result};
use novella_text::SegmentationPolicy;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_GAP_MS: u64 = 500;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenNovellaConfig {
    /// Silence between joined audio clips, in milliseconds
    #[serde(default = "default_gap_ms")]
    pub gap_ms: u64,

    /// Segment sizing
    #[serde(default)]
    pub segmentation: SegmentationPolicy,
}

fn default_gap_ms() -> u64 {
    DEFAULT_GAP_MS
}

impl Default for GenNovellaConfig {
    fn default() -> Self {
        Self {
            gap_ms: default_gap_ms(),
            segmentation: SegmentationPolicy::default(),
        }
    }
}

impl GenNovellaConfig {
    /// Get the config file path: ~/.config/cli-programs/gen-novella.toml
    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(home
            .join(".config")
            .join("cli-programs")
            .join("gen-novella.toml"))
    }

    /// Load config from the default location, returning defaults if it doesn't exist
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: GenNovellaConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }
}
