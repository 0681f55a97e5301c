//! Configuration file support
//!
//! Settings are read from TOML. Lookup order:
//!
//! 1. `--config <PATH>` (explicit)
//! 2. `./panostitch.toml`
//! 3. `<config dir>/panostitch/config.toml`
//! 4. Built-in defaults
//!
//! Command-line values win over file values through [`CliOverrides`].
//!
//! ```toml
//! [border]
//! threshold = 1
//! stroke_width = 3
//! crop = true
//!
//! [stitch]
//! mode = "scans"
//! work_size = 64
//!
//! [output]
//! path = "panorama_result.jpg"
//! jpeg_quality = 95
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::border::{BorderOptions, DEFAULT_STROKE_WIDTH, DEFAULT_THRESHOLD};
use crate::image_io::DEFAULT_JPEG_QUALITY;
use crate::stitch::{StitchMode, StitchOptions};

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "panostitch.toml";

/// Default output path of the `stitch` command
pub const DEFAULT_OUTPUT: &str = "panorama_result.jpg";

// ============================================================
// Error Types
// ============================================================

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

// ============================================================
// Sections
// ============================================================

/// `[border]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BorderConfig {
    pub threshold: u8,
    pub stroke_width: u32,
    pub crop: bool,
}

impl Default for BorderConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            stroke_width: DEFAULT_STROKE_WIDTH,
            crop: true,
        }
    }
}

/// `[stitch]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StitchConfig {
    pub mode: StitchMode,
    pub work_size: u32,
    pub min_overlap: f32,
    pub max_alignment_error: f64,
    pub max_canvas_megapixels: u64,
}

impl Default for StitchConfig {
    fn default() -> Self {
        let options = StitchOptions::default();
        Self {
            mode: StitchMode::default(),
            work_size: options.work_size,
            min_overlap: options.min_overlap,
            max_alignment_error: options.max_alignment_error,
            max_canvas_megapixels: options.max_canvas_pixels / 1_000_000,
        }
    }
}

/// `[output]` section
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
    pub jpeg_quality: u8,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_OUTPUT),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

// ============================================================
// Config
// ============================================================

/// Complete configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub border: BorderConfig,
    pub stitch: StitchConfig,
    pub output: OutputConfig,
}

/// Values given on the command line; `None` keeps the file value
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub threshold: Option<u8>,
    pub crop: Option<bool>,
    pub mode: Option<StitchMode>,
    pub output: Option<PathBuf>,
    pub jpeg_quality: Option<u8>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Config {
    /// Load from the first config file found, or defaults
    pub fn load() -> Result<Self> {
        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.is_file() {
            return Self::load_from_path(&local);
        }
        if let Some(user) = Self::user_config_path().filter(|p| p.is_file()) {
            return Self::load_from_path(&user);
        }
        debug!("no config file found, using defaults");
        Ok(Self::default())
    }

    /// Load from an explicit path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(ConfigError::NotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Parse TOML content
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// `<config dir>/panostitch/config.toml`
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("panostitch").join("config.toml"))
    }

    /// Apply command-line values on top of this configuration
    #[must_use]
    pub fn merge_with_cli(&self, cli: &CliOverrides) -> Self {
        let mut merged = self.clone();
        if let Some(threshold) = cli.threshold {
            merged.border.threshold = threshold;
        }
        if let Some(crop) = cli.crop {
            merged.border.crop = crop;
        }
        if let Some(mode) = cli.mode {
            merged.stitch.mode = mode;
        }
        if let Some(output) = &cli.output {
            merged.output.path = output.clone();
        }
        if let Some(quality) = cli.jpeg_quality {
            merged.output.jpeg_quality = quality;
        }
        merged
    }

    /// Border options derived from the `[border]` section
    pub fn border_options(&self) -> BorderOptions {
        BorderOptions::builder()
            .threshold(self.border.threshold)
            .stroke_width(self.border.stroke_width)
            .build()
    }

    /// Stitch options derived from the `[stitch]` section
    pub fn stitch_options(&self) -> StitchOptions {
        StitchOptions::builder()
            .work_size(self.stitch.work_size)
            .min_overlap(self.stitch.min_overlap)
            .max_alignment_error(self.stitch.max_alignment_error)
            .max_canvas_pixels(self.stitch.max_canvas_megapixels.saturating_mul(1_000_000))
            .build()
    }

    /// Serialize as JSON
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}
