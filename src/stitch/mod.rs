//! Panorama Stitching module
//!
//! The [`Stitcher`] trait is the seam between the CLI and whatever builds
//! the composite canvas. The built-in [`TranslationStitcher`] implements the
//! "scans" model: every image is placed by a pure translation found by
//! coarse-to-fine search, and the result is composited onto a black canvas.
//! Uncovered canvas area stays black, which is the border that
//! [`BorderBoxFinder`](crate::BorderBoxFinder) later removes.
//!
//! # Example
//!
//! ```rust,no_run
//! use panostitch::{create_stitcher, StitchMode, StitchOptions};
//!
//! let images = vec![image::open("1.png").unwrap(), image::open("2.png").unwrap()];
//! let stitcher = create_stitcher(StitchMode::Scans, StitchOptions::default()).unwrap();
//! let panorama = stitcher.stitch(&images).unwrap();
//! panorama.image.save("panorama.png").unwrap();
//! ```

mod align;
mod compose;

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub use align::PairAlignment;

// ============================================================
// Constants
// ============================================================

/// Default max dimension of the coarsest alignment level
const DEFAULT_WORK_SIZE: u32 = 64;

/// Default minimum overlap as a fraction of the smaller image per axis
const DEFAULT_MIN_OVERLAP: f32 = 0.2;

/// Default accepted mean absolute gray difference over the overlap
const DEFAULT_MAX_ALIGNMENT_ERROR: f64 = 40.0;

/// Default canvas size limit (400 megapixels)
const DEFAULT_MAX_CANVAS_PIXELS: u64 = 400_000_000;

/// Minimum number of images for a stitch
pub const MIN_IMAGES: usize = 2;

// ============================================================
// Error Types
// ============================================================

/// Stitching error types
#[derive(Debug, Error)]
pub enum StitchError {
    #[error("Need at least 2 images, got {found}")]
    NeedMoreImages { found: usize },

    #[error("Alignment failed for image pair #{pair}: mean difference {error:.1}")]
    AlignmentFailed { pair: usize, error: f64 },

    #[error("Canvas too large: {width}x{height}")]
    CanvasTooLarge { width: u64, height: u64 },

    #[error("Stitch mode '{0}' is not supported by the built-in stitcher")]
    UnsupportedMode(StitchMode),
}

impl StitchError {
    /// Numeric status reported to the user
    pub fn status_code(&self) -> i32 {
        match self {
            StitchError::NeedMoreImages { .. } => 1,
            StitchError::AlignmentFailed { .. } => 2,
            StitchError::CanvasTooLarge { .. } => 3,
            StitchError::UnsupportedMode(_) => 4,
        }
    }

    /// Suggestion for the user
    pub fn hint(&self) -> &'static str {
        match self {
            StitchError::NeedMoreImages { .. } => "Need more images or failed to find features",
            StitchError::AlignmentFailed { .. } => {
                "Images may not overlap enough; try ordering them left to right"
            }
            StitchError::CanvasTooLarge { .. } => "Downscale the inputs before stitching",
            StitchError::UnsupportedMode(_) => "Use --mode scans",
        }
    }
}

pub type Result<T> = std::result::Result<T, StitchError>;

// ============================================================
// Mode
// ============================================================

/// Stitching model
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum StitchMode {
    /// Translation-only model for flat scans and camera pans
    #[default]
    Scans,
    /// Full rotational panorama model
    Panorama,
}

impl StitchMode {
    pub fn name(&self) -> &'static str {
        match self {
            StitchMode::Scans => "scans",
            StitchMode::Panorama => "panorama",
        }
    }
}

impl fmt::Display for StitchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ============================================================
// Options
// ============================================================

/// Options for the built-in stitcher
#[derive(Debug, Clone, PartialEq)]
pub struct StitchOptions {
    /// Max dimension of the coarsest pyramid level
    pub work_size: u32,
    /// Minimum overlap fraction (0.05-0.95) per axis
    pub min_overlap: f32,
    /// Accepted mean absolute difference (0-255)
    pub max_alignment_error: f64,
    /// Canvas pixel limit
    pub max_canvas_pixels: u64,
}

impl Default for StitchOptions {
    fn default() -> Self {
        Self {
            work_size: DEFAULT_WORK_SIZE,
            min_overlap: DEFAULT_MIN_OVERLAP,
            max_alignment_error: DEFAULT_MAX_ALIGNMENT_ERROR,
            max_canvas_pixels: DEFAULT_MAX_CANVAS_PIXELS,
        }
    }
}

impl StitchOptions {
    /// Create a new options builder
    pub fn builder() -> StitchOptionsBuilder {
        StitchOptionsBuilder::default()
    }
}

/// Builder for StitchOptions
#[derive(Debug, Default)]
pub struct StitchOptionsBuilder {
    options: StitchOptions,
}

impl StitchOptionsBuilder {
    /// Set coarsest level size (16-1024)
    #[must_use]
    pub fn work_size(mut self, size: u32) -> Self {
        self.options.work_size = size.clamp(16, 1024);
        self
    }

    /// Set minimum overlap fraction (0.05-0.95)
    #[must_use]
    pub fn min_overlap(mut self, fraction: f32) -> Self {
        self.options.min_overlap = fraction.clamp(0.05, 0.95);
        self
    }

    /// Set accepted alignment error (0-255)
    #[must_use]
    pub fn max_alignment_error(mut self, error: f64) -> Self {
        self.options.max_alignment_error = error.clamp(0.0, 255.0);
        self
    }

    /// Set canvas pixel limit
    #[must_use]
    pub fn max_canvas_pixels(mut self, pixels: u64) -> Self {
        self.options.max_canvas_pixels = pixels;
        self
    }

    /// Build the options
    #[must_use]
    pub fn build(self) -> StitchOptions {
        self.options
    }
}

// ============================================================
// Stitcher
// ============================================================

/// Stitching result
#[derive(Debug, Clone)]
pub struct Panorama {
    /// Composite canvas (RGB8, black where no image landed)
    pub image: DynamicImage,
    /// Top-left position of each input on the canvas
    pub positions: Vec<(u32, u32)>,
    /// Alignment of each consecutive pair
    pub alignments: Vec<PairAlignment>,
}

/// Builds one composite image from overlapping inputs
pub trait Stitcher: Send + Sync {
    /// Model implemented by this stitcher
    fn mode(&self) -> StitchMode;

    /// Stitch `images` (in order) into a panorama
    fn stitch(&self, images: &[DynamicImage]) -> Result<Panorama>;
}

/// Create a stitcher for `mode`
pub fn create_stitcher(mode: StitchMode, options: StitchOptions) -> Result<Box<dyn Stitcher>> {
    match mode {
        StitchMode::Scans => Ok(Box::new(TranslationStitcher::new(options))),
        StitchMode::Panorama => Err(StitchError::UnsupportedMode(mode)),
    }
}

/// Translation-model stitcher
#[derive(Debug, Clone, Default)]
pub struct TranslationStitcher {
    options: StitchOptions,
}

impl TranslationStitcher {
    pub fn new(options: StitchOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &StitchOptions {
        &self.options
    }
}

impl Stitcher for TranslationStitcher {
    fn mode(&self) -> StitchMode {
        StitchMode::Scans
    }

    fn stitch(&self, images: &[DynamicImage]) -> Result<Panorama> {
        if images.len() < MIN_IMAGES {
            return Err(StitchError::NeedMoreImages {
                found: images.len(),
            });
        }

        let alignments = align::align_sequence(images, &self.options)?;
        let offsets: Vec<(i64, i64)> = alignments.iter().map(|a| (a.dx, a.dy)).collect();
        let composite = compose::composite(images, &offsets, self.options.max_canvas_pixels)?;

        Ok(Panorama {
            image: DynamicImage::ImageRgb8(composite.canvas),
            positions: composite.positions,
            alignments,
        })
    }
}
