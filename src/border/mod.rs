//! Black Border Detection module
//!
//! Finds the non-black content region of a stitched panorama and crops or
//! annotates it.
//!
//! # Features
//!
//! - Grayscale thresholding with a configurable near-black cutoff
//! - External region extraction by flood fill (holes and nested regions
//!   belong to their enclosing region)
//! - Largest-region bounding box with deterministic scan-order tie-break
//! - Red rectangle + label overlay, and exact crop
//!
//! # Example
//!
//! ```rust,no_run
//! use panostitch::{BorderBoxFinder, BorderOptions};
//!
//! let panorama = image::open("panorama.jpg").unwrap();
//!
//! if let Some(rect) = BorderBoxFinder::content_bounding_rect(&panorama) {
//!     println!("Content: {}", rect);
//! }
//!
//! let options = BorderOptions::builder().threshold(8).build();
//! let cropped = BorderBoxFinder::crop_with(&panorama, &options);
//! cropped.save("panorama_cropped.png").unwrap();
//! ```

mod annotate;
mod finder;
mod region;
mod types;

pub use annotate::format_label;
pub use finder::BorderBoxFinder;
pub use types::{BorderDetection, BoundingRect};

// ============================================================
// Constants
// ============================================================

/// Default background cutoff: intensity at or below is black border
pub const DEFAULT_THRESHOLD: u8 = 1;

/// Default outline stroke width in pixels
pub const DEFAULT_STROKE_WIDTH: u32 = 3;

/// Default label baseline origin
pub const DEFAULT_LABEL_ORIGIN: (i32, i32) = (10, 30);

/// Default label glyph scale (5x7 font units to pixels)
pub const DEFAULT_LABEL_SCALE: u32 = 2;

/// Default overlay color (pure red)
pub const DEFAULT_COLOR: [u8; 3] = [255, 0, 0];

/// Maximum stroke width accepted by the builder
const MAX_STROKE_WIDTH: u32 = 64;

/// Maximum label scale accepted by the builder
const MAX_LABEL_SCALE: u32 = 16;

// ============================================================
// Options
// ============================================================

/// Border detection and overlay options
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorderOptions {
    /// Grayscale cutoff (0-255), pixels at or below are background
    pub threshold: u8,
    /// Outline stroke width in pixels
    pub stroke_width: u32,
    /// Label baseline-left origin
    pub label_origin: (i32, i32),
    /// Label glyph scale
    pub label_scale: u32,
    /// Overlay color (RGB)
    pub color: [u8; 3],
}

impl Default for BorderOptions {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            stroke_width: DEFAULT_STROKE_WIDTH,
            label_origin: DEFAULT_LABEL_ORIGIN,
            label_scale: DEFAULT_LABEL_SCALE,
            color: DEFAULT_COLOR,
        }
    }
}

impl BorderOptions {
    /// Create a new options builder
    pub fn builder() -> BorderOptionsBuilder {
        BorderOptionsBuilder::default()
    }
}

/// Builder for BorderOptions
#[derive(Debug, Default)]
pub struct BorderOptionsBuilder {
    options: BorderOptions,
}

impl BorderOptionsBuilder {
    /// Set background threshold (0-255)
    #[must_use]
    pub fn threshold(mut self, threshold: u8) -> Self {
        self.options.threshold = threshold;
        self
    }

    /// Set outline stroke width (1-64)
    #[must_use]
    pub fn stroke_width(mut self, width: u32) -> Self {
        self.options.stroke_width = width.clamp(1, MAX_STROKE_WIDTH);
        self
    }

    /// Set label baseline origin
    #[must_use]
    pub fn label_origin(mut self, x: i32, y: i32) -> Self {
        self.options.label_origin = (x, y);
        self
    }

    /// Set label scale (1-16)
    #[must_use]
    pub fn label_scale(mut self, scale: u32) -> Self {
        self.options.label_scale = scale.clamp(1, MAX_LABEL_SCALE);
        self
    }

    /// Set overlay color
    #[must_use]
    pub fn color(mut self, color: [u8; 3]) -> Self {
        self.options.color = color;
        self
    }

    /// Build the options
    #[must_use]
    pub fn build(self) -> BorderOptions {
        self.options
    }
}
