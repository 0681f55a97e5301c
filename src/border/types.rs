//! Border module core types

use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================
// Bounding Rectangle
// ============================================================

/// Axis-aligned rectangle in pixel coordinates
///
/// For a rectangle produced by [`BorderBoxFinder`](super::BorderBoxFinder),
/// `x + width <= image width` and `y + height <= image height` always hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoundingRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl BoundingRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Exclusive bottom edge
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Number of pixels covered
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Whether the rectangle lies inside an image of the given size
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.width > 0 && self.height > 0 && self.right() <= width && self.bottom() <= height
    }

    /// Whether the rectangle covers the whole image
    pub fn covers(&self, width: u32, height: u32) -> bool {
        self.x == 0 && self.y == 0 && self.width == width && self.height == height
    }
}

impl fmt::Display for BoundingRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {})",
            self.x, self.y, self.width, self.height
        )
    }
}

// ============================================================
// Detection Result
// ============================================================

/// Full border detection report for one image
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BorderDetection {
    /// Image dimensions (width, height)
    pub image_size: (u32, u32),

    /// Bounding rectangle of the largest external region
    pub rect: Option<BoundingRect>,

    /// Number of external regions found
    pub region_count: usize,

    /// Enclosed pixel area of the selected region
    pub content_area: u64,
}

impl BorderDetection {
    /// Detection with no content
    pub fn empty(image_size: (u32, u32)) -> Self {
        Self {
            image_size,
            rect: None,
            region_count: 0,
            content_area: 0,
        }
    }

    /// Whether any non-black content was found
    pub fn has_content(&self) -> bool {
        self.rect.is_some()
    }

    /// Pixels outside the bounding rectangle (removed by a crop)
    pub fn border_pixels(&self) -> u64 {
        let total = self.image_size.0 as u64 * self.image_size.1 as u64;
        match self.rect {
            Some(rect) => total - rect.area(),
            None => 0,
        }
    }
}
