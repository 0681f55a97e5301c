//! External region extraction on a binary mask
//!
//! Regions are found with two flood fills:
//!
//! 1. 4-connected fill of the background, seeded from the image frame.
//!    Everything reached is "outside".
//! 2. 8-connected labeling of every pixel that is not outside, in
//!    row-major scan order.
//!
//! Each label from step 2 is one external foreground region together with
//! its holes and anything nested inside them, so its pixel count is the
//! area enclosed by the region's outer boundary. Foreground islands inside
//! a hole merge into their enclosing region and never appear on their own.

use image::{GrayImage, Luma};
use std::collections::VecDeque;

use super::types::BoundingRect;

// ============================================================
// Constants
// ============================================================

const FOREGROUND: u8 = 255;
const BACKGROUND: u8 = 0;

/// 4-connected neighborhood (background fill)
const NEIGHBORS_4: [(i32, i32); 4] = [(0, -1), (-1, 0), (1, 0), (0, 1)];

/// 8-connected neighborhood (region labeling)
const NEIGHBORS_8: [(i32, i32); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

// ============================================================
// Types
// ============================================================

/// One external region with its filled interior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ExternalRegion {
    min_x: u32,
    min_y: u32,
    max_x: u32,
    max_y: u32,
    /// Enclosed pixel area
    pub area: u64,
    /// Row-major index of the pixel that started the fill
    pub first_index: usize,
}

impl ExternalRegion {
    fn new(x: u32, y: u32, first_index: usize) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
            area: 1,
            first_index,
        }
    }

    fn expand(&mut self, x: u32, y: u32) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
        self.area += 1;
    }

    pub fn bounding_rect(&self) -> BoundingRect {
        BoundingRect::new(
            self.min_x,
            self.min_y,
            self.max_x - self.min_x + 1,
            self.max_y - self.min_y + 1,
        )
    }
}

// ============================================================
// Mask Operations
// ============================================================

/// Binarize: intensity above `threshold` becomes foreground (255)
pub(crate) fn binarize(gray: &GrayImage, threshold: u8) -> GrayImage {
    let (width, height) = gray.dimensions();
    let mut binary = GrayImage::new(width, height);

    for (x, y, pixel) in gray.enumerate_pixels() {
        let value = if pixel.0[0] > threshold {
            FOREGROUND
        } else {
            BACKGROUND
        };
        binary.put_pixel(x, y, Luma([value]));
    }

    binary
}

fn index(x: u32, y: u32, width: u32) -> usize {
    y as usize * width as usize + x as usize
}

fn is_background(binary: &GrayImage, x: u32, y: u32) -> bool {
    binary.get_pixel(x, y).0[0] == BACKGROUND
}

/// Mark background pixels reachable from the image frame
///
/// The image is treated as if surrounded by a one-pixel background frame,
/// so foreground touching the edge still counts as bounded by "outside".
pub(crate) fn mark_outside(binary: &GrayImage) -> Vec<bool> {
    let (width, height) = binary.dimensions();
    let mut outside = vec![false; width as usize * height as usize];
    if width == 0 || height == 0 {
        return outside;
    }

    let mut queue = VecDeque::new();
    let seed = |x: u32, y: u32, outside: &mut [bool], queue: &mut VecDeque<(u32, u32)>| {
        let idx = index(x, y, width);
        if !outside[idx] && is_background(binary, x, y) {
            outside[idx] = true;
            queue.push_back((x, y));
        }
    };

    for x in 0..width {
        seed(x, 0, &mut outside, &mut queue);
        seed(x, height - 1, &mut outside, &mut queue);
    }
    for y in 0..height {
        seed(0, y, &mut outside, &mut queue);
        seed(width - 1, y, &mut outside, &mut queue);
    }

    while let Some((x, y)) = queue.pop_front() {
        for (dx, dy) in &NEIGHBORS_4 {
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;

            if nx >= 0 && nx < width as i32 && ny >= 0 && ny < height as i32 {
                let nx = nx as u32;
                let ny = ny as u32;
                let idx = index(nx, ny, width);

                if !outside[idx] && is_background(binary, nx, ny) {
                    outside[idx] = true;
                    queue.push_back((nx, ny));
                }
            }
        }
    }

    outside
}

/// Find all external regions, in row-major order of their first pixel
pub(crate) fn find_external_regions(binary: &GrayImage) -> Vec<ExternalRegion> {
    let (width, height) = binary.dimensions();
    // Outside pixels are pre-visited so they never start or join a region
    let mut visited = mark_outside(binary);
    let mut regions = Vec::new();

    for y in 0..height {
        for x in 0..width {
            if !visited[index(x, y, width)] {
                regions.push(fill_region(x, y, width, height, &mut visited));
            }
        }
    }

    regions
}

/// Flood-fill one region through all non-outside pixels
fn fill_region(
    start_x: u32,
    start_y: u32,
    width: u32,
    height: u32,
    visited: &mut [bool],
) -> ExternalRegion {
    let start_idx = index(start_x, start_y, width);
    let mut region = ExternalRegion::new(start_x, start_y, start_idx);
    let mut queue = VecDeque::new();
    queue.push_back((start_x, start_y));
    visited[start_idx] = true;

    while let Some((x, y)) = queue.pop_front() {
        for (dx, dy) in &NEIGHBORS_8 {
            let nx = x as i32 + dx;
            let ny = y as i32 + dy;

            if nx >= 0 && nx < width as i32 && ny >= 0 && ny < height as i32 {
                let nx = nx as u32;
                let ny = ny as u32;
                let idx = index(nx, ny, width);

                if !visited[idx] {
                    visited[idx] = true;
                    region.expand(nx, ny);
                    queue.push_back((nx, ny));
                }
            }
        }
    }

    region
}

/// Largest region by enclosed area; ties go to the earliest in scan order
pub(crate) fn largest_region(regions: &[ExternalRegion]) -> Option<&ExternalRegion> {
    let mut best: Option<&ExternalRegion> = None;
    for region in regions {
        match best {
            Some(current) if current.area >= region.area => {}
            _ => best = Some(region),
        }
    }
    best
}
