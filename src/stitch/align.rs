//! Translation alignment between consecutive images
//!
//! # Algorithm
//!
//! 1. Build a grayscale pyramid per image, halving until the largest
//!    image fits the work size (all pyramids share the level count)
//! 2. Exhaustive offset search at the coarsest level, minimizing the mean
//!    absolute difference over the overlap
//! 3. Refine by +-2 pixels at every finer level up to full resolution

use image::imageops::{self, FilterType};
use image::{DynamicImage, GrayImage};
use rayon::prelude::*;
use tracing::{debug, info};

use super::{Result, StitchError, StitchOptions};

// ============================================================
// Constants
// ============================================================

/// Search radius when refining at a finer level
const REFINE_RADIUS: i64 = 2;

/// Pixel samples per cost evaluation (overlap is strided above this)
const MAX_COST_SAMPLES: i64 = 16_384;

// ============================================================
// Types
// ============================================================

/// Offset of image `index + 1` relative to image `index`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PairAlignment {
    /// Index of the first image of the pair
    pub index: usize,
    /// Horizontal offset of the second image's origin, full resolution
    pub dx: i64,
    /// Vertical offset of the second image's origin, full resolution
    pub dy: i64,
    /// Mean absolute gray difference at the chosen offset
    pub error: f64,
}

/// Grayscale pyramid, level 0 is full resolution
struct Pyramid {
    levels: Vec<GrayImage>,
}

impl Pyramid {
    fn build(image: &DynamicImage, downsamples: usize) -> Self {
        let mut levels = Vec::with_capacity(downsamples + 1);
        levels.push(image.to_luma8());

        for _ in 0..downsamples {
            let Some(prev) = levels.last() else { break };
            let (w, h) = prev.dimensions();
            if w < 2 || h < 2 {
                break;
            }
            let next = imageops::resize(prev, w / 2, h / 2, FilterType::Triangle);
            levels.push(next);
        }

        Self { levels }
    }

    fn depth(&self) -> usize {
        self.levels.len()
    }
}

// ============================================================
// Alignment
// ============================================================

/// Number of halvings until the largest dimension fits `work_size`
fn downsample_count(images: &[DynamicImage], work_size: u32) -> usize {
    let largest = images
        .iter()
        .map(|img| img.width().max(img.height()))
        .max()
        .unwrap_or(0);

    let mut size = largest;
    let mut count = 0;
    while size > work_size.max(1) {
        size /= 2;
        count += 1;
    }
    count
}

/// Align every consecutive pair of `images`
pub(crate) fn align_sequence(
    images: &[DynamicImage],
    options: &StitchOptions,
) -> Result<Vec<PairAlignment>> {
    let downsamples = downsample_count(images, options.work_size);
    debug!(images = images.len(), downsamples, "building alignment pyramids");

    let pyramids: Vec<Pyramid> = images
        .par_iter()
        .map(|img| Pyramid::build(img, downsamples))
        .collect();

    let alignments: Vec<PairAlignment> = pyramids
        .par_windows(2)
        .enumerate()
        .map(|(index, pair)| align_pair(index, &pair[0], &pair[1], options))
        .collect::<Result<Vec<_>>>()?;

    for a in &alignments {
        info!(pair = a.index, dx = a.dx, dy = a.dy, error = a.error, "pair aligned");
    }

    Ok(alignments)
}

fn align_pair(
    index: usize,
    a: &Pyramid,
    b: &Pyramid,
    options: &StitchOptions,
) -> Result<PairAlignment> {
    let depth = a.depth().min(b.depth());
    let coarsest = depth - 1;

    let (mut dx, mut dy, mut error) = coarse_search(
        &a.levels[coarsest],
        &b.levels[coarsest],
        options.min_overlap,
    )
    .ok_or(StitchError::AlignmentFailed {
        pair: index,
        error: f64::INFINITY,
    })?;

    for level in (0..coarsest).rev() {
        let (la, lb) = (&a.levels[level], &b.levels[level]);
        let (rdx, rdy, rerror) = refine(la, lb, dx * 2, dy * 2, options.min_overlap).ok_or(
            StitchError::AlignmentFailed {
                pair: index,
                error: f64::INFINITY,
            },
        )?;
        dx = rdx;
        dy = rdy;
        error = rerror;
    }

    debug!(pair = index, dx, dy, error, "alignment candidate");

    if error > options.max_alignment_error {
        return Err(StitchError::AlignmentFailed { pair: index, error });
    }

    Ok(PairAlignment {
        index,
        dx,
        dy,
        error,
    })
}

/// Allowed offset range along one axis for the given overlap fraction
fn offset_range(len_a: u32, len_b: u32, min_overlap: f32) -> Option<(i64, i64)> {
    let shorter = len_a.min(len_b) as f32;
    let overlap = ((shorter * min_overlap).ceil() as i64).max(1);
    let low = overlap - len_b as i64;
    let high = len_a as i64 - overlap;
    (low <= high).then_some((low, high))
}

/// Exhaustive search over all offsets with enough overlap
fn coarse_search(a: &GrayImage, b: &GrayImage, min_overlap: f32) -> Option<(i64, i64, f64)> {
    let (x_low, x_high) = offset_range(a.width(), b.width(), min_overlap)?;
    let (y_low, y_high) = offset_range(a.height(), b.height(), min_overlap)?;

    best_offset(
        a,
        b,
        (x_low..=x_high).flat_map(|dx| (y_low..=y_high).map(move |dy| (dx, dy))),
    )
}

/// Search +-REFINE_RADIUS around a predicted offset
fn refine(
    a: &GrayImage,
    b: &GrayImage,
    dx: i64,
    dy: i64,
    min_overlap: f32,
) -> Option<(i64, i64, f64)> {
    let (x_low, x_high) = offset_range(a.width(), b.width(), min_overlap)?;
    let (y_low, y_high) = offset_range(a.height(), b.height(), min_overlap)?;

    let xs = (dx - REFINE_RADIUS).max(x_low)..=(dx + REFINE_RADIUS).min(x_high);
    let ys = (dy - REFINE_RADIUS).max(y_low)..=(dy + REFINE_RADIUS).min(y_high);

    best_offset(a, b, xs.flat_map(|x| ys.clone().map(move |y| (x, y))))
}

/// Lowest-cost offset; ties keep the first candidate
fn best_offset(
    a: &GrayImage,
    b: &GrayImage,
    candidates: impl Iterator<Item = (i64, i64)>,
) -> Option<(i64, i64, f64)> {
    let mut best: Option<(i64, i64, f64)> = None;
    for (dx, dy) in candidates {
        let Some(cost) = overlap_cost(a, b, dx, dy) else {
            continue;
        };
        match best {
            Some((_, _, current)) if current <= cost => {}
            _ => best = Some((dx, dy, cost)),
        }
    }
    best
}

/// Mean absolute difference over the overlap of `b` placed at (dx, dy)
fn overlap_cost(a: &GrayImage, b: &GrayImage, dx: i64, dy: i64) -> Option<f64> {
    let x0 = dx.max(0);
    let y0 = dy.max(0);
    let x1 = (dx + b.width() as i64).min(a.width() as i64);
    let y1 = (dy + b.height() as i64).min(a.height() as i64);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }

    let area = (x1 - x0) * (y1 - y0);
    let stride = ((area as f64 / MAX_COST_SAMPLES as f64).sqrt().ceil() as usize).max(1);

    let mut sum = 0u64;
    let mut count = 0u64;
    for y in (y0..y1).step_by(stride) {
        for x in (x0..x1).step_by(stride) {
            let pa = a.get_pixel(x as u32, y as u32).0[0];
            let pb = b.get_pixel((x - dx) as u32, (y - dy) as u32).0[0];
            sum += pa.abs_diff(pb) as u64;
            count += 1;
        }
    }

    Some(sum as f64 / count as f64)
}
