//! Shared fixtures for integration tests

#![allow(dead_code)]

use image::{imageops, DynamicImage, GrayImage, Luma, Rgb, RgbImage};
use std::path::{Path, PathBuf};

/// Smooth value noise on a 16px lattice, never darker than 20
///
/// `src/stitch/align.rs` tests keep a grayscale copy of the same lattice.
pub fn texture(width: u32, height: u32) -> RgbImage {
    const CELL: u32 = 16;
    let lattice = |ix: u32, iy: u32| -> f32 {
        let h = ix.wrapping_mul(73_856_093) ^ iy.wrapping_mul(19_349_663);
        (h.wrapping_mul(2_654_435_761) >> 24) as f32
    };
    RgbImage::from_fn(width, height, |x, y| {
        let (ix, iy) = (x / CELL, y / CELL);
        let fx = (x % CELL) as f32 / CELL as f32;
        let fy = (y % CELL) as f32 / CELL as f32;
        let top = lattice(ix, iy) * (1.0 - fx) + lattice(ix + 1, iy) * fx;
        let bottom = lattice(ix, iy + 1) * (1.0 - fx) + lattice(ix + 1, iy + 1) * fx;
        let v = (20.0 + (top * (1.0 - fy) + bottom * fy) * 0.85) as u8;
        Rgb([v, v.saturating_add(17), 255 - v])
    })
}

/// Sub-image of `src` as a standalone image
pub fn crop(src: &RgbImage, x: u32, y: u32, width: u32, height: u32) -> DynamicImage {
    DynamicImage::ImageRgb8(imageops::crop_imm(src, x, y, width, height).to_image())
}

/// Black canvas with one white rectangle
pub fn black_with_white_rect(
    width: u32,
    height: u32,
    (x0, y0, w0, h0): (u32, u32, u32, u32),
) -> DynamicImage {
    let gray = GrayImage::from_fn(width, height, |x, y| {
        let inside = x >= x0 && x < x0 + w0 && y >= y0 && y < y0 + h0;
        Luma([if inside { 255 } else { 0 }])
    });
    DynamicImage::ImageLuma8(gray)
}

/// Save `image` as `dir/name` and return the path
pub fn write_png(dir: &Path, name: &str, image: &DynamicImage) -> PathBuf {
    let path = dir.join(name);
    image.save(&path).expect("write fixture");
    path
}
