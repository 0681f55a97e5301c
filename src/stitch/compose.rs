//! Canvas composition
//!
//! Accumulates pairwise offsets into absolute positions, sizes a canvas
//! covering every placed image and paints the images in input order.
//! Later images overwrite earlier ones where they overlap.

use image::{imageops, DynamicImage, RgbImage};
use tracing::debug;

use super::{Result, StitchError};

/// Composited canvas and per-image placement
pub(crate) struct Composite {
    pub canvas: RgbImage,
    pub positions: Vec<(u32, u32)>,
}

/// Absolute origins from consecutive offsets, first image at (0, 0)
fn accumulate(offsets: &[(i64, i64)]) -> Vec<(i64, i64)> {
    let mut origins = Vec::with_capacity(offsets.len() + 1);
    let mut current = (0i64, 0i64);
    origins.push(current);
    for (dx, dy) in offsets {
        current = (current.0 + dx, current.1 + dy);
        origins.push(current);
    }
    origins
}

/// Paint `images` onto a black canvas, image `i + 1` placed at
/// `offsets[i]` relative to image `i`
pub(crate) fn composite(
    images: &[DynamicImage],
    offsets: &[(i64, i64)],
    max_canvas_pixels: u64,
) -> Result<Composite> {
    let origins = accumulate(offsets);

    let min_x = origins.iter().map(|o| o.0).min().unwrap_or(0);
    let min_y = origins.iter().map(|o| o.1).min().unwrap_or(0);
    let max_x = images
        .iter()
        .zip(&origins)
        .map(|(img, o)| o.0 + img.width() as i64)
        .max()
        .unwrap_or(0);
    let max_y = images
        .iter()
        .zip(&origins)
        .map(|(img, o)| o.1 + img.height() as i64)
        .max()
        .unwrap_or(0);

    let width = (max_x - min_x).max(0) as u64;
    let height = (max_y - min_y).max(0) as u64;
    if width * height > max_canvas_pixels || width > u32::MAX as u64 || height > u32::MAX as u64
    {
        return Err(StitchError::CanvasTooLarge { width, height });
    }

    debug!(width, height, images = images.len(), "compositing canvas");

    let mut canvas = RgbImage::new(width as u32, height as u32);
    let mut positions = Vec::with_capacity(images.len());
    for (img, (ox, oy)) in images.iter().zip(&origins) {
        let x = ox - min_x;
        let y = oy - min_y;
        imageops::replace(&mut canvas, &img.to_rgb8(), x, y);
        positions.push((x as u32, y as u32));
    }

    Ok(Composite { canvas, positions })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn solid(width: u32, height: u32, value: u8) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([value; 3])))
    }

    #[test]
    fn test_accumulate() {
        let origins = accumulate(&[(10, 5), (-3, 2)]);
        assert_eq!(origins, vec![(0, 0), (10, 5), (7, 7)]);
    }

    #[test]
    fn test_composite_horizontal() {
        let images = vec![solid(20, 10, 100), solid(20, 10, 200)];
        let result = composite(&images, &[(15, 0)], u64::MAX).unwrap();

        assert_eq!(result.canvas.dimensions(), (35, 10));
        assert_eq!(result.positions, vec![(0, 0), (15, 0)]);
        assert_eq!(*result.canvas.get_pixel(0, 0), Rgb([100; 3]));
        // Later image wins in the overlap
        assert_eq!(*result.canvas.get_pixel(16, 5), Rgb([200; 3]));
    }

    #[test]
    fn test_composite_negative_offset_leaves_black_corners() {
        let images = vec![solid(20, 20, 100), solid(20, 20, 200)];
        let result = composite(&images, &[(10, -5)], u64::MAX).unwrap();

        assert_eq!(result.canvas.dimensions(), (30, 25));
        assert_eq!(result.positions, vec![(0, 5), (10, 0)]);
        assert_eq!(*result.canvas.get_pixel(0, 0), Rgb([0; 3]));
        assert_eq!(*result.canvas.get_pixel(29, 24), Rgb([0; 3]));
        assert_eq!(*result.canvas.get_pixel(0, 5), Rgb([100; 3]));
    }

    #[test]
    fn test_canvas_limit() {
        let images = vec![solid(20, 20, 1), solid(20, 20, 1)];
        let err = composite(&images, &[(10, 0)], 100).err();
        assert!(matches!(
            err,
            Some(StitchError::CanvasTooLarge {
                width: 30,
                height: 20
            })
        ));
    }

    #[test]
    fn test_grayscale_inputs_promoted() {
        let gray = DynamicImage::new_luma8(8, 8);
        let images = vec![gray.clone(), gray];
        let result = composite(&images, &[(4, 4)], u64::MAX).unwrap();
        assert_eq!(result.canvas.dimensions(), (12, 12));
    }
}
