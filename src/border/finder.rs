//! Border box finder
//!
//! Locates the non-black content of a stitched canvas and derives the
//! annotate and crop operations from it. All operations are pure functions
//! of the pixel data: the input is only borrowed and results are fresh
//! images.

use image::{DynamicImage, GenericImageView, GrayImage};
use tracing::debug;

use super::annotate::draw_border_overlay;
use super::region::{binarize, find_external_regions, largest_region};
use super::types::{BorderDetection, BoundingRect};
use super::BorderOptions;

/// Black border detector
pub struct BorderBoxFinder;

impl BorderBoxFinder {
    /// Bounding rectangle of the largest external non-black region
    ///
    /// Returns `None` for an all-black or zero-sized image.
    pub fn content_bounding_rect(image: &DynamicImage) -> Option<BoundingRect> {
        Self::content_bounding_rect_with(image, &BorderOptions::default())
    }

    /// [`content_bounding_rect`](Self::content_bounding_rect) with explicit options
    pub fn content_bounding_rect_with(
        image: &DynamicImage,
        options: &BorderOptions,
    ) -> Option<BoundingRect> {
        Self::detect_with(image, options).rect
    }

    /// Full detection report using default options
    pub fn detect(image: &DynamicImage) -> BorderDetection {
        Self::detect_with(image, &BorderOptions::default())
    }

    /// Full detection report
    pub fn detect_with(image: &DynamicImage, options: &BorderOptions) -> BorderDetection {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            debug!(width, height, "empty image, no border detection");
            return BorderDetection::empty((width, height));
        }

        let gray = image.to_luma8();
        Self::detect_from_gray(&gray, options.threshold)
    }

    /// Detection on an already grayscale image
    pub fn detect_from_gray(gray: &GrayImage, threshold: u8) -> BorderDetection {
        let (width, height) = gray.dimensions();
        let binary = binarize(gray, threshold);
        let regions = find_external_regions(&binary);

        let Some(largest) = largest_region(&regions) else {
            debug!(width, height, threshold, "no foreground content");
            return BorderDetection::empty((width, height));
        };

        let rect = largest.bounding_rect();
        debug!(
            width,
            height,
            regions = regions.len(),
            area = largest.area,
            first_pixel = largest.first_index,
            %rect,
            "content bounding rect"
        );

        BorderDetection {
            image_size: (width, height),
            rect: Some(rect),
            region_count: regions.len(),
            content_area: largest.area,
        }
    }

    /// Copy of `image` with the content rectangle and its label drawn in red
    ///
    /// Without content the result is an unchanged copy of the input.
    pub fn annotate(image: &DynamicImage) -> DynamicImage {
        Self::annotate_with(image, &BorderOptions::default())
    }

    /// [`annotate`](Self::annotate) with explicit options
    pub fn annotate_with(image: &DynamicImage, options: &BorderOptions) -> DynamicImage {
        match Self::content_bounding_rect_with(image, options) {
            Some(rect) => draw_border_overlay(image, rect, options),
            None => image.clone(),
        }
    }

    /// Draw a previously computed rectangle
    pub fn annotate_rect(
        image: &DynamicImage,
        rect: BoundingRect,
        options: &BorderOptions,
    ) -> DynamicImage {
        draw_border_overlay(image, rect, options)
    }

    /// Sub-image covering exactly the content rectangle
    ///
    /// Without content the result is an unchanged copy of the input.
    pub fn crop(image: &DynamicImage) -> DynamicImage {
        Self::crop_with(image, &BorderOptions::default())
    }

    /// [`crop`](Self::crop) with explicit options
    pub fn crop_with(image: &DynamicImage, options: &BorderOptions) -> DynamicImage {
        match Self::content_bounding_rect_with(image, options) {
            Some(rect) => Self::crop_to_rect(image, rect),
            None => image.clone(),
        }
    }

    /// Crop to a previously computed rectangle
    pub fn crop_to_rect(image: &DynamicImage, rect: BoundingRect) -> DynamicImage {
        image.crop_imm(rect.x, rect.y, rect.width, rect.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb, RgbImage, Rgba, RgbaImage};

    fn canvas_with_blocks(
        width: u32,
        height: u32,
        blocks: &[(BoundingRect, [u8; 3])],
    ) -> DynamicImage {
        let mut img = RgbImage::new(width, height);
        for (rect, color) in blocks {
            for y in rect.y..rect.bottom() {
                for x in rect.x..rect.right() {
                    img.put_pixel(x, y, Rgb(*color));
                }
            }
        }
        DynamicImage::ImageRgb8(img)
    }

    #[test]
    fn test_all_black_has_no_rect() {
        for (w, h) in [(1, 1), (10, 3), (100, 100)] {
            let img = DynamicImage::ImageRgb8(RgbImage::new(w, h));
            assert_eq!(BorderBoxFinder::content_bounding_rect(&img), None);
        }
    }

    #[test]
    fn test_zero_sized_image() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(0, 0));
        assert_eq!(BorderBoxFinder::content_bounding_rect(&img), None);
        let cropped = BorderBoxFinder::crop(&img);
        assert_eq!(cropped.dimensions(), (0, 0));
    }

    #[test]
    fn test_single_block_exact_rect() {
        let rect = BoundingRect::new(10, 20, 40, 30);
        let img = canvas_with_blocks(100, 100, &[(rect, [255, 255, 255])]);
        assert_eq!(BorderBoxFinder::content_bounding_rect(&img), Some(rect));
    }

    #[test]
    fn test_scenario_crop_dimensions() {
        let rect = BoundingRect::new(10, 20, 40, 30);
        let img = canvas_with_blocks(100, 100, &[(rect, [255, 255, 255])]);
        let cropped = BorderBoxFinder::crop(&img);
        assert_eq!(cropped.dimensions(), (40, 30));
    }

    #[test]
    fn test_larger_of_two_regions_wins() {
        let small = BoundingRect::new(2, 2, 10, 10);
        let large = BoundingRect::new(40, 50, 30, 20);
        let img = canvas_with_blocks(
            100,
            100,
            &[(small, [200, 200, 200]), (large, [90, 120, 30])],
        );
        assert_eq!(BorderBoxFinder::content_bounding_rect(&img), Some(large));
    }

    #[test]
    fn test_equal_regions_first_in_scan_order() {
        let lower_left = BoundingRect::new(5, 60, 20, 20);
        let upper_right = BoundingRect::new(70, 10, 20, 20);
        let img = canvas_with_blocks(
            100,
            100,
            &[(lower_left, [255, 255, 255]), (upper_right, [255, 255, 255])],
        );
        assert_eq!(BorderBoxFinder::content_bounding_rect(&img), Some(upper_right));
    }

    #[test]
    fn test_crop_matches_source_region() {
        let mut img = RgbImage::new(64, 48);
        let rect = BoundingRect::new(7, 5, 30, 20);
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                img.put_pixel(x, y, Rgb([(x * 3) as u8 + 10, (y * 5) as u8 + 10, 77]));
            }
        }
        let img = DynamicImage::ImageRgb8(img);

        let found = BorderBoxFinder::content_bounding_rect(&img).unwrap();
        assert_eq!(found, rect);

        let cropped = BorderBoxFinder::crop(&img);
        assert_eq!(cropped.dimensions(), (rect.width, rect.height));
        for (x, y, pixel) in cropped.pixels() {
            assert_eq!(pixel, img.get_pixel(rect.x + x, rect.y + y));
        }
    }

    #[test]
    fn test_crop_is_idempotent() {
        let rect = BoundingRect::new(12, 8, 33, 21);
        let img = canvas_with_blocks(80, 60, &[(rect, [30, 160, 220])]);
        let once = BorderBoxFinder::crop(&img);
        let twice = BorderBoxFinder::crop(&once);
        assert_eq!(once.dimensions(), twice.dimensions());
        assert_eq!(once.to_rgb8(), twice.to_rgb8());
    }

    #[test]
    fn test_crop_without_content_returns_input() {
        let img = DynamicImage::ImageLuma8(GrayImage::new(20, 10));
        let cropped = BorderBoxFinder::crop(&img);
        assert_eq!(cropped, img);
    }

    #[test]
    fn test_crop_keeps_color_model() {
        let mut rgba = RgbaImage::new(20, 20);
        for y in 5..15 {
            for x in 4..12 {
                rgba.put_pixel(x, y, Rgba([200, 10, 10, 255]));
            }
        }
        let img = DynamicImage::ImageRgba8(rgba);
        let cropped = BorderBoxFinder::crop(&img);
        assert!(matches!(cropped, DynamicImage::ImageRgba8(_)));
        assert_eq!(cropped.dimensions(), (8, 10));
    }

    #[test]
    fn test_annotate_keeps_dimensions() {
        let rect = BoundingRect::new(10, 20, 40, 30);
        let img = canvas_with_blocks(100, 100, &[(rect, [255, 255, 255])]);
        let annotated = BorderBoxFinder::annotate(&img);
        assert_eq!(annotated.dimensions(), img.dimensions());
    }

    #[test]
    fn test_annotate_does_not_mutate_input() {
        let rect = BoundingRect::new(10, 20, 40, 30);
        let img = canvas_with_blocks(100, 100, &[(rect, [255, 255, 255])]);
        let before = img.clone();
        let annotated = BorderBoxFinder::annotate(&img);
        assert_eq!(img, before);
        assert_ne!(annotated.to_rgb8(), img.to_rgb8());
    }

    #[test]
    fn test_annotate_without_content_returns_input() {
        let img = DynamicImage::ImageLuma8(GrayImage::new(30, 30));
        let annotated = BorderBoxFinder::annotate(&img);
        assert_eq!(annotated, img);
    }

    #[test]
    fn test_threshold_boundary() {
        let mut gray = GrayImage::new(10, 10);
        gray.put_pixel(2, 2, Luma([1]));
        gray.put_pixel(7, 7, Luma([2]));
        let img = DynamicImage::ImageLuma8(gray);

        let rect = BorderBoxFinder::content_bounding_rect(&img);
        assert_eq!(rect, Some(BoundingRect::new(7, 7, 1, 1)));

        let strict = BorderOptions::builder().threshold(0).build();
        let detection = BorderBoxFinder::detect_with(&img, &strict);
        assert_eq!(detection.region_count, 2);
        assert_eq!(detection.rect, Some(BoundingRect::new(2, 2, 1, 1)));
    }

    #[test]
    fn test_ring_beats_larger_pixel_count_elsewhere() {
        // Hollow 20x20 frame: 76 foreground pixels, 400 enclosed
        let mut img = RgbImage::new(60, 30);
        for i in 0..20 {
            for (x, y) in [(i, 0), (i, 19), (0, i), (19, i)] {
                img.put_pixel(x + 2, y + 2, Rgb([255, 255, 255]));
            }
        }
        // Solid 12x12 block: 144 foreground pixels
        for y in 5..17 {
            for x in 40..52 {
                img.put_pixel(x, y, Rgb([255, 255, 255]));
            }
        }
        let img = DynamicImage::ImageRgb8(img);

        let detection = BorderBoxFinder::detect(&img);
        assert_eq!(detection.rect, Some(BoundingRect::new(2, 2, 20, 20)));
        assert_eq!(detection.content_area, 400);
        assert_eq!(detection.region_count, 2);
    }

    #[test]
    fn test_irregular_canvas_bounding_box() {
        // Two overlapping panels offset vertically, like a stitched canvas
        let mut img = RgbImage::new(120, 80);
        let left = RgbImage::from_pixel(70, 60, Rgb([120, 120, 120]));
        let right = RgbImage::from_pixel(70, 60, Rgb([140, 100, 90]));
        image::imageops::replace(&mut img, &left, 0, 10);
        image::imageops::replace(&mut img, &right, 50, 0);
        let img = DynamicImage::ImageRgb8(img);

        let rect = BorderBoxFinder::content_bounding_rect(&img).unwrap();
        assert_eq!(rect, BoundingRect::new(0, 0, 120, 70));
        assert!(rect.fits_within(img.width(), img.height()));
    }

    #[test]
    fn test_detection_report_fields() {
        let rect = BoundingRect::new(10, 20, 40, 30);
        let img = canvas_with_blocks(100, 100, &[(rect, [255, 255, 255])]);
        let detection = BorderBoxFinder::detect(&img);
        assert_eq!(detection.image_size, (100, 100));
        assert_eq!(detection.region_count, 1);
        assert_eq!(detection.content_area, 1200);
        assert_eq!(detection.border_pixels(), 8800);
    }

    #[test]
    fn test_annotate_rect_matches_annotate() {
        let rect = BoundingRect::new(10, 20, 40, 30);
        let img = canvas_with_blocks(100, 100, &[(rect, [255, 255, 255])]);
        let options = BorderOptions::default();

        let direct = BorderBoxFinder::annotate_rect(&img, rect, &options);
        let detected = BorderBoxFinder::annotate_with(&img, &options);
        assert_eq!(direct.to_rgb8(), detected.to_rgb8());
    }
}
