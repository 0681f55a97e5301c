//! Library-level stitch + border pipeline tests

mod common;

use image::{DynamicImage, GenericImageView};
use panostitch::{
    create_stitcher, BorderBoxFinder, BoundingRect, StitchError, StitchMode, StitchOptions,
    Stitcher, TranslationStitcher,
};

use common::{crop, texture};

#[test]
fn test_three_image_strip() {
    let src = texture(400, 150);
    let images = vec![
        crop(&src, 0, 0, 160, 150),
        crop(&src, 110, 0, 160, 150),
        crop(&src, 230, 0, 160, 150),
    ];

    let stitcher = create_stitcher(StitchMode::Scans, StitchOptions::default()).unwrap();
    let panorama = stitcher.stitch(&images).unwrap();

    assert_eq!(panorama.positions, vec![(0, 0), (110, 0), (230, 0)]);
    assert_eq!(panorama.alignments.len(), 2);
    assert_eq!(panorama.image.dimensions(), (390, 150));

    // Composite reproduces the source strip
    let expected = crop(&src, 0, 0, 390, 150).to_rgb8();
    assert_eq!(panorama.image.to_rgb8(), expected);
}

#[test]
fn test_vertical_drift_produces_black_border() {
    let src = texture(300, 200);
    let images = vec![crop(&src, 0, 30, 170, 150), crop(&src, 100, 0, 170, 150)];

    let panorama = TranslationStitcher::default().stitch(&images).unwrap();
    assert_eq!(panorama.image.dimensions(), (270, 180));
    assert_eq!(panorama.positions, vec![(0, 30), (100, 0)]);

    // Top-left and bottom-right corners are uncovered
    let rgb = panorama.image.to_rgb8();
    assert_eq!(rgb.get_pixel(0, 0).0, [0, 0, 0]);
    assert_eq!(rgb.get_pixel(269, 179).0, [0, 0, 0]);

    let rect = BorderBoxFinder::content_bounding_rect(&panorama.image).unwrap();
    assert_eq!(rect, BoundingRect::new(0, 0, 270, 180));
}

#[test]
fn test_crop_removes_padding_around_stitch() {
    let src = texture(260, 160);
    let images = vec![crop(&src, 0, 0, 160, 160), crop(&src, 90, 0, 160, 160)];
    let panorama = TranslationStitcher::default().stitch(&images).unwrap();

    // Pad the result with a black frame, as a projective warp would
    let mut padded = DynamicImage::new_rgb8(290, 200);
    image::imageops::replace(&mut padded, &panorama.image, 20, 15);

    let rect = BorderBoxFinder::content_bounding_rect(&padded).unwrap();
    assert_eq!(rect, BoundingRect::new(20, 15, 250, 160));

    let cropped = BorderBoxFinder::crop(&padded);
    assert_eq!(cropped.to_rgb8(), panorama.image.to_rgb8());
}

#[test]
fn test_unrelated_images_fail_alignment() {
    let a = crop(&texture(300, 300), 0, 0, 100, 100);
    let b = DynamicImage::new_rgb8(100, 100);

    let err = TranslationStitcher::default().stitch(&[a, b]).unwrap_err();
    assert!(matches!(err, StitchError::AlignmentFailed { pair: 0, .. }));
    assert_eq!(err.status_code(), 2);
}
