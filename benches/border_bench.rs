use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{DynamicImage, GrayImage, Luma};
use panostitch::{BorderBoxFinder, BorderOptions};

/// Black canvas with an off-center bright block and scattered specks
fn synthetic_panorama(width: u32, height: u32) -> DynamicImage {
    let (x0, y0) = (width / 10, height / 8);
    let (x1, y1) = (width - width / 7, height - height / 9);
    let gray = GrayImage::from_fn(width, height, |x, y| {
        if x >= x0 && x < x1 && y >= y0 && y < y1 {
            Luma([40 + ((x * 7 + y * 3) % 200) as u8])
        } else if (x * 31 + y * 17) % 997 == 0 {
            Luma([255])
        } else {
            Luma([0])
        }
    });
    DynamicImage::ImageLuma8(gray)
}

fn bench_detect(c: &mut Criterion) {
    let mut group = c.benchmark_group("content_bounding_rect");
    for &(w, h) in &[(640u32, 360u32), (1920, 1080), (4000, 1500)] {
        let image = synthetic_panorama(w, h);
        group.bench_with_input(BenchmarkId::from_parameter(format!("{w}x{h}")), &image, |b, img| {
            b.iter(|| BorderBoxFinder::content_bounding_rect(black_box(img)))
        });
    }
    group.finish();
}

fn bench_crop_and_annotate(c: &mut Criterion) {
    let image = synthetic_panorama(1920, 1080);
    let options = BorderOptions::default();

    c.bench_function("crop_1920x1080", |b| {
        b.iter(|| BorderBoxFinder::crop_with(black_box(&image), &options))
    });
    c.bench_function("annotate_1920x1080", |b| {
        b.iter(|| BorderBoxFinder::annotate_with(black_box(&image), &options))
    });
}

criterion_group!(benches, bench_detect, bench_crop_and_annotate);
criterion_main!(benches);
