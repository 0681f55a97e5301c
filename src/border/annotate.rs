//! Border overlay drawing
//!
//! Draws the detected rectangle and a `Border: (x, y, w, h)` label onto a
//! copy of the image. The label uses a small built-in 5x7 bitmap font so no
//! font file is needed at runtime.

use image::{DynamicImage, ImageBuffer, Pixel, Rgb, Rgba};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;

use super::types::BoundingRect;
use super::BorderOptions;

// ============================================================
// Constants
// ============================================================

/// Glyph cell width in font units
const GLYPH_WIDTH: u32 = 5;

/// Glyph cell height in font units
const GLYPH_HEIGHT: u32 = 7;

/// Horizontal advance per glyph in font units (cell + 1 column spacing)
const GLYPH_ADVANCE: u32 = GLYPH_WIDTH + 1;

// ============================================================
// Public API
// ============================================================

/// Label text for a rectangle
pub fn format_label(rect: BoundingRect) -> String {
    format!("Border: {}", rect)
}

/// Draw the rectangle outline and label onto a copy of `image`
///
/// Images with an alpha channel come back as RGBA8, everything else as
/// RGB8 so that the overlay color is representable.
pub(crate) fn draw_border_overlay(
    image: &DynamicImage,
    rect: BoundingRect,
    options: &BorderOptions,
) -> DynamicImage {
    let label = format_label(rect);
    let [r, g, b] = options.color;

    if image.color().has_alpha() {
        let mut canvas = image.to_rgba8();
        draw_overlay(&mut canvas, rect, &label, options, Rgba([r, g, b, 255]));
        DynamicImage::ImageRgba8(canvas)
    } else {
        let mut canvas = image.to_rgb8();
        draw_overlay(&mut canvas, rect, &label, options, Rgb([r, g, b]));
        DynamicImage::ImageRgb8(canvas)
    }
}

fn draw_overlay<P>(
    canvas: &mut ImageBuffer<P, Vec<P::Subpixel>>,
    rect: BoundingRect,
    label: &str,
    options: &BorderOptions,
    color: P,
) where
    P: Pixel + 'static,
{
    draw_stroked_rect(canvas, rect, options.stroke_width, color);
    draw_label(
        canvas,
        label,
        options.label_origin,
        options.label_scale,
        color,
    );
}

// ============================================================
// Rectangle
// ============================================================

/// Outline from (x, y) to (x + width, y + height), stroke centered on the edges
fn draw_stroked_rect<P>(
    canvas: &mut ImageBuffer<P, Vec<P::Subpixel>>,
    rect: BoundingRect,
    stroke_width: u32,
    color: P,
) where
    P: Pixel + 'static,
{
    let left = rect.x as i32;
    let top = rect.y as i32;
    let right = rect.right() as i32;
    let bottom = rect.bottom() as i32;

    let stroke = stroke_width.max(1) as i32;
    let first = -(stroke - 1) / 2;

    // Positive offsets grow outward, negative shrink inward
    for offset in first..first + stroke {
        let x0 = left - offset;
        let y0 = top - offset;
        let x1 = right + offset;
        let y1 = bottom + offset;
        if x1 < x0 || y1 < y0 {
            continue;
        }

        let outline = Rect::at(x0, y0).of_size((x1 - x0 + 1) as u32, (y1 - y0 + 1) as u32);
        draw_hollow_rect_mut(canvas, outline, color);
    }
}

// ============================================================
// Label
// ============================================================

/// Draw `text` with its baseline-left corner at `origin`
fn draw_label<P>(
    canvas: &mut ImageBuffer<P, Vec<P::Subpixel>>,
    text: &str,
    origin: (i32, i32),
    scale: u32,
    color: P,
) where
    P: Pixel + 'static,
{
    let scale = scale.max(1);
    let top = origin.1 - (GLYPH_HEIGHT * scale) as i32;
    let mut pen_x = origin.0;

    for c in text.chars() {
        let rows = glyph(c);
        for (row, bits) in rows.iter().enumerate() {
            for col in 0..GLYPH_WIDTH {
                if bits & (1 << (GLYPH_WIDTH - 1 - col)) == 0 {
                    continue;
                }
                let cell = Rect::at(
                    pen_x + (col * scale) as i32,
                    top + (row as u32 * scale) as i32,
                )
                .of_size(scale, scale);
                draw_filled_rect_mut(canvas, cell, color);
            }
        }
        pen_x += (GLYPH_ADVANCE * scale) as i32;
    }
}

/// Bitmap rows for a character, most significant of the low 5 bits is leftmost
fn glyph(c: char) -> [u8; GLYPH_HEIGHT as usize] {
    match c {
        '0' => [0x0E, 0x11, 0x13, 0x15, 0x19, 0x11, 0x0E],
        '1' => [0x04, 0x0C, 0x04, 0x04, 0x04, 0x04, 0x0E],
        '2' => [0x0E, 0x11, 0x01, 0x02, 0x04, 0x08, 0x1F],
        '3' => [0x1F, 0x02, 0x04, 0x02, 0x01, 0x11, 0x0E],
        '4' => [0x02, 0x06, 0x0A, 0x12, 0x1F, 0x02, 0x02],
        '5' => [0x1F, 0x10, 0x1E, 0x01, 0x01, 0x11, 0x0E],
        '6' => [0x06, 0x08, 0x10, 0x1E, 0x11, 0x11, 0x0E],
        '7' => [0x1F, 0x01, 0x02, 0x04, 0x08, 0x08, 0x08],
        '8' => [0x0E, 0x11, 0x11, 0x0E, 0x11, 0x11, 0x0E],
        '9' => [0x0E, 0x11, 0x11, 0x0F, 0x01, 0x02, 0x0C],
        'B' => [0x1E, 0x11, 0x11, 0x1E, 0x11, 0x11, 0x1E],
        'o' => [0x00, 0x00, 0x0E, 0x11, 0x11, 0x11, 0x0E],
        'r' => [0x00, 0x00, 0x16, 0x19, 0x10, 0x10, 0x10],
        'd' => [0x01, 0x01, 0x0D, 0x13, 0x11, 0x11, 0x0F],
        'e' => [0x00, 0x00, 0x0E, 0x11, 0x1F, 0x10, 0x0E],
        ':' => [0x00, 0x0C, 0x0C, 0x00, 0x0C, 0x0C, 0x00],
        '(' => [0x02, 0x04, 0x08, 0x08, 0x08, 0x04, 0x02],
        ')' => [0x08, 0x04, 0x02, 0x02, 0x02, 0x04, 0x08],
        ',' => [0x00, 0x00, 0x00, 0x00, 0x0C, 0x04, 0x08],
        _ => [0x00; GLYPH_HEIGHT as usize],
    }
}
