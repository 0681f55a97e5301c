//! Image file input and output
//!
//! Reading checks existence first so a missing file and an undecodable
//! file are reported differently. JPEG output is always written as RGB8
//! with an explicit quality.

use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageEncoder, ImageReader};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Default JPEG quality for written images
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Image I/O error types
#[derive(Debug, Error)]
pub enum ImageIoError {
    #[error("Image not found: {0}")]
    NotFound(PathBuf),

    #[error("Cannot read image {path}: {reason}")]
    Unreadable { path: PathBuf, reason: String },

    #[error("Cannot write image {path}: {reason}")]
    WriteFailed { path: PathBuf, reason: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ImageIoError>;

/// Read an image, distinguishing missing files from decode failures
pub fn check_and_read_image(path: &Path) -> Result<DynamicImage> {
    if !path.is_file() {
        return Err(ImageIoError::NotFound(path.to_path_buf()));
    }

    let unreadable = |reason: String| ImageIoError::Unreadable {
        path: path.to_path_buf(),
        reason,
    };
    // Format comes from the file header; the extension is only a fallback
    let image = ImageReader::open(path)
        .and_then(|reader| reader.with_guessed_format())
        .map_err(|e| unreadable(e.to_string()))?
        .decode()
        .map_err(|e| unreadable(e.to_string()))?;

    debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "image loaded"
    );
    Ok(image)
}

/// Whether `path` has a .jpg/.jpeg extension (case-insensitive)
pub fn is_jpeg_path(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg"))
}

/// Write `image` to `path`, creating parent directories
///
/// The format follows the extension. JPEG is encoded from RGB8 with
/// `jpeg_quality` (clamped to 1-100).
pub fn save_image(image: &DynamicImage, path: &Path, jpeg_quality: u8) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let write_failed = |e: image::ImageError| ImageIoError::WriteFailed {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    if is_jpeg_path(path) {
        let rgb = image.to_rgb8();
        let writer = BufWriter::new(File::create(path)?);
        JpegEncoder::new_with_quality(writer, jpeg_quality.clamp(1, 100))
            .write_image(
                rgb.as_raw(),
                rgb.width(),
                rgb.height(),
                image::ExtendedColorType::Rgb8,
            )
            .map_err(write_failed)?;
    } else {
        image.save(path).map_err(write_failed)?;
    }

    debug!(path = %path.display(), "image written");
    Ok(())
}

/// `dir/name.ext` with `suffix` -> `dir/name_suffix.ext`
pub fn sibling_path(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}_{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}_{}", stem, suffix),
    };
    path.with_file_name(name)
}
