//! panostitch - panorama stitching with black border removal
//!
//! Stitches overlapping images onto one canvas, then locates the largest
//! non-black region and crops (or annotates) it.
//!
//! # Modules
//!
//! - [`border`] - content rectangle detection, crop and overlay
//! - [`stitch`] - [`Stitcher`] trait and the translation stitcher
//! - [`image_io`] - image reading and writing
//! - [`config`] - TOML configuration
//! - [`cli`] - command-line definitions
//! - [`progress`] - stage tracking for the CLI
//!
//! # Example
//!
//! ```rust,no_run
//! use panostitch::{create_stitcher, BorderBoxFinder, StitchMode, StitchOptions};
//!
//! let images = vec![image::open("1.png").unwrap(), image::open("3.png").unwrap()];
//! let stitcher = create_stitcher(StitchMode::Scans, StitchOptions::default()).unwrap();
//! let panorama = stitcher.stitch(&images).unwrap();
//!
//! let cropped = BorderBoxFinder::crop(&panorama.image);
//! cropped.save("panorama_result.png").unwrap();
//! ```

pub mod border;
pub mod cli;
pub mod config;
pub mod image_io;
pub mod progress;
pub mod stitch;

// Border
pub use border::{
    format_label, BorderBoxFinder, BorderDetection, BorderOptions, BorderOptionsBuilder,
    BoundingRect,
};

// Stitch
pub use stitch::{
    create_stitcher, PairAlignment, Panorama, StitchError, StitchMode, StitchOptions,
    StitchOptionsBuilder, Stitcher, TranslationStitcher,
};

// Image I/O
pub use image_io::{check_and_read_image, save_image, sibling_path, ImageIoError};

// Config
pub use config::{CliOverrides, Config, ConfigError};

// CLI
pub use cli::{exit_codes, BorderArgs, Cli, Commands, StitchArgs};

// Progress
pub use progress::{OutputMode, ProcessingStage, ProgressTracker};
