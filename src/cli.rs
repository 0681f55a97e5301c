//! Command-line interface definitions

use clap::{Args, Parser, Subcommand};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::{CliOverrides, DEFAULT_OUTPUT};
use crate::stitch::StitchMode;

/// Images looked up when the program is started without arguments
pub const DEFAULT_IMAGE_PATHS: [&str; 2] = ["1.png", "3.png"];

/// Exit codes
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const INVALID_ARGS: i32 = 2;
    pub const INPUT_NOT_FOUND: i32 = 3;
    pub const STITCH_FAILED: i32 = 4;
    pub const OUTPUT_ERROR: i32 = 5;
}

/// Stitch overlapping images into a panorama and remove the black border
#[derive(Debug, Parser)]
#[command(name = "panostitch", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Stitch images into a panorama
    Stitch(StitchArgs),
    /// Detect the black border of an existing image
    Border(BorderArgs),
    /// Show version, system and config information
    Info,
}

#[derive(Debug, Args)]
pub struct StitchArgs {
    /// Input images in stitching order
    #[arg(long, num_args = 1.., required = true, value_name = "PATH")]
    pub images: Vec<PathBuf>,

    /// Output path [default: panorama_result.jpg]
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Keep the black border instead of cropping it
    #[arg(long)]
    pub no_crop: bool,

    /// Save a copy with the detected border drawn on it
    #[arg(long)]
    pub show_border: bool,

    /// Path for the border overlay [default: <output stem>_border.<ext>]
    #[arg(long, value_name = "PATH", requires = "show_border")]
    pub border_output: Option<PathBuf>,

    /// Stitching model
    #[arg(long, value_enum)]
    pub mode: Option<StitchMode>,

    /// Intensity at or below which a pixel counts as border (0-255)
    #[arg(long)]
    pub threshold: Option<u8>,

    /// JPEG quality for .jpg outputs (1-100)
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub jpeg_quality: Option<u8>,

    /// Config file path
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl StitchArgs {
    /// Values that take precedence over the config file
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            threshold: self.threshold,
            crop: self.no_crop.then_some(false),
            mode: self.mode,
            output: self.output.clone(),
            jpeg_quality: self.jpeg_quality,
        }
    }
}

#[derive(Debug, Args)]
pub struct BorderArgs {
    /// Image to analyze
    pub input: PathBuf,

    /// Write the cropped image here
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Write the annotated image here
    #[arg(long, value_name = "PATH")]
    pub annotate: Option<PathBuf>,

    /// Print the detection as JSON
    #[arg(long)]
    pub json: bool,

    /// Intensity at or below which a pixel counts as border (0-255)
    #[arg(long)]
    pub threshold: Option<u8>,

    /// Config file path
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Increase log verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

impl BorderArgs {
    pub fn overrides(&self) -> CliOverrides {
        CliOverrides {
            threshold: self.threshold,
            ..CliOverrides::new()
        }
    }
}

/// Split `names` under `dir` into existing and missing paths
pub fn resolve_default_paths(dir: &Path, names: &[&str]) -> (Vec<PathBuf>, Vec<PathBuf>) {
    names
        .iter()
        .map(|name| dir.join(name))
        .partition(|path| path.is_file())
}

/// Argument list equivalent to the no-argument convenience run
pub fn default_invocation(found: &[PathBuf]) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec!["panostitch".into(), "stitch".into(), "--images".into()];
    args.extend(found.iter().map(|p| p.as_os_str().to_owned()));
    args.push("--output".into());
    args.push(DEFAULT_OUTPUT.into());
    args.push("--show-border".into());
    args
}
