//! panostitch - panorama stitching with black border removal
//!
//! CLI entry point

use anyhow::Context;
use clap::Parser;
use std::ffi::OsString;
use std::path::Path;
use tracing::{info, warn};

use panostitch::cli::{default_invocation, resolve_default_paths, DEFAULT_IMAGE_PATHS};
use panostitch::{
    check_and_read_image, create_stitcher, exit_codes, format_label, save_image, sibling_path,
    BorderArgs, BorderBoxFinder, Cli, Commands, Config, ConfigError, ImageIoError, OutputMode,
    ProcessingStage, ProgressTracker, StitchArgs, StitchError,
};

fn main() {
    let args: Vec<OsString> = std::env::args_os().collect();
    let cli = if args.len() <= 1 {
        match default_cli() {
            Some(cli) => cli,
            None => std::process::exit(exit_codes::INVALID_ARGS),
        }
    } else {
        Cli::parse_from(args)
    };

    let result = match cli.command {
        Commands::Stitch(args) => {
            init_logging(OutputMode::from_flags(args.verbose, args.quiet));
            run_stitch(&args)
        }
        Commands::Border(args) => {
            init_logging(OutputMode::from_flags(args.verbose, false));
            run_border(&args)
        }
        Commands::Info => {
            init_logging(OutputMode::Normal);
            run_info()
        }
    };

    std::process::exit(match result {
        Ok(()) => exit_codes::SUCCESS,
        Err(e) => {
            report_error(&e);
            exit_code_for(&e)
        }
    });
}

// ============ Startup ============

/// Convenience run without arguments: stitch ./1.png and ./3.png
fn default_cli() -> Option<Cli> {
    let (found, missing) = resolve_default_paths(Path::new("."), &DEFAULT_IMAGE_PATHS);
    for path in &missing {
        eprintln!("Warning: image '{}' not found", path.display());
    }

    if found.len() < 2 {
        eprintln!("Error: need at least 2 images to stitch, found {}", found.len());
        eprintln!("Usage: panostitch stitch --images <PATH> <PATH>... [--output <PATH>]");
        eprintln!("Run 'panostitch --help' for more information.");
        return None;
    }

    Some(Cli::parse_from(default_invocation(&found)))
}

fn init_logging(mode: OutputMode) {
    tracing_subscriber::fmt()
        .with_max_level(mode.log_level())
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Load the config file
///
/// An explicit `--config` must load; discovered files fall back to defaults.
fn load_config(explicit: Option<&Path>) -> anyhow::Result<Config> {
    if let Some(path) = explicit {
        return Config::load_from_path(path)
            .with_context(|| format!("failed to load config {}", path.display()));
    }
    Ok(Config::load().unwrap_or_else(|e| {
        warn!("Failed to load config file: {}", e);
        Config::default()
    }))
}

// ============ Error Reporting ============

fn report_error(error: &anyhow::Error) {
    eprintln!("Error: {:#}", error);
    if let Some(stitch) = error.downcast_ref::<StitchError>() {
        eprintln!("Stitching failed with status code {}", stitch.status_code());
        eprintln!("Hint: {}", stitch.hint());
    }
}

fn exit_code_for(error: &anyhow::Error) -> i32 {
    for cause in error.chain() {
        if let Some(e) = cause.downcast_ref::<StitchError>() {
            return match e {
                StitchError::NeedMoreImages { .. } => exit_codes::INVALID_ARGS,
                _ => exit_codes::STITCH_FAILED,
            };
        }
        if let Some(e) = cause.downcast_ref::<ImageIoError>() {
            return match e {
                ImageIoError::NotFound(_) | ImageIoError::Unreadable { .. } => {
                    exit_codes::INPUT_NOT_FOUND
                }
                ImageIoError::WriteFailed { .. } | ImageIoError::IoError(_) => {
                    exit_codes::OUTPUT_ERROR
                }
            };
        }
        if cause.downcast_ref::<ConfigError>().is_some() {
            return exit_codes::INVALID_ARGS;
        }
    }
    exit_codes::GENERAL_ERROR
}

// ============ Stitch Command ============

fn run_stitch(args: &StitchArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?.merge_with_cli(&args.overrides());
    let mut tracker = ProgressTracker::new(
        args.images.len(),
        OutputMode::from_flags(args.verbose, args.quiet),
    );
    let output = config.output.path.clone();

    tracker.set_stage(ProcessingStage::Loading);
    let bar = tracker.loading_bar(args.images.len());
    let mut images = Vec::with_capacity(args.images.len());
    for path in &args.images {
        bar.set_message(path.display().to_string());
        let image = check_and_read_image(path).with_context(|| {
            format!("make sure image '{}' exists and is accessible", path.display())
        })?;
        images.push(image);
        bar.inc(1);
    }
    bar.finish_and_clear();

    tracker.set_stage(ProcessingStage::Stitching);
    info!(mode = %config.stitch.mode, images = images.len(), "stitching");
    let stitcher = create_stitcher(config.stitch.mode, config.stitch_options())?;
    let panorama = stitcher.stitch(&images)?;
    let canvas_size = (panorama.image.width(), panorama.image.height());
    for (index, (x, y)) in panorama.positions.iter().enumerate() {
        info!(image = index, x, y, "image placed");
    }

    tracker.set_stage(ProcessingStage::DetectingBorder);
    let border_options = config.border_options();
    let detection = BorderBoxFinder::detect_with(&panorama.image, &border_options);
    match detection.rect {
        Some(rect) => {
            info!("{}", format_label(rect));
            if rect.covers(canvas_size.0, canvas_size.1) {
                info!("content spans the whole canvas");
            }
        }
        None => warn!("No content found, keeping the full canvas"),
    }

    if args.show_border {
        tracker.set_stage(ProcessingStage::Annotating);
        let annotated = match detection.rect {
            Some(rect) => BorderBoxFinder::annotate_rect(&panorama.image, rect, &border_options),
            None => panorama.image.clone(),
        };
        let border_path = args
            .border_output
            .clone()
            .unwrap_or_else(|| sibling_path(&output, "border"));
        save_image(&annotated, &border_path, config.output.jpeg_quality)
            .with_context(|| format!("failed to write {}", border_path.display()))?;
        if tracker.output_mode().should_show(OutputMode::Normal) {
            println!("Border overlay saved to {}", border_path.display());
        }
    }

    let result = match detection.rect {
        Some(rect) if config.border.crop => {
            tracker.set_stage(ProcessingStage::Cropping);
            BorderBoxFinder::crop_to_rect(&panorama.image, rect)
        }
        _ => panorama.image,
    };
    let cropped = config.border.crop && detection.rect.is_some();

    tracker.set_stage(ProcessingStage::Writing);
    save_image(&result, &output, config.output.jpeg_quality)
        .with_context(|| format!("failed to write {}", output.display()))?;
    if tracker.output_mode().should_show(OutputMode::Normal) {
        println!("Panorama saved to {}", output.display());
    }

    tracker.complete();
    tracker.print_summary(canvas_size, (result.width(), result.height()), cropped);
    Ok(())
}

// ============ Border Command ============

fn run_border(args: &BorderArgs) -> anyhow::Result<()> {
    let config = load_config(args.config.as_deref())?.merge_with_cli(&args.overrides());
    let options = config.border_options();

    let image = check_and_read_image(&args.input).with_context(|| {
        format!("make sure image '{}' exists and is accessible", args.input.display())
    })?;
    let detection = BorderBoxFinder::detect_with(&image, &options);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&detection)?);
    } else {
        match detection.rect {
            Some(rect) => println!("{}", format_label(rect)),
            None => println!("No content found"),
        }
    }

    if let Some(path) = &args.annotate {
        let annotated = match detection.rect {
            Some(rect) => BorderBoxFinder::annotate_rect(&image, rect, &options),
            None => image.clone(),
        };
        write_output(&annotated, path, config.output.jpeg_quality)?;
    }

    if let Some(path) = &args.output {
        let cropped = match detection.rect {
            Some(rect) => BorderBoxFinder::crop_to_rect(&image, rect),
            None => image.clone(),
        };
        write_output(&cropped, path, config.output.jpeg_quality)?;
    }

    Ok(())
}

fn write_output(image: &image::DynamicImage, path: &Path, quality: u8) -> anyhow::Result<()> {
    save_image(image, path, quality).with_context(|| format!("failed to write {}", path.display()))
}

// ============ Info Command ============

fn run_info() -> anyhow::Result<()> {
    println!("panostitch v{}", env!("CARGO_PKG_VERSION"));
    println!();

    println!("System Information:");
    println!("  Platform: {}", std::env::consts::OS);
    println!("  Arch: {}", std::env::consts::ARCH);
    println!("  CPUs: {}", num_cpus::get());
    println!("  Worker threads: {}", rayon::current_num_threads());

    println!();
    println!("Config File Locations:");
    println!("  Local: ./{}", panostitch::config::LOCAL_CONFIG_FILE);
    if let Some(path) = Config::user_config_path() {
        println!("  User:  {}", path.display());
    }

    println!();
    println!("Effective Config:");
    println!("  {}", load_config(None)?.to_json());

    Ok(())
}
