//! Progress tracking module for the stitch pipeline.
//!
//! Stage headers go to stdout depending on the [`OutputMode`]. In verbose
//! mode image loading also shows an `indicatif` bar.

use indicatif::{ProgressBar, ProgressStyle};
use std::fmt;
use std::time::Instant;
use tracing::Level;

/// Pipeline stages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProcessingStage {
    /// Initializing
    #[default]
    Initializing,
    /// Reading input images
    Loading,
    /// Aligning and compositing
    Stitching,
    /// Locating the content rectangle
    DetectingBorder,
    /// Drawing the border overlay
    Annotating,
    /// Cropping to the content rectangle
    Cropping,
    /// Writing output files
    Writing,
    /// Completed
    Completed,
}

impl ProcessingStage {
    /// Stage name
    pub fn name(&self) -> &'static str {
        match self {
            ProcessingStage::Initializing => "Initializing",
            ProcessingStage::Loading => "Loading",
            ProcessingStage::Stitching => "Stitching",
            ProcessingStage::DetectingBorder => "DetectingBorder",
            ProcessingStage::Annotating => "Annotating",
            ProcessingStage::Cropping => "Cropping",
            ProcessingStage::Writing => "Writing",
            ProcessingStage::Completed => "Completed",
        }
    }

    /// Human-readable description
    pub fn description(&self) -> &'static str {
        match self {
            ProcessingStage::Initializing => "preparing",
            ProcessingStage::Loading => "reading images",
            ProcessingStage::Stitching => "aligning and compositing",
            ProcessingStage::DetectingBorder => "finding content area",
            ProcessingStage::Annotating => "drawing border overlay",
            ProcessingStage::Cropping => "removing black border",
            ProcessingStage::Writing => "saving result",
            ProcessingStage::Completed => "done",
        }
    }
}

impl fmt::Display for ProcessingStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.description())
    }
}

/// Output verbosity mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// No output
    Quiet,
    /// Normal output (stage display only)
    #[default]
    Normal,
    /// Verbose output (per-image progress)
    Verbose,
    /// Very verbose
    VeryVerbose,
}

impl OutputMode {
    /// Create OutputMode from `-v` count and `-q`
    pub fn from_flags(verbosity: u8, quiet: bool) -> Self {
        if quiet {
            return OutputMode::Quiet;
        }
        match verbosity {
            0 => OutputMode::Normal,
            1 => OutputMode::Verbose,
            _ => OutputMode::VeryVerbose,
        }
    }

    /// Check if output should be shown at this mode
    pub fn should_show(&self, required: OutputMode) -> bool {
        use OutputMode::*;
        match (self, required) {
            (Quiet, _) => false,
            (Normal, Quiet | Normal) => true,
            (Verbose, Quiet | Normal | Verbose) => true,
            (VeryVerbose, _) => true,
            _ => false,
        }
    }

    /// Max `tracing` level logged in this mode
    pub fn log_level(&self) -> Level {
        match self {
            OutputMode::Quiet => Level::ERROR,
            OutputMode::Normal => Level::WARN,
            OutputMode::Verbose => Level::INFO,
            OutputMode::VeryVerbose => Level::DEBUG,
        }
    }
}

/// Progress tracker for one stitch run
#[derive(Debug)]
pub struct ProgressTracker {
    /// Current processing stage
    pub current_stage: ProcessingStage,
    /// Number of input images
    pub total_images: usize,
    start_time: Instant,
    output_mode: OutputMode,
}

impl Default for ProgressTracker {
    fn default() -> Self {
        Self::new(0, OutputMode::Normal)
    }
}

impl ProgressTracker {
    /// Create a new progress tracker
    pub fn new(total_images: usize, output_mode: OutputMode) -> Self {
        Self {
            current_stage: ProcessingStage::Initializing,
            total_images,
            start_time: Instant::now(),
            output_mode,
        }
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    /// Set the current processing stage
    pub fn set_stage(&mut self, stage: ProcessingStage) {
        self.current_stage = stage;
        if self.output_mode.should_show(OutputMode::Verbose) {
            println!("  Stage: {}", self.current_stage);
        }
    }

    /// Bar for reading `total` images, hidden unless verbose
    pub fn loading_bar(&self, total: usize) -> ProgressBar {
        if !self.output_mode.should_show(OutputMode::Verbose) {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(total as u64);
        if let Ok(style) =
            ProgressStyle::with_template("    {bar:40.cyan/blue} {pos}/{len} {msg}")
        {
            bar.set_style(style.progress_chars("=>-"));
        }
        bar
    }

    /// Mark the run as complete
    pub fn complete(&mut self) {
        self.current_stage = ProcessingStage::Completed;
        if self.output_mode.should_show(OutputMode::Verbose) {
            println!("  Completed in {:.2}s", self.elapsed_secs());
        }
    }

    /// Get elapsed time in seconds
    pub fn elapsed_secs(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    /// Print final summary
    pub fn print_summary(&self, canvas: (u32, u32), output: (u32, u32), cropped: bool) {
        if !self.output_mode.should_show(OutputMode::Normal) {
            return;
        }
        println!();
        println!("{}", "=".repeat(60));
        println!("Stitch Summary");
        println!("{}", "=".repeat(60));
        println!("  Images:   {}", self.total_images);
        println!("  Canvas:   {}x{}", canvas.0, canvas.1);
        println!(
            "  Output:   {}x{}{}",
            output.0,
            output.1,
            if cropped { " (cropped)" } else { "" }
        );
        println!("  Time:     {:.2}s", self.elapsed_secs());
        println!("{}", "=".repeat(60));
    }
}
