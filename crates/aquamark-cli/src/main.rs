//! aquamark - watermark PNG images from the command line
//!
//! Applies one watermark to a set of images that act as the size variants of
//! a single upload.

use anyhow::{Context, Result};
use aquamark_core::{Backend, Filter};
use aquamark_ops::Unit;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "aquamark")]
#[command(author, version, about = "Watermark compositing for PNG images")]
#[command(long_about = "
Places a watermark on each input image using anchor placement, relative or
absolute sizing, opacity and a blend mode.

Examples:
  aquamark apply -w logo.png -o out/ photo.png photo-thumb.png
  aquamark apply -w logo.png -o out/ -s watermark.yaml uploads/*.png
  aquamark apply -w logo.png -o out/ --position top-left --blend-mode multiply img.png
  aquamark apply -w logo.png -o out/ --width 20 --size-unit % --opacity 50 img.png
  aquamark modes
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Number of threads (0 = auto)
    #[arg(short = 'j', long, global = true, default_value = "0")]
    threads: usize,
}

#[derive(Subcommand)]
enum Commands {
    /// Watermark one or more images
    #[command(visible_alias = "a")]
    Apply(ApplyArgs),

    /// List blend modes and how each backend runs them
    #[command(visible_alias = "m")]
    Modes(ModesArgs),
}

#[derive(Args)]
struct ApplyArgs {
    /// Watermark image
    #[arg(short, long)]
    watermark: PathBuf,

    /// Images to watermark; the file stem names the size variant
    #[arg(required = true)]
    input: Vec<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    output: PathBuf,

    /// Settings file (YAML)
    #[arg(short, long)]
    settings: Option<PathBuf>,

    /// Anchor (top-left, middle-center, bottom-right, ...)
    #[arg(long)]
    position: Option<String>,

    /// Horizontal offset from the anchored edge
    #[arg(long, allow_hyphen_values = true)]
    offset_x: Option<i64>,

    /// Vertical offset from the anchored edge
    #[arg(long, allow_hyphen_values = true)]
    offset_y: Option<i64>,

    /// Offset unit: px or %
    #[arg(long)]
    offset_unit: Option<Unit>,

    /// Watermark width (0 = derive from height)
    #[arg(long)]
    width: Option<u32>,

    /// Watermark height (0 = keep aspect)
    #[arg(long)]
    height: Option<u32>,

    /// Size unit: px or %
    #[arg(long)]
    size_unit: Option<Unit>,

    /// Opacity in percent (0-100)
    #[arg(long, allow_hyphen_values = true)]
    opacity: Option<i32>,

    /// Blend mode: opacity, multiply, screen, overlay
    #[arg(short, long)]
    blend_mode: Option<String>,

    /// Raster backend: accelerated or scalar
    #[arg(long, default_value = "accelerated")]
    backend: Backend,

    /// Resampling filter: nearest, bilinear, bicubic, lanczos3
    #[arg(long, default_value = "lanczos3")]
    filter: Filter,
}

#[derive(Args)]
struct ModesArgs {
    /// Only print mode keys
    #[arg(short, long)]
    quiet: bool,
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    // Configure thread pool
    if cli.threads > 0 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(cli.threads)
            .build_global()
            .context("Failed to configure thread pool")?;
    }

    match cli.command {
        Commands::Apply(args) => commands::apply::run(args, cli.verbose).map(|_| ()),
        Commands::Modes(args) => commands::modes::run(args),
    }
}
