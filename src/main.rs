// SPDX-License-Identifier: GPL-3.0-only

use clap::{Parser, Subcommand};
use cropcam::{FlashMode, Resolution};
use std::path::PathBuf;

mod cli;

#[derive(Parser)]
#[command(name = "cropcam")]
#[command(about = "Masked photo capture with rotate-then-crop post-processing")]
#[command(version)]
struct Cli {
    /// Config file (default: <config dir>/cropcam/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the mask window and shade rectangles for a surface
    Geometry {
        /// Surface size, e.g. 1080x1920
        #[arg(short, long)]
        surface: Resolution,

        /// Mask size (default: from config)
        #[arg(short, long)]
        mask: Option<Resolution>,
    },

    /// Pick preview and picture sizes from a supported list
    Select {
        /// Supported sizes, comma separated (e.g. 640x480,1280x720)
        #[arg(long, value_delimiter = ',', required = true)]
        sizes: Vec<Resolution>,

        /// Preview target
        #[arg(long)]
        display: Resolution,

        /// Picture target (default: same as display)
        #[arg(long)]
        screen: Option<Resolution>,
    },

    /// Capture a photo from an image file served as a camera
    Capture {
        /// Image to serve as the camera frame
        #[arg(long)]
        source: PathBuf,

        /// Preview surface size
        #[arg(short, long)]
        surface: Resolution,

        /// Mask size (default: from config)
        #[arg(short, long)]
        mask: Option<Resolution>,

        /// Output directory (default: from config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Hardware JPEG quality hint, 0-100
        #[arg(short, long)]
        quality: Option<u8>,

        /// Flash mode: auto, on or off
        #[arg(short, long)]
        flash: Option<FlashMode>,
    },

    /// Render the shaded mask over an image
    Overlay {
        /// Image used as the preview surface
        #[arg(long)]
        source: PathBuf,

        /// Output image (PNG recommended)
        #[arg(short, long)]
        output: PathBuf,

        /// Mask size (default: from config)
        #[arg(short, long)]
        mask: Option<Resolution>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    // Set RUST_LOG environment variable to control log level
    // Examples: RUST_LOG=debug, RUST_LOG=cropcam=debug, RUST_LOG=info
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(true)
        .with_level(true)
        .init();

    let cli = Cli::parse();
    let config = cli::load_config(cli.config.as_deref())?;

    Ok(match cli.command {
        Commands::Geometry { surface, mask } => cli::print_geometry(&config, surface, mask),
        Commands::Select {
            sizes,
            display,
            screen,
        } => cli::print_selection(&sizes, display, screen.unwrap_or(display)),
        Commands::Capture {
            source,
            surface,
            mask,
            output,
            quality,
            flash,
        } => cli::capture(
            &config,
            cli::CaptureArgs {
                source,
                surface,
                mask,
                output,
                quality,
                flash,
            },
        ),
        Commands::Overlay {
            source,
            output,
            mask,
        } => cli::render_overlay(&config, &source, &output, mask),
    }?)
}
