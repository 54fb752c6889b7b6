// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands
//!
//! This module provides command-line functionality for:
//! - Printing mask geometry for a surface
//! - Previewing resolution selection
//! - Capturing through the file-backed camera
//! - Rendering the shaded overlay onto an image

use cropcam::backends::camera::{CameraSession, FileSourceBackend};
use cropcam::overlay::{MaskSpec, SurfaceDims, compute_geometry, render_shades};
use cropcam::errors::AppResult;
use cropcam::{
    CaptureOrchestrator, Config, FlashMode, Resolution, SessionConfig, select_picture_size,
    select_preview_size,
};
use std::path::{Path, PathBuf};

/// Arguments of the `capture` command
pub struct CaptureArgs {
    pub source: PathBuf,
    pub surface: Resolution,
    pub mask: Option<Resolution>,
    pub output: Option<PathBuf>,
    pub quality: Option<u8>,
    pub flash: Option<FlashMode>,
}

/// Load the config file given on the command line, or the default one
pub fn load_config(path: Option<&Path>) -> AppResult<Config> {
    let config = match path {
        Some(path) => Config::load(path)?,
        None => Config::load_default()?,
    };
    Ok(config)
}

fn mask_or_default(config: &Config, mask: Option<Resolution>) -> MaskSpec {
    mask.map(MaskSpec::from).unwrap_or_else(|| config.mask())
}

/// Print window and shade rectangles
pub fn print_geometry(
    config: &Config,
    surface: Resolution,
    mask: Option<Resolution>,
) -> AppResult<()> {
    let surface = SurfaceDims::from(surface);
    let mask = mask_or_default(config, mask);
    let geometry = compute_geometry(surface, mask);

    println!("Surface: {}x{}", surface.width, surface.height);
    println!("Mask:    {} (configured {})", geometry.window_size, mask);

    match geometry.layout {
        Some(layout) => {
            println!("Window:  {}", layout.window);
            println!("Top:     {}", layout.top);
            println!("Bottom:  {}", layout.bottom);
            println!("Left:    {}", layout.left);
            println!("Right:   {}", layout.right);
        }
        None => println!("Overlay: nothing to draw"),
    }

    Ok(())
}

/// Print the preview and picture sizes chosen from `sizes`
pub fn print_selection(
    sizes: &[Resolution],
    display: Resolution,
    screen: Resolution,
) -> AppResult<()> {
    let preview = select_preview_size(sizes, display.width, display.height)
        .ok_or("No supported sizes given")?;
    let picture = select_picture_size(sizes, screen.width, screen.height)
        .ok_or("No supported sizes given")?;

    println!("Preview: {}", preview);
    println!("Picture: {}", picture);
    Ok(())
}

/// Run one capture transaction against `source` and print the saved path
pub fn capture(config: &Config, args: CaptureArgs) -> AppResult<()> {
    let mut session_config = SessionConfig::from_config(config)
        .with_mask(mask_or_default(config, args.mask));
    if let Some(dir) = args.output {
        session_config = session_config.with_save_directory(dir);
    }
    if let Some(quality) = args.quality {
        session_config = session_config.with_picture_quality(quality);
    }
    if let Some(flash) = args.flash {
        session_config = session_config.with_flash_mode(flash);
    }

    // Advertise the source's own size so negotiation has something to pick
    let (width, height) = image::image_dimensions(&args.source)?;
    let backend = FileSourceBackend::from_path(&args.source)?
        .with_sizes(vec![Resolution::new(width, height)]);

    println!("Source:  {} ({}x{})", args.source.display(), width, height);
    println!("Saving to: {}", session_config.save_directory.display());

    let surface = args.surface;
    let session = CameraSession::new(Box::new(backend), session_config);
    session.open(surface.width, surface.height, surface.width, surface.height)?;

    let orchestrator = CaptureOrchestrator::new(session);
    let rt = tokio::runtime::Runtime::new()?;
    let result = rt.block_on(orchestrator.capture(SurfaceDims::from(surface)));
    orchestrator.session().release();

    let path = result?;
    println!("Photo saved: {}", path.display());
    Ok(())
}

/// Shade everything outside the mask window of `source` and save it
pub fn render_overlay(
    config: &Config,
    source: &Path,
    output: &Path,
    mask: Option<Resolution>,
) -> AppResult<()> {
    let mut image = image::open(source)?.to_rgba8();
    let surface = SurfaceDims::new(image.width(), image.height());
    let geometry = compute_geometry(surface, mask_or_default(config, mask));

    if geometry.is_degenerate() {
        println!("Nothing to shade for this mask; writing the image unchanged");
    }
    render_shades(&mut image, &geometry);

    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    image.save(output)?;
    println!("Overlay saved: {}", output.display());
    Ok(())
}
