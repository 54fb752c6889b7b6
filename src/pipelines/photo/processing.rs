// SPDX-License-Identifier: GPL-3.0-only

//! Post-processing of captured frames
//!
//! This module turns the encoded bytes delivered by the camera into the
//! final picture:
//! - Decoding, honoring the frame's encoding hint
//! - Orientation correction (sensor frames are landscape; portrait surfaces
//!   need a quarter turn clockwise)
//! - Centered crop to the mask window
//!
//! The crop never clamps: a window larger than the oriented frame is an
//! `OutOfBounds` error.

use crate::backends::camera::types::{CapturedFrame, FrameEncoding, Resolution};
use crate::errors::PhotoError;
use crate::overlay::MaskSpec;
use image::{DynamicImage, RgbImage, imageops};
use tracing::{debug, info};

/// Post-processing configuration, fixed for one capture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostProcessingConfig {
    /// Preview surface was taller than wide when the capture started
    pub surface_is_portrait: bool,
    /// Crop target; an empty window skips the crop
    pub window: MaskSpec,
}

/// Final picture ready for encoding
#[derive(Debug, Clone)]
pub struct CropResult {
    pub image: RgbImage,
    pub width: u32,
    pub height: u32,
}

impl CropResult {
    fn from_image(image: RgbImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            image,
        }
    }
}

/// Post-processor for captured frames
pub struct PostProcessor {
    config: PostProcessingConfig,
}

impl PostProcessor {
    pub fn new(config: PostProcessingConfig) -> Self {
        Self { config }
    }

    /// Decode, orient and crop a frame on the blocking pool
    pub async fn process(&self, frame: CapturedFrame) -> Result<CropResult, PhotoError> {
        info!(
            bytes = frame.len(),
            portrait = self.config.surface_is_portrait,
            window = %self.config.window,
            "Starting post-processing"
        );

        let config = self.config;
        let result = tokio::task::spawn_blocking(move || {
            let decoded = decode_frame(&frame)?;
            orient_and_crop(decoded, config.surface_is_portrait, config.window)
        })
        .await
        .map_err(|e| PhotoError::CaptureFailed(format!("Post-processing task error: {}", e)))??;

        debug!(
            width = result.width,
            height = result.height,
            "Post-processing complete"
        );
        Ok(result)
    }
}

/// Decode the encoded bytes of a captured frame
pub fn decode_frame(frame: &CapturedFrame) -> Result<DynamicImage, PhotoError> {
    if frame.is_empty() {
        return Err(PhotoError::DecodeFailed("Captured frame is empty".into()));
    }

    let decoded = match frame.encoding.image_format() {
        Some(format) => image::load_from_memory_with_format(&frame.data, format),
        None => image::load_from_memory(&frame.data),
    };

    decoded.map_err(|e| {
        let hint = match frame.encoding {
            FrameEncoding::Jpeg => "JPEG",
            FrameEncoding::Png => "PNG",
            FrameEncoding::Unknown => "auto-detected",
        };
        PhotoError::DecodeFailed(format!("{} frame: {}", hint, e))
    })
}

/// Rotate for a portrait surface, then crop the centered window
///
/// Returns the oriented image unchanged when either window dimension is 0.
pub fn orient_and_crop(
    image: DynamicImage,
    surface_is_portrait: bool,
    window: MaskSpec,
) -> Result<CropResult, PhotoError> {
    let rgb = image.into_rgb8();
    let oriented = if surface_is_portrait {
        debug!(
            width = rgb.width(),
            height = rgb.height(),
            "Rotating frame 90° clockwise"
        );
        imageops::rotate90(&rgb)
    } else {
        rgb
    };

    if window.width == 0 || window.height == 0 {
        debug!("No crop window, keeping oriented frame");
        return Ok(CropResult::from_image(oriented));
    }

    crop_centered(oriented, window)
}

/// Crop `window` out of the middle of `image`
pub fn crop_centered(image: RgbImage, window: MaskSpec) -> Result<CropResult, PhotoError> {
    let (img_w, img_h) = image.dimensions();
    if window.width > img_w || window.height > img_h {
        return Err(PhotoError::OutOfBounds {
            requested: Resolution::new(window.width, window.height),
            available: Resolution::new(img_w, img_h),
        });
    }

    if (window.width, window.height) == (img_w, img_h) {
        return Ok(CropResult::from_image(image));
    }

    let x = (img_w - window.width) / 2;
    let y = (img_h - window.height) / 2;
    debug!(x, y, window = %window, "Cropping centered window");

    let cropped = imageops::crop_imm(&image, x, y, window.width, window.height).to_image();
    Ok(CropResult::from_image(cropped))
}
