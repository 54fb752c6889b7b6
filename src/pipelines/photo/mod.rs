// SPDX-License-Identifier: GPL-3.0-only

//! Async photo capture pipeline
//!
//! ```text
//! Camera Backend → Capture → Decode → Orient/Crop → Encoding → Disk I/O
//!       ↑                                                         │
//!       └──────────── preview restored on failure ────────────────┘
//! ```
//!
//! # Pipeline Stages
//!
//! 1. **Capture**: focus, shutter cue and frame delivery ([`capture`])
//! 2. **Post-Processing**: decode, rotate for portrait, centered crop
//! 3. **Encoding**: JPEG at full quality
//! 4. **Disk I/O**: timestamped file in the save directory

pub mod capture;
pub mod encoding;
pub mod processing;

pub use capture::{CaptureOrchestrator, CaptureStage, LogShutter, ShutterFeedback};
pub use encoding::{EncodedImage, PhotoEncoder};
pub use processing::{CropResult, PostProcessingConfig, PostProcessor};

use crate::backends::camera::types::CapturedFrame;
use crate::errors::PhotoError;
use std::path::PathBuf;

/// Frame → file part of a capture
pub struct PhotoPipeline {
    encoder: PhotoEncoder,
}

impl PhotoPipeline {
    pub fn new() -> Self {
        Self {
            encoder: PhotoEncoder::new(),
        }
    }

    /// Process and save a captured frame
    ///
    /// Runs decode → orient/crop → encode → save and returns the written
    /// path. Nothing is written when an earlier stage fails.
    pub async fn process_and_save(
        &self,
        frame: CapturedFrame,
        processing: PostProcessingConfig,
        output_dir: PathBuf,
    ) -> Result<PathBuf, PhotoError> {
        // Stage 1: Post-process (async, CPU-bound)
        let cropped = PostProcessor::new(processing).process(frame).await?;

        // Stage 2: Encode (async, CPU-bound)
        let encoded = self.encoder.encode(cropped).await?;

        // Stage 3: Save to disk (async, I/O-bound)
        self.encoder.save(encoded, output_dir).await
    }
}

impl Default for PhotoPipeline {
    fn default() -> Self {
        Self::new()
    }
}
