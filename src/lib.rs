// SPDX-License-Identifier: GPL-3.0-only

//! cropcam - masked photo capture
//!
//! This library constrains a photo to a fixed-size window drawn over the
//! camera preview and produces a picture matching that window: rotated for
//! portrait surfaces and cropped around the center.
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - [`backends`]: Camera abstraction, session lifecycle and resolution selection
//! - [`overlay`]: Mask window and shade geometry, software shade rendering
//! - [`pipelines`]: Decode, orient/crop, encode and save; capture orchestration
//! - [`config`]: User configuration handling
//! - [`storage`]: Save directory and file naming
//!
//! # Example
//!
//! ```ignore
//! use cropcam::{CameraSession, CaptureOrchestrator, FileSourceBackend, SessionConfig, SurfaceDims};
//!
//! let backend = FileSourceBackend::from_path("frame.jpg")?;
//! let session = CameraSession::new(Box::new(backend), SessionConfig::default());
//! session.open(1080, 1920, 1080, 1920)?;
//! let path = CaptureOrchestrator::new(session)
//!     .capture(SurfaceDims::new(1080, 1920))
//!     .await?;
//! ```

pub mod backends;
pub mod config;
pub mod constants;
pub mod errors;
pub mod flash;
pub mod overlay;
pub mod pipelines;
pub mod storage;

// Re-export commonly used types
pub use backends::camera::{
    CameraBackend, CameraSession, FileSourceBackend, Resolution, select_picture_size,
    select_preview_size,
};
pub use config::{Config, SessionConfig};
pub use errors::{AppError, AppResult, CameraError, PhotoError};
pub use flash::FlashMode;
pub use overlay::{MaskGeometry, MaskOverlay, MaskSpec, SurfaceDims, compute_geometry};
pub use pipelines::photo::{CaptureOrchestrator, CaptureStage, PhotoPipeline};
