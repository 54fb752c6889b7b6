// SPDX-License-Identifier: GPL-3.0-only

//! Camera backend abstraction
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │ CaptureOrchestrator │  ← focus → shutter → frame → crop → save
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │    CameraSession    │  ← Exclusive handle, lifecycle, liveness epoch
//! └──────────┬──────────┘
//!            │
//!            ▼
//! ┌─────────────────────┐
//! │  CameraBackend Trait│  ← Common interface
//! └──────────┬──────────┘
//!            │
//!            ▼
//!   ┌──────────────────┐
//!   │FileSourceBackend │  ← Still image served as a camera
//!   └──────────────────┘
//! ```
//!
//! Focus and shutter complete asynchronously: the backend answers with
//! [`CameraEvent`]s on the channel handed to the request, tagged with the
//! request's [`CaptureToken`].

pub mod file_source;
pub mod manager;
pub mod preferences;
pub mod types;

pub use file_source::{FileSourceBackend, FileSourceFaults};
pub use manager::{CameraSession, SessionLifecycle, SessionSettings};
pub use preferences::{select_picture_size, select_preview_size};
pub use types::*;

use crate::flash::FlashMode;

/// Hardware collaborator
///
/// A backend wraps one physical (or virtual) camera. All calls come from
/// [`CameraSession`], which serialises them behind a single mutex.
pub trait CameraBackend: Send {
    // ===== Lifecycle =====

    /// Acquire the device
    fn open(&mut self) -> BackendResult<()>;

    /// Release the device; must be safe when already released
    fn release(&mut self);

    fn is_open(&self) -> bool;

    // ===== Negotiation =====

    /// Preview sizes in the device's preferred order
    fn supported_preview_sizes(&self) -> BackendResult<Vec<Resolution>>;

    /// Still-picture sizes in the device's preferred order
    fn supported_picture_sizes(&self) -> BackendResult<Vec<Resolution>>;

    /// Rotation applied to the preview, in degrees clockwise
    fn set_display_orientation(&mut self, degrees: u32) -> BackendResult<()>;

    fn set_preview_size(&mut self, size: Resolution) -> BackendResult<()>;

    fn set_picture_size(&mut self, size: Resolution) -> BackendResult<()>;

    /// Hardware compression hint (0-100)
    fn set_jpeg_quality(&mut self, quality: u8) -> BackendResult<()>;

    fn set_flash_mode(&mut self, mode: FlashMode) -> BackendResult<()>;

    // ===== Preview =====

    fn start_preview(&mut self) -> BackendResult<()>;

    fn stop_preview(&mut self) -> BackendResult<()>;

    // ===== Capture =====

    /// Start autofocus; answers with exactly one [`CameraEvent::FocusResult`]
    /// or [`CameraEvent::Error`]
    fn auto_focus(&mut self, token: CaptureToken, events: EventSender) -> BackendResult<()>;

    /// Release the shutter; answers with [`CameraEvent::ShutterSignal`]
    /// followed by [`CameraEvent::FrameReady`], or with [`CameraEvent::Error`]
    fn take_picture(&mut self, token: CaptureToken, events: EventSender) -> BackendResult<()>;

    // ===== Metadata =====

    /// Human-readable device name
    fn name(&self) -> &str;
}
