// SPDX-License-Identifier: GPL-3.0-only

//! Camera session
//!
//! The session provides:
//! - Exclusive ownership of the device handle (one open handle at a time)
//! - Lifecycle tracking: `Closed → Open → Previewing`
//! - Resolution negotiation on open
//! - A liveness epoch, bumped on every open and release, so late hardware
//!   callbacks from an earlier handle can be recognised and dropped
//!
//! Every state transition happens under one mutex.

use super::CameraBackend;
use super::preferences::{select_picture_size, select_preview_size};
use super::types::*;
use crate::config::SessionConfig;
use crate::constants::orientation::{LANDSCAPE_DEGREES, PORTRAIT_DEGREES};
use crate::errors::{CameraError, PhotoError};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionLifecycle {
    /// No device handle held
    Closed,
    /// Device open, preview stopped
    Open,
    /// Device open, preview running
    Previewing,
}

impl SessionLifecycle {
    pub fn is_open(self) -> bool {
        self != SessionLifecycle::Closed
    }
}

/// Outcome of resolution negotiation for one open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    /// Display rotation handed to the hardware (0 or 90)
    pub orientation: u32,
    /// Preview size applied, `None` if the hardware rejected it
    pub preview_size: Option<Resolution>,
    /// Picture size applied, `None` if rejected or nothing was offered
    pub picture_size: Option<Resolution>,
}

/// Internal session state
struct SessionState {
    backend: Box<dyn CameraBackend>,
    lifecycle: SessionLifecycle,
    settings: Option<SessionSettings>,
}

/// Owned camera session
///
/// Cheap to clone; clones share the device handle and epoch. The
/// [`SessionConfig`] is fixed per session: use [`CameraSession::reconfigure`]
/// to get a session with different settings.
#[derive(Clone)]
pub struct CameraSession {
    state: Arc<Mutex<SessionState>>,
    epoch: Arc<watch::Sender<u64>>,
    config: Arc<SessionConfig>,
}

impl CameraSession {
    /// Create a closed session around `backend`
    pub fn new(backend: Box<dyn CameraBackend>, config: SessionConfig) -> Self {
        info!(backend = backend.name(), "Creating camera session");

        let (epoch, _) = watch::channel(0);
        let state = SessionState {
            backend,
            lifecycle: SessionLifecycle::Closed,
            settings: None,
        };

        Self {
            state: Arc::new(Mutex::new(state)),
            epoch: Arc::new(epoch),
            config: Arc::new(config),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn advance_epoch(&self) -> u64 {
        self.epoch.send_modify(|epoch| *epoch += 1);
        *self.epoch.borrow()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn lifecycle(&self) -> SessionLifecycle {
        self.lock().lifecycle
    }

    pub fn is_open(&self) -> bool {
        self.lifecycle().is_open()
    }

    /// Negotiated settings of the current open, if any
    pub fn settings(&self) -> Option<SessionSettings> {
        self.lock().settings
    }

    /// Current liveness epoch
    pub fn epoch(&self) -> u64 {
        *self.epoch.borrow()
    }

    /// Watch the epoch; it changes on every open and release
    pub fn subscribe_epoch(&self) -> watch::Receiver<u64> {
        self.epoch.subscribe()
    }

    /// Whether events tagged with `token` still belong to the live handle
    pub fn is_current(&self, token: &CaptureToken) -> bool {
        token.epoch == self.epoch()
    }

    /// Open the device and configure it for the given targets
    ///
    /// Any handle already held is released first. Orientation is 0° when
    /// the display is wider than tall, 90° otherwise. Rejected sizes are
    /// logged and skipped; an empty preview list is fatal.
    pub fn open(
        &self,
        display_width: u32,
        display_height: u32,
        capture_width: u32,
        capture_height: u32,
    ) -> Result<SessionSettings, CameraError> {
        let mut state = self.lock();

        if state.lifecycle.is_open() || state.backend.is_open() {
            info!("Releasing previous camera handle before reopening");
            Self::release_locked(&mut state);
            self.advance_epoch();
        }

        info!(
            backend = state.backend.name(),
            display = format!("{}x{}", display_width, display_height),
            capture = format!("{}x{}", capture_width, capture_height),
            "Opening camera"
        );

        if let Err(e) = state.backend.open() {
            error!(error = %e, "Failed to open camera");
            return Err(e.into());
        }
        let epoch = self.advance_epoch();
        state.lifecycle = SessionLifecycle::Open;

        match self.configure_locked(
            &mut state,
            display_width,
            display_height,
            capture_width,
            capture_height,
        ) {
            Ok(settings) => {
                state.settings = Some(settings);
                state.lifecycle = SessionLifecycle::Previewing;
                info!(
                    epoch,
                    orientation = settings.orientation,
                    preview = ?settings.preview_size,
                    picture = ?settings.picture_size,
                    "Camera open, preview running"
                );
                Ok(settings)
            }
            Err(e) => {
                error!(error = %e, "Camera setup failed, releasing");
                Self::release_locked(&mut state);
                self.advance_epoch();
                Err(e)
            }
        }
    }

    fn configure_locked(
        &self,
        state: &mut SessionState,
        display_width: u32,
        display_height: u32,
        capture_width: u32,
        capture_height: u32,
    ) -> Result<SessionSettings, CameraError> {
        let backend = &mut state.backend;

        let orientation = if display_width > display_height {
            LANDSCAPE_DEGREES
        } else {
            PORTRAIT_DEGREES
        };
        if let Err(e) = backend.set_display_orientation(orientation) {
            warn!(error = %e, degrees = orientation, "Display orientation not applied");
        }

        if let Err(e) = backend.set_jpeg_quality(self.config.picture_quality) {
            warn!(error = %e, quality = self.config.picture_quality, "JPEG quality not applied");
        }
        if let Err(e) = backend.set_flash_mode(self.config.flash_mode) {
            warn!(error = %e, mode = %self.config.flash_mode, "Flash mode not applied");
        }

        let preview_sizes = backend.supported_preview_sizes()?;
        let preview = select_preview_size(&preview_sizes, display_width, display_height)
            .ok_or(CameraError::NoSupportedResolution)?;
        let preview_size = apply_size(preview, |size| backend.set_preview_size(size), "preview");

        let picture_sizes = backend.supported_picture_sizes()?;
        let picture_size = match select_picture_size(&picture_sizes, capture_width, capture_height)
        {
            Some(picture) => apply_size(picture, |size| backend.set_picture_size(size), "picture"),
            None => {
                warn!("No picture sizes offered, keeping hardware default");
                None
            }
        };

        backend.start_preview()?;

        Ok(SessionSettings {
            orientation,
            preview_size,
            picture_size,
        })
    }

    /// Release the device; safe to call repeatedly
    pub fn release(&self) {
        let mut state = self.lock();
        if !state.lifecycle.is_open() && !state.backend.is_open() {
            debug!("Camera already released");
            return;
        }

        Self::release_locked(&mut state);
        let epoch = self.advance_epoch();
        info!(epoch, "Camera released");
    }

    fn release_locked(state: &mut SessionState) {
        if state.lifecycle == SessionLifecycle::Previewing
            && let Err(e) = state.backend.stop_preview()
        {
            warn!(error = %e, "Failed to stop preview during release");
        }
        state.backend.release();
        state.lifecycle = SessionLifecycle::Closed;
        state.settings = None;
    }

    /// Release and return a session with new settings over the same device
    ///
    /// The caller opens the returned session again.
    pub fn reconfigure(self, config: SessionConfig) -> CameraSession {
        info!("Reconfiguring camera session");
        self.release();
        CameraSession {
            state: self.state,
            epoch: self.epoch,
            config: Arc::new(config),
        }
    }

    /// Resume the live preview (for retry or recapture)
    pub fn start_preview(&self) -> Result<(), CameraError> {
        let mut state = self.lock();
        match state.lifecycle {
            SessionLifecycle::Closed => Err(CameraError::NotOpen),
            SessionLifecycle::Previewing => Ok(()),
            SessionLifecycle::Open => {
                state.backend.start_preview()?;
                state.lifecycle = SessionLifecycle::Previewing;
                debug!("Preview started");
                Ok(())
            }
        }
    }

    /// Freeze the preview (the captured picture is on screen)
    pub fn stop_preview(&self) -> Result<(), CameraError> {
        let mut state = self.lock();
        match state.lifecycle {
            SessionLifecycle::Closed => Err(CameraError::NotOpen),
            SessionLifecycle::Open => Ok(()),
            SessionLifecycle::Previewing => {
                state.backend.stop_preview()?;
                state.lifecycle = SessionLifecycle::Open;
                debug!("Preview stopped");
                Ok(())
            }
        }
    }

    /// Mint a token for a new capture transaction
    pub fn new_token(&self) -> Result<CaptureToken, CameraError> {
        let state = self.lock();
        if !state.lifecycle.is_open() {
            return Err(CameraError::NotOpen);
        }
        Ok(CaptureToken::new(self.epoch()))
    }

    /// Request autofocus for `token`
    pub fn auto_focus(&self, token: CaptureToken, events: EventSender) -> Result<(), PhotoError> {
        let mut state = self.lock_live(&token)?;
        state.backend.auto_focus(token, events)?;
        Ok(())
    }

    /// Release the shutter for `token`
    pub fn take_picture(&self, token: CaptureToken, events: EventSender) -> Result<(), PhotoError> {
        let mut state = self.lock_live(&token)?;
        state.backend.take_picture(token, events)?;
        Ok(())
    }

    fn lock_live(&self, token: &CaptureToken) -> Result<MutexGuard<'_, SessionState>, PhotoError> {
        let state = self.lock();
        if !state.lifecycle.is_open() || !self.is_current(token) {
            debug!(
                token_epoch = token.epoch,
                epoch = self.epoch(),
                "Request for a released camera"
            );
            return Err(PhotoError::DeviceReleased);
        }
        Ok(state)
    }
}

impl Drop for SessionState {
    fn drop(&mut self) {
        if self.backend.is_open() {
            debug!("Releasing camera on drop");
            self.backend.release();
        }
    }
}

/// Apply a negotiated size, logging and skipping a rejection
fn apply_size(
    size: Resolution,
    apply: impl FnOnce(Resolution) -> BackendResult<()>,
    kind: &str,
) -> Option<Resolution> {
    match apply(size) {
        Ok(()) => {
            debug!(size = %size, kind, "Size applied");
            Some(size)
        }
        Err(BackendError::UnsupportedResolution(rejected)) => {
            warn!(
                width = rejected.width,
                height = rejected.height,
                kind,
                "Hardware rejected size, keeping previous"
            );
            None
        }
        Err(e) => {
            warn!(error = %e, size = %size, kind, "Failed to apply size, keeping previous");
            None
        }
    }
}
