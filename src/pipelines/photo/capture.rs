// SPDX-License-Identifier: GPL-3.0-only

//! Capture orchestration
//!
//! One transaction runs autofocus → shutter → frame → crop → save against a
//! [`CameraSession`]. Hardware answers arrive as [`CameraEvent`]s on a
//! per-transaction channel; events whose token does not match the live
//! transaction are dropped. Releasing the session mid-transaction aborts
//! with [`PhotoError::DeviceReleased`].
//!
//! Only one transaction may be in flight. On failure the preview is
//! restored so the user can retry without reopening the device.

use super::PhotoPipeline;
use super::processing::PostProcessingConfig;
use crate::backends::camera::CameraSession;
use crate::backends::camera::types::{CameraEvent, CaptureToken, CapturedFrame, EventReceiver};
use crate::constants::CAPTURE_TIMEOUT;
use crate::errors::PhotoError;
use crate::overlay::{SurfaceDims, compute_geometry};
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

/// Where a capture transaction currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptureStage {
    Idle,
    Focusing,
    ShutterSignaled,
    FrameReceived,
    Cropping,
    Persisted,
    Failed,
}

impl CaptureStage {
    /// A transaction is in flight
    pub fn is_busy(self) -> bool {
        !matches!(
            self,
            CaptureStage::Idle | CaptureStage::Persisted | CaptureStage::Failed
        )
    }
}

/// Audible/visual cue when the shutter fires
pub trait ShutterFeedback: Send + Sync {
    fn on_shutter(&self);
}

/// Feedback that only logs
pub struct LogShutter;

impl ShutterFeedback for LogShutter {
    fn on_shutter(&self) {
        info!("Shutter");
    }
}

/// Resets the stage to `Failed` if a transaction is abandoned mid-way
struct StageGuard<'a> {
    stage: &'a Mutex<CaptureStage>,
}

impl Drop for StageGuard<'_> {
    fn drop(&mut self) {
        let mut stage = self.stage.lock().unwrap_or_else(PoisonError::into_inner);
        if stage.is_busy() {
            debug!(from = ?*stage, "Capture abandoned");
            *stage = CaptureStage::Failed;
        }
    }
}

/// Sequences one capture at a time
pub struct CaptureOrchestrator {
    session: CameraSession,
    pipeline: PhotoPipeline,
    feedback: Arc<dyn ShutterFeedback>,
    stage: Mutex<CaptureStage>,
    timeout: Duration,
}

impl CaptureOrchestrator {
    pub fn new(session: CameraSession) -> Self {
        Self {
            session,
            pipeline: PhotoPipeline::new(),
            feedback: Arc::new(LogShutter),
            stage: Mutex::new(CaptureStage::Idle),
            timeout: CAPTURE_TIMEOUT,
        }
    }

    pub fn with_feedback(mut self, feedback: Arc<dyn ShutterFeedback>) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn session(&self) -> &CameraSession {
        &self.session
    }

    pub fn stage(&self) -> CaptureStage {
        *self.stage.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_stage(&self, next: CaptureStage) {
        let mut stage = self.stage.lock().unwrap_or_else(PoisonError::into_inner);
        debug!(from = ?*stage, to = ?next, "Capture stage");
        *stage = next;
    }

    /// Claim the orchestrator for a new transaction
    fn begin(&self) -> Result<StageGuard<'_>, PhotoError> {
        let mut stage = self.stage.lock().unwrap_or_else(PoisonError::into_inner);
        if stage.is_busy() {
            warn!(stage = ?*stage, "Capture requested while another is running");
            return Err(PhotoError::CaptureInProgress);
        }
        debug!(from = ?*stage, to = ?CaptureStage::Focusing, "Capture stage");
        *stage = CaptureStage::Focusing;
        Ok(StageGuard { stage: &self.stage })
    }

    /// Run one capture transaction for the current preview surface
    ///
    /// Returns the saved photo's path.
    pub async fn capture(&self, surface: SurfaceDims) -> Result<PathBuf, PhotoError> {
        let _guard = self.begin()?;

        let result = self.run(surface).await;

        match &result {
            Ok(path) => {
                self.set_stage(CaptureStage::Persisted);
                info!(path = %path.display(), "Capture complete");
            }
            Err(e) => {
                self.set_stage(CaptureStage::Failed);
                error!(error = %e, "Capture failed");
                self.restore_preview();
            }
        }
        result
    }

    /// Callback form of [`capture`](Self::capture)
    ///
    /// `on_capture` runs exactly once with `(true, Some(path))` or
    /// `(false, None)`.
    pub async fn capture_with_callback<F>(&self, surface: SurfaceDims, on_capture: F)
    where
        F: FnOnce(bool, Option<PathBuf>),
    {
        match self.capture(surface).await {
            Ok(path) => on_capture(true, Some(path)),
            Err(_) => on_capture(false, None),
        }
    }

    async fn run(&self, surface: SurfaceDims) -> Result<PathBuf, PhotoError> {
        // Only waiting on the hardware is bounded; a save in flight runs to completion
        let frame = match tokio::time::timeout(self.timeout, self.acquire_frame()).await {
            Ok(frame) => frame?,
            Err(_) => return Err(PhotoError::Timeout),
        };
        self.set_stage(CaptureStage::FrameReceived);

        // Captured picture stays on screen
        if let Err(e) = self.session.stop_preview() {
            warn!(error = %e, "Failed to stop preview after capture");
        }

        self.set_stage(CaptureStage::Cropping);
        let config = self.session.config();
        let geometry = compute_geometry(surface, config.mask);
        let processing = PostProcessingConfig {
            surface_is_portrait: surface.is_portrait(),
            window: geometry.crop_target(),
        };

        self.pipeline
            .process_and_save(frame, processing, config.save_directory.clone())
            .await
    }

    /// Focus, fire the shutter and wait for the frame
    async fn acquire_frame(&self) -> Result<CapturedFrame, PhotoError> {
        let token = self.session.new_token()?;
        let mut epoch = self.session.subscribe_epoch();
        let (events_tx, mut events) = mpsc::unbounded_channel();

        debug!(transaction = %token.transaction, epoch = token.epoch, "Starting capture");

        self.session.auto_focus(token, events_tx.clone())?;
        loop {
            match self.next_event(&mut events, &mut epoch, &token).await? {
                CameraEvent::FocusResult { success: true, .. } => break,
                CameraEvent::FocusResult { success: false, .. } => {
                    warn!("Autofocus failed, capturing anyway");
                    break;
                }
                CameraEvent::Error { error, .. } => {
                    warn!(error = %error, "Autofocus error, capturing anyway");
                    break;
                }
                other => debug!(kind = other.kind(), "Ignoring event while focusing"),
            }
        }

        self.session.take_picture(token, events_tx)?;
        self.await_frame(&mut events, &mut epoch, &token).await
    }

    async fn await_frame(
        &self,
        events: &mut EventReceiver,
        epoch: &mut watch::Receiver<u64>,
        token: &CaptureToken,
    ) -> Result<CapturedFrame, PhotoError> {
        loop {
            match self.next_event(events, epoch, token).await? {
                CameraEvent::ShutterSignal { .. } => {
                    self.feedback.on_shutter();
                    self.set_stage(CaptureStage::ShutterSignaled);
                }
                CameraEvent::FrameReady { frame, .. } => {
                    debug!(bytes = frame.len(), "Frame received");
                    return Ok(frame);
                }
                CameraEvent::Error { error, .. } => return Err(error.into()),
                CameraEvent::FocusResult { .. } => debug!("Ignoring late focus result"),
            }
        }
    }

    /// Next event of this transaction, or `DeviceReleased` once the epoch moves
    async fn next_event(
        &self,
        events: &mut EventReceiver,
        epoch: &mut watch::Receiver<u64>,
        token: &CaptureToken,
    ) -> Result<CameraEvent, PhotoError> {
        loop {
            tokio::select! {
                biased;

                _ = epoch.changed() => {
                    info!("Camera released during capture");
                    return Err(PhotoError::DeviceReleased);
                }
                event = events.recv() => {
                    let Some(event) = event else {
                        return Err(PhotoError::CaptureFailed(
                            "Camera stopped responding".into(),
                        ));
                    };
                    let event_token = event.token();
                    if event_token.transaction != token.transaction
                        || !self.session.is_current(&event_token)
                    {
                        debug!(kind = event.kind(), epoch = event_token.epoch, "Dropping stale event");
                        continue;
                    }
                    return Ok(event);
                }
            }
        }
    }

    fn restore_preview(&self) {
        if !self.session.is_open() {
            debug!("Camera closed, not restoring preview");
            return;
        }
        match self.session.start_preview() {
            Ok(()) => debug!("Preview restored for retry"),
            Err(e) => warn!(error = %e, "Failed to restore preview"),
        }
    }
}
