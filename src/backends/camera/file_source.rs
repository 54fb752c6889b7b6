// SPDX-License-Identifier: GPL-3.0-only

//! File-backed virtual camera
//!
//! Serves a still image (a file on disk or bytes in memory) as if it were a
//! camera. Focus and shutter answer from a spawned thread after a short
//! latency, like real hardware callbacks. Faults can be injected for
//! exercising the error paths.

use super::CameraBackend;
use super::types::*;
use crate::constants::{file_formats, virtual_camera as vc_timing};
use crate::flash::FlashMode;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Sizes advertised when none are configured
const DEFAULT_SIZES: [Resolution; 3] = [
    Resolution::new(640, 480),
    Resolution::new(1280, 720),
    Resolution::new(1920, 1080),
];

/// Where the served frame comes from
#[derive(Debug, Clone)]
enum FrameSource {
    Path(PathBuf),
    Bytes(Arc<[u8]>, FrameEncoding),
}

/// Injectable failures
#[derive(Debug, Clone, Default)]
pub struct FileSourceFaults {
    /// `open` fails with this error
    pub refuse_open: Option<BackendError>,
    /// Every preview/picture size is rejected
    pub reject_sizes: bool,
    /// Autofocus reports failure (non-fatal)
    pub fail_focus: bool,
    /// The shutter answers with an error instead of a frame
    pub fail_frame: bool,
    /// The shutter fires but the frame never arrives
    pub stall_frame: bool,
    /// Errors tagged for another transaction and an older epoch are sent
    /// ahead of the shutter
    pub stray_events: bool,
}

/// Virtual camera serving a still image
pub struct FileSourceBackend {
    source: FrameSource,
    name: String,
    preview_sizes: Vec<Resolution>,
    picture_sizes: Vec<Resolution>,
    faults: FileSourceFaults,
    open: bool,
    previewing: bool,
    orientation: u32,
    preview_size: Option<Resolution>,
    picture_size: Option<Resolution>,
    jpeg_quality: u8,
    flash_mode: FlashMode,
}

impl FileSourceBackend {
    /// Serve the image at `path`; the extension selects the decoder
    pub fn from_path(path: impl Into<PathBuf>) -> BackendResult<Self> {
        let path = path.into();
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();

        if !file_formats::is_image_extension(&extension) {
            return Err(BackendError::Io(format!(
                "Unsupported file format: {}",
                extension
            )));
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "file".to_string());
        Ok(Self::with_source(FrameSource::Path(path), name))
    }

    /// Serve in-memory encoded bytes
    pub fn from_bytes(data: impl Into<Arc<[u8]>>, encoding: FrameEncoding) -> Self {
        Self::with_source(
            FrameSource::Bytes(data.into(), encoding),
            "memory".to_string(),
        )
    }

    fn with_source(source: FrameSource, name: String) -> Self {
        Self {
            source,
            name: format!("Virtual camera ({})", name),
            preview_sizes: DEFAULT_SIZES.to_vec(),
            picture_sizes: DEFAULT_SIZES.to_vec(),
            faults: FileSourceFaults::default(),
            open: false,
            previewing: false,
            orientation: 0,
            preview_size: None,
            picture_size: None,
            jpeg_quality: 100,
            flash_mode: FlashMode::default(),
        }
    }

    /// Advertise `sizes` for both preview and picture
    pub fn with_sizes(mut self, sizes: Vec<Resolution>) -> Self {
        self.preview_sizes = sizes.clone();
        self.picture_sizes = sizes;
        self
    }

    pub fn with_picture_sizes(mut self, sizes: Vec<Resolution>) -> Self {
        self.picture_sizes = sizes;
        self
    }

    pub fn with_faults(mut self, faults: FileSourceFaults) -> Self {
        self.faults = faults;
        self
    }

    pub fn orientation(&self) -> u32 {
        self.orientation
    }

    pub fn preview_size(&self) -> Option<Resolution> {
        self.preview_size
    }

    pub fn picture_size(&self) -> Option<Resolution> {
        self.picture_size
    }

    pub fn jpeg_quality(&self) -> u8 {
        self.jpeg_quality
    }

    pub fn flash_mode(&self) -> FlashMode {
        self.flash_mode
    }

    pub fn is_previewing(&self) -> bool {
        self.previewing
    }

    fn ensure_open(&self) -> BackendResult<()> {
        if self.open {
            Ok(())
        } else {
            Err(BackendError::NotOpen)
        }
    }

    fn check_size(&self, size: Resolution, offered: &[Resolution]) -> BackendResult<()> {
        self.ensure_open()?;
        if self.faults.reject_sizes || !offered.contains(&size) {
            return Err(BackendError::UnsupportedResolution(size));
        }
        Ok(())
    }
}

/// Read the served frame
fn load_frame(source: &FrameSource) -> BackendResult<CapturedFrame> {
    match source {
        FrameSource::Bytes(data, encoding) => Ok(CapturedFrame::new(data.clone(), *encoding)),
        FrameSource::Path(path) => {
            let data = std::fs::read(path)?;
            let encoding = encoding_for(path);
            debug!(path = %path.display(), bytes = data.len(), "Loaded frame from file");
            Ok(CapturedFrame::new(data, encoding))
        }
    }
}

/// Tokens a late callback might carry: another transaction in the same
/// epoch, and this transaction from before the last reopen
fn stray_tokens(token: CaptureToken) -> [CaptureToken; 2] {
    [
        CaptureToken::new(token.epoch),
        CaptureToken {
            epoch: token.epoch.wrapping_sub(1),
            ..token
        },
    ]
}

fn encoding_for(path: &Path) -> FrameEncoding {
    path.extension()
        .and_then(|e| e.to_str())
        .map(FrameEncoding::from_extension)
        .unwrap_or(FrameEncoding::Unknown)
}

impl CameraBackend for FileSourceBackend {
    fn open(&mut self) -> BackendResult<()> {
        if let Some(err) = &self.faults.refuse_open {
            return Err(err.clone());
        }
        if let FrameSource::Path(path) = &self.source
            && !path.is_file()
        {
            return Err(BackendError::DeviceUnavailable(format!(
                "{} does not exist",
                path.display()
            )));
        }

        info!(name = %self.name, "Virtual camera opened");
        self.open = true;
        Ok(())
    }

    fn release(&mut self) {
        if self.open {
            debug!(name = %self.name, "Virtual camera released");
        }
        self.open = false;
        self.previewing = false;
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn supported_preview_sizes(&self) -> BackendResult<Vec<Resolution>> {
        self.ensure_open()?;
        Ok(self.preview_sizes.clone())
    }

    fn supported_picture_sizes(&self) -> BackendResult<Vec<Resolution>> {
        self.ensure_open()?;
        Ok(self.picture_sizes.clone())
    }

    fn set_display_orientation(&mut self, degrees: u32) -> BackendResult<()> {
        self.ensure_open()?;
        self.orientation = degrees;
        Ok(())
    }

    fn set_preview_size(&mut self, size: Resolution) -> BackendResult<()> {
        self.check_size(size, &self.preview_sizes)?;
        self.preview_size = Some(size);
        Ok(())
    }

    fn set_picture_size(&mut self, size: Resolution) -> BackendResult<()> {
        self.check_size(size, &self.picture_sizes)?;
        self.picture_size = Some(size);
        Ok(())
    }

    fn set_jpeg_quality(&mut self, quality: u8) -> BackendResult<()> {
        self.ensure_open()?;
        self.jpeg_quality = quality;
        Ok(())
    }

    fn set_flash_mode(&mut self, mode: FlashMode) -> BackendResult<()> {
        self.ensure_open()?;
        self.flash_mode = mode;
        Ok(())
    }

    fn start_preview(&mut self) -> BackendResult<()> {
        self.ensure_open()?;
        self.previewing = true;
        Ok(())
    }

    fn stop_preview(&mut self) -> BackendResult<()> {
        self.ensure_open()?;
        self.previewing = false;
        Ok(())
    }

    fn auto_focus(&mut self, token: CaptureToken, events: EventSender) -> BackendResult<()> {
        self.ensure_open()?;
        let success = !self.faults.fail_focus;

        std::thread::spawn(move || {
            std::thread::sleep(vc_timing::FOCUS_LATENCY);
            if events
                .send(CameraEvent::FocusResult { token, success })
                .is_err()
            {
                debug!("Focus result receiver gone");
            }
        });
        Ok(())
    }

    fn take_picture(&mut self, token: CaptureToken, events: EventSender) -> BackendResult<()> {
        self.ensure_open()?;
        let source = self.source.clone();
        let faults = self.faults.clone();

        std::thread::spawn(move || {
            if faults.stray_events {
                for stray in stray_tokens(token) {
                    let error = BackendError::CaptureFailed("Stray callback".into());
                    if events.send(CameraEvent::Error { token: stray, error }).is_err() {
                        return;
                    }
                }
            }
            if events.send(CameraEvent::ShutterSignal { token }).is_err() {
                debug!("Shutter receiver gone");
                return;
            }
            std::thread::sleep(vc_timing::EXPOSURE_LATENCY);

            if faults.stall_frame {
                warn!("Virtual camera stalled, frame withheld");
                while !events.is_closed() {
                    std::thread::sleep(vc_timing::EXPOSURE_LATENCY);
                }
                return;
            }

            let event = if faults.fail_frame {
                CameraEvent::Error {
                    token,
                    error: BackendError::CaptureFailed("Injected frame failure".into()),
                }
            } else {
                match load_frame(&source) {
                    Ok(frame) => CameraEvent::FrameReady { token, frame },
                    Err(error) => CameraEvent::Error { token, error },
                }
            };

            if events.send(event).is_err() {
                debug!("Frame receiver gone");
            }
        });
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_path_rejects_unknown_extension() {
        assert!(FileSourceBackend::from_path("clip.mp4").is_err());
        assert!(FileSourceBackend::from_path("photo.JPG").is_ok());
    }

    #[test]
    fn test_stray_tokens_never_match() {
        let token = CaptureToken::new(3);
        let [foreign, stale] = stray_tokens(token);
        assert_eq!(foreign.epoch, 3);
        assert_ne!(foreign.transaction, token.transaction);
        assert_eq!(stale.transaction, token.transaction);
        assert_eq!(stale.epoch, 2);
    }

    #[test]
    fn test_open_missing_file_fails() {
        let mut backend = FileSourceBackend::from_path("/nonexistent/cropcam.png").unwrap();
        assert!(matches!(
            backend.open(),
            Err(BackendError::DeviceUnavailable(_))
        ));
        assert!(!backend.is_open());
    }

    #[test]
    fn test_operations_need_open_device() {
        let mut backend = FileSourceBackend::from_bytes(vec![1u8], FrameEncoding::Png);
        assert_eq!(backend.start_preview(), Err(BackendError::NotOpen));
        assert_eq!(
            backend.set_preview_size(Resolution::new(640, 480)),
            Err(BackendError::NotOpen)
        );
    }

    #[test]
    fn test_unlisted_size_is_rejected() {
        let mut backend = FileSourceBackend::from_bytes(vec![1u8], FrameEncoding::Png);
        backend.open().unwrap();
        assert_eq!(
            backend.set_picture_size(Resolution::new(123, 45)),
            Err(BackendError::UnsupportedResolution(Resolution::new(123, 45)))
        );
        backend.set_picture_size(Resolution::new(1280, 720)).unwrap();
        assert_eq!(backend.picture_size(), Some(Resolution::new(1280, 720)));
    }

    #[tokio::test]
    async fn test_events_arrive_in_order() {
        let mut backend = FileSourceBackend::from_bytes(vec![7u8, 8, 9], FrameEncoding::Jpeg);
        backend.open().unwrap();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();
        let token = CaptureToken::new(1);

        backend.auto_focus(token, tx.clone()).unwrap();
        assert!(matches!(
            rx.recv().await,
            Some(CameraEvent::FocusResult { success: true, .. })
        ));

        backend.take_picture(token, tx).unwrap();
        assert!(matches!(
            rx.recv().await,
            Some(CameraEvent::ShutterSignal { .. })
        ));
        match rx.recv().await {
            Some(CameraEvent::FrameReady { token: got, frame }) => {
                assert_eq!(got, token);
                assert_eq!(&*frame.data, &[7u8, 8, 9]);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_failed_frame_reports_error() {
        let mut backend = FileSourceBackend::from_bytes(vec![1u8], FrameEncoding::Png)
            .with_faults(FileSourceFaults {
                fail_frame: true,
                ..Default::default()
            });
        backend.open().unwrap();
        let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel();

        backend.take_picture(CaptureToken::new(1), tx).unwrap();
        assert!(matches!(
            rx.recv().await,
            Some(CameraEvent::ShutterSignal { .. })
        ));
        assert!(matches!(
            rx.recv().await,
            Some(CameraEvent::Error {
                error: BackendError::CaptureFailed(_),
                ..
            })
        ));
    }
}
