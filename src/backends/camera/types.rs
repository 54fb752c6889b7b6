// SPDX-License-Identifier: GPL-3.0-only
// Shared types for camera backend abstraction

//! Shared types for camera backends

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// A camera-supported or requested size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Width divided by height
    pub fn aspect_ratio(&self) -> f64 {
        self.width as f64 / self.height as f64
    }

    /// Total pixel count
    pub fn pixels(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// True when taller than wide
    pub fn is_portrait(&self) -> bool {
        self.height > self.width
    }
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl std::str::FromStr for Resolution {
    type Err = String;

    /// Parse `WIDTHxHEIGHT` (also accepts `X` and `×` as separator)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (width, height) = s
            .split_once(['x', 'X', '×'])
            .ok_or_else(|| format!("Expected WIDTHxHEIGHT, got '{}'", s))?;

        let width = width
            .trim()
            .parse::<u32>()
            .map_err(|e| format!("Invalid width '{}': {}", width, e))?;
        let height = height
            .trim()
            .parse::<u32>()
            .map_err(|e| format!("Invalid height '{}': {}", height, e))?;

        Ok(Self { width, height })
    }
}

/// Encoding of the bytes delivered by the hardware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameEncoding {
    /// JPEG bytes (the usual hardware output)
    #[default]
    Jpeg,
    /// PNG bytes (lossless, used by file sources and tests)
    Png,
    /// Unknown, sniff the header
    Unknown,
}

impl FrameEncoding {
    /// Guess the encoding from a file extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "jpg" | "jpeg" => FrameEncoding::Jpeg,
            "png" => FrameEncoding::Png,
            _ => FrameEncoding::Unknown,
        }
    }

    /// Matching `image` crate format, if any
    pub fn image_format(&self) -> Option<image::ImageFormat> {
        match self {
            FrameEncoding::Jpeg => Some(image::ImageFormat::Jpeg),
            FrameEncoding::Png => Some(image::ImageFormat::Png),
            FrameEncoding::Unknown => None,
        }
    }
}

/// Raw encoded bytes from one shutter release.
///
/// Owned by the capture orchestrator for the duration of one transaction.
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    pub data: Arc<[u8]>,
    pub encoding: FrameEncoding,
    pub captured_at: Instant,
}

impl CapturedFrame {
    pub fn new(data: impl Into<Arc<[u8]>>, encoding: FrameEncoding) -> Self {
        Self {
            data: data.into(),
            encoding,
            captured_at: Instant::now(),
        }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Liveness token attached to every asynchronous hardware request.
///
/// `epoch` is the session epoch at the time of the request; any open or
/// release advances it, so events carrying an older epoch are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaptureToken {
    pub epoch: u64,
    pub transaction: Uuid,
}

impl CaptureToken {
    pub fn new(epoch: u64) -> Self {
        Self {
            epoch,
            transaction: Uuid::new_v4(),
        }
    }
}

/// Asynchronous hardware callback, delivered on a hardware-owned thread
#[derive(Debug)]
pub enum CameraEvent {
    /// Autofocus finished; failure is not fatal
    FocusResult { token: CaptureToken, success: bool },
    /// Shutter released, time for the audible/visual cue
    ShutterSignal { token: CaptureToken },
    /// Encoded frame is ready
    FrameReady {
        token: CaptureToken,
        frame: CapturedFrame,
    },
    /// Asynchronous failure
    Error {
        token: CaptureToken,
        error: BackendError,
    },
}

impl CameraEvent {
    pub fn token(&self) -> CaptureToken {
        match self {
            CameraEvent::FocusResult { token, .. }
            | CameraEvent::ShutterSignal { token }
            | CameraEvent::FrameReady { token, .. }
            | CameraEvent::Error { token, .. } => *token,
        }
    }

    /// Short name for logging
    pub fn kind(&self) -> &'static str {
        match self {
            CameraEvent::FocusResult { .. } => "focus",
            CameraEvent::ShutterSignal { .. } => "shutter",
            CameraEvent::FrameReady { .. } => "frame",
            CameraEvent::Error { .. } => "error",
        }
    }
}

/// Sending half of the hardware event channel
pub type EventSender = tokio::sync::mpsc::UnboundedSender<CameraEvent>;

/// Receiving half of the hardware event channel
pub type EventReceiver = tokio::sync::mpsc::UnboundedReceiver<CameraEvent>;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Error types for backend operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Operation needs an open device
    NotOpen,
    /// Device could not be opened
    DeviceUnavailable(String),
    /// Access to the camera was refused
    PermissionDenied,
    /// The hardware rejected a preview or picture size
    UnsupportedResolution(Resolution),
    /// Focus or shutter failed on the hardware side
    CaptureFailed(String),
    /// General I/O error
    Io(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendError::NotOpen => write!(f, "Camera is not open"),
            BackendError::DeviceUnavailable(msg) => write!(f, "Camera unavailable: {}", msg),
            BackendError::PermissionDenied => write!(f, "Camera permission denied"),
            BackendError::UnsupportedResolution(res) => {
                write!(f, "Unsupported resolution: {} × {}", res.width, res.height)
            }
            BackendError::CaptureFailed(msg) => write!(f, "Capture failed: {}", msg),
            BackendError::Io(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolution_parse() {
        assert_eq!("1280x720".parse::<Resolution>(), Ok(Resolution::new(1280, 720)));
        assert_eq!(" 900X600 ".parse::<Resolution>(), Ok(Resolution::new(900, 600)));
        assert_eq!("640×480".parse::<Resolution>(), Ok(Resolution::new(640, 480)));
        assert!("1280".parse::<Resolution>().is_err());
        assert!("axb".parse::<Resolution>().is_err());
    }

    #[test]
    fn test_resolution_display_round_trips() {
        let res = Resolution::new(1920, 1080);
        assert_eq!(res.to_string().parse::<Resolution>(), Ok(res));
    }

    #[test]
    fn test_frame_encoding_from_extension() {
        assert_eq!(FrameEncoding::from_extension("JPEG"), FrameEncoding::Jpeg);
        assert_eq!(FrameEncoding::from_extension("png"), FrameEncoding::Png);
        assert_eq!(FrameEncoding::from_extension("bmp"), FrameEncoding::Unknown);
    }

    #[test]
    fn test_event_token() {
        let token = CaptureToken::new(3);
        let event = CameraEvent::ShutterSignal { token };
        assert_eq!(event.token(), token);
        assert_eq!(event.token().epoch, 3);
    }

    #[test]
    fn test_backend_error_display() {
        let err = BackendError::UnsupportedResolution(Resolution::new(640, 480));
        assert_eq!(err.to_string(), "Unsupported resolution: 640 × 480");
    }
}
