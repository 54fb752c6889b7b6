// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the capture application

use crate::backends::camera::types::{BackendError, Resolution};
use std::fmt;
use std::path::PathBuf;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Camera-related errors
    Camera(CameraError),
    /// Photo capture errors
    Photo(PhotoError),
    /// Configuration errors
    Config(ConfigError),
    /// Storage/filesystem errors
    Storage(String),
    /// Generic error with message
    Other(String),
}

/// Camera session errors.
///
/// Everything here is fatal for the session: the caller should release and
/// surface the failure to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraError {
    /// Device could not be opened
    DeviceUnavailable(String),
    /// Camera access refused
    PermissionDenied,
    /// The device reported no usable preview size
    NoSupportedResolution,
    /// Operation needs an open session
    NotOpen,
    /// Any other hardware failure during setup
    Backend(BackendError),
}

/// Photo capture errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhotoError {
    /// Crop window does not fit the oriented frame
    OutOfBounds {
        requested: Resolution,
        available: Resolution,
    },
    /// Captured bytes could not be decoded
    DecodeFailed(String),
    /// Encoding failed
    EncodingFailed(String),
    /// Save failed
    SaveFailed(String),
    /// Another capture is still running
    CaptureInProgress,
    /// Focus, shutter or hardware failure during the transaction
    CaptureFailed(String),
    /// The session was released or reopened mid-transaction
    DeviceReleased,
    /// The transaction took longer than the capture timeout
    Timeout,
    /// Session could not service the request
    Device(CameraError),
}

/// Configuration load/save errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Reading or writing the config file failed
    Io { path: PathBuf, message: String },
    /// The config file is not valid JSON for [`crate::config::Config`]
    Parse { path: PathBuf, message: String },
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Camera(e) => write!(f, "Camera error: {}", e),
            AppError::Photo(e) => write!(f, "Photo error: {}", e),
            AppError::Config(e) => write!(f, "Configuration error: {}", e),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::DeviceUnavailable(msg) => write!(f, "Camera unavailable: {}", msg),
            CameraError::PermissionDenied => write!(f, "Camera permission denied"),
            CameraError::NoSupportedResolution => {
                write!(f, "Camera reports no supported preview resolution")
            }
            CameraError::NotOpen => write!(f, "Camera is not open"),
            CameraError::Backend(e) => write!(f, "Backend error: {}", e),
        }
    }
}

impl fmt::Display for PhotoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhotoError::OutOfBounds {
                requested,
                available,
            } => write!(
                f,
                "Crop {} does not fit captured image {}",
                requested, available
            ),
            PhotoError::DecodeFailed(msg) => write!(f, "Decoding failed: {}", msg),
            PhotoError::EncodingFailed(msg) => write!(f, "Encoding failed: {}", msg),
            PhotoError::SaveFailed(msg) => write!(f, "Save failed: {}", msg),
            PhotoError::CaptureInProgress => write!(f, "A capture is already in progress"),
            PhotoError::CaptureFailed(msg) => write!(f, "Capture failed: {}", msg),
            PhotoError::DeviceReleased => write!(f, "Camera was released during capture"),
            PhotoError::Timeout => write!(f, "Capture timed out"),
            PhotoError::Device(e) => write!(f, "{}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io { path, message } => {
                write!(f, "Cannot access {}: {}", path.display(), message)
            }
            ConfigError::Parse { path, message } => {
                write!(f, "Invalid config {}: {}", path.display(), message)
            }
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for CameraError {}
impl std::error::Error for PhotoError {}
impl std::error::Error for ConfigError {}

// Conversions from sub-errors to AppError
impl From<CameraError> for AppError {
    fn from(err: CameraError) -> Self {
        AppError::Camera(err)
    }
}

impl From<PhotoError> for AppError {
    fn from(err: PhotoError) -> Self {
        AppError::Photo(err)
    }
}

impl From<ConfigError> for AppError {
    fn from(err: ConfigError) -> Self {
        AppError::Config(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<BackendError> for AppError {
    fn from(err: BackendError) -> Self {
        AppError::Camera(err.into())
    }
}

impl From<image::ImageError> for AppError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(e) => AppError::Storage(e.to_string()),
            other => AppError::Photo(other.into()),
        }
    }
}

impl From<BackendError> for CameraError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::NotOpen => CameraError::NotOpen,
            BackendError::DeviceUnavailable(msg) => CameraError::DeviceUnavailable(msg),
            BackendError::PermissionDenied => CameraError::PermissionDenied,
            other => CameraError::Backend(other),
        }
    }
}

impl From<CameraError> for PhotoError {
    fn from(err: CameraError) -> Self {
        PhotoError::Device(err)
    }
}

impl From<BackendError> for PhotoError {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::NotOpen => PhotoError::DeviceReleased,
            BackendError::CaptureFailed(msg) => PhotoError::CaptureFailed(msg),
            other => PhotoError::Device(other.into()),
        }
    }
}

impl From<std::io::Error> for PhotoError {
    fn from(err: std::io::Error) -> Self {
        PhotoError::SaveFailed(err.to_string())
    }
}

impl From<image::ImageError> for PhotoError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Decoding(e) => PhotoError::DecodeFailed(e.to_string()),
            image::ImageError::Encoding(e) => PhotoError::EncodingFailed(e.to_string()),
            image::ImageError::IoError(e) => PhotoError::SaveFailed(e.to_string()),
            other => PhotoError::EncodingFailed(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_error_maps_to_camera_error() {
        assert_eq!(
            CameraError::from(BackendError::PermissionDenied),
            CameraError::PermissionDenied
        );
        assert_eq!(CameraError::from(BackendError::NotOpen), CameraError::NotOpen);
        assert!(matches!(
            CameraError::from(BackendError::Io("x".into())),
            CameraError::Backend(_)
        ));
    }

    #[test]
    fn test_app_error_wraps_sources() {
        assert!(matches!(
            AppError::from(BackendError::PermissionDenied),
            AppError::Camera(CameraError::PermissionDenied)
        ));
        let missing = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert!(matches!(
            AppError::from(image::ImageError::IoError(missing)),
            AppError::Storage(_)
        ));
        assert!(matches!(
            AppError::from(PhotoError::Timeout),
            AppError::Photo(PhotoError::Timeout)
        ));
        assert_eq!(
            AppError::from("No supported sizes given").to_string(),
            "No supported sizes given"
        );
    }

    #[test]
    fn test_backend_error_maps_to_photo_error() {
        assert_eq!(
            PhotoError::from(BackendError::NotOpen),
            PhotoError::DeviceReleased
        );
        assert_eq!(
            PhotoError::from(BackendError::CaptureFailed("shutter".into())),
            PhotoError::CaptureFailed("shutter".into())
        );
    }

    #[test]
    fn test_out_of_bounds_display() {
        let err = PhotoError::OutOfBounds {
            requested: Resolution::new(900, 600),
            available: Resolution::new(800, 600),
        };
        assert_eq!(
            err.to_string(),
            "Crop 900x600 does not fit captured image 800x600"
        );
    }
}
