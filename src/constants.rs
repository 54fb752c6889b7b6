// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Absolute tolerance when matching a preview size's aspect ratio against the target
pub const ASPECT_TOLERANCE: f64 = 0.05;

/// Default hardware JPEG quality hint (0-100)
pub const DEFAULT_PICTURE_QUALITY: u8 = 60;

/// Highest accepted picture quality
pub const MAX_PICTURE_QUALITY: u8 = 100;

/// Quality used when re-encoding the cropped photo.
///
/// Independent of the configured picture quality, which only reaches the hardware.
pub const PERSIST_JPEG_QUALITY: u8 = 100;

/// Default mask (transparent window) size in surface pixels
pub const DEFAULT_MASK_WIDTH: u32 = 900;
pub const DEFAULT_MASK_HEIGHT: u32 = 600;

/// Upper bound for one capture transaction (focus, shutter, frame, crop, save)
pub const CAPTURE_TIMEOUT: Duration = Duration::from_secs(10);

/// Display orientation handed to the hardware
pub mod orientation {
    /// Landscape surface: sensor frames are already upright
    pub const LANDSCAPE_DEGREES: u32 = 0;

    /// Portrait surface: preview must be turned a quarter clockwise
    pub const PORTRAIT_DEGREES: u32 = 90;
}

/// Overlay drawing constants
pub mod overlay {
    /// Opacity of the black shade around the window (0 = transparent, 255 = opaque)
    pub const SHADE_ALPHA: u8 = 170;
}

/// Photo file naming
pub mod file_naming {
    /// Prefix of every saved photo
    pub const PHOTO_PREFIX: &str = "img_";

    /// chrono format of the timestamp part (seconds resolution)
    pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

    /// Extension of saved photos
    pub const PHOTO_EXTENSION: &str = "jpg";

    /// Directory name used under the platform config directory
    pub const APP_DIR_NAME: &str = "cropcam";

    /// Config file name inside [`APP_DIR_NAME`]
    pub const CONFIG_FILE_NAME: &str = "config.json";
}

/// File-backed virtual camera timing
pub mod virtual_camera {
    use super::Duration;

    /// Simulated autofocus time
    pub const FOCUS_LATENCY: Duration = Duration::from_millis(20);

    /// Delay between the shutter cue and the frame arriving
    pub const EXPOSURE_LATENCY: Duration = Duration::from_millis(10);
}

/// Supported file formats for the file-backed camera
pub mod file_formats {
    /// Image file extensions the file-backed camera can serve
    pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "webp"];

    /// Check if a file extension is a supported image format
    pub fn is_image_extension(ext: &str) -> bool {
        IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
    }
}
