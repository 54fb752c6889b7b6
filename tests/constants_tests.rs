// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for constants module

use cropcam::constants::{self, file_naming, orientation, overlay};
use std::time::Duration;

#[test]
fn test_quality_defaults() {
    assert_eq!(constants::DEFAULT_PICTURE_QUALITY, 60);
    assert!(constants::DEFAULT_PICTURE_QUALITY <= constants::MAX_PICTURE_QUALITY);
    assert_eq!(constants::PERSIST_JPEG_QUALITY, 100);
}

#[test]
fn test_orientation_values() {
    // Quarter turn for portrait, none for landscape
    assert_eq!(orientation::LANDSCAPE_DEGREES, 0);
    assert_eq!(orientation::PORTRAIT_DEGREES, 90);
}

#[test]
fn test_aspect_tolerance() {
    assert!((constants::ASPECT_TOLERANCE - 0.05).abs() < f64::EPSILON);
}

#[test]
fn test_capture_timeout() {
    assert_eq!(constants::CAPTURE_TIMEOUT, Duration::from_secs(10));
}

#[test]
fn test_shade_is_translucent() {
    assert!(overlay::SHADE_ALPHA > 0);
    assert!(overlay::SHADE_ALPHA < u8::MAX);
}

#[test]
fn test_file_naming_pattern() {
    assert_eq!(file_naming::PHOTO_PREFIX, "img_");
    assert_eq!(file_naming::PHOTO_EXTENSION, "jpg");
    // 24-hour clock, seconds resolution
    assert_eq!(file_naming::TIMESTAMP_FORMAT, "%Y%m%d%H%M%S");
}
