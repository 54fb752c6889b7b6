// SPDX-License-Identifier: GPL-3.0-only

//! Async photo encoding pipeline
//!
//! The cropped picture is always re-encoded as JPEG at
//! [`PERSIST_JPEG_QUALITY`], whatever quality hint the hardware was given.
//! Encoding and disk writes run on the blocking pool.

use super::processing::CropResult;
use crate::constants::PERSIST_JPEG_QUALITY;
use crate::errors::PhotoError;
use crate::storage;
use image::RgbImage;
use std::path::PathBuf;
use tracing::{debug, info};

/// Encoded image data ready for saving
pub struct EncodedImage {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// JPEG photo encoder
pub struct PhotoEncoder {
    quality: u8,
}

impl PhotoEncoder {
    /// Encoder at full quality
    pub fn new() -> Self {
        Self {
            quality: PERSIST_JPEG_QUALITY,
        }
    }

    pub fn quality(&self) -> u8 {
        self.quality
    }

    /// Encode a cropped image asynchronously
    pub async fn encode(&self, cropped: CropResult) -> Result<EncodedImage, PhotoError> {
        info!(
            width = cropped.width,
            height = cropped.height,
            quality = self.quality,
            "Starting encoding"
        );

        let quality = self.quality;
        tokio::task::spawn_blocking(move || {
            let data = Self::encode_jpeg(&cropped.image, quality)?;
            debug!(size = data.len(), "Encoding complete");

            Ok(EncodedImage {
                data,
                width: cropped.width,
                height: cropped.height,
            })
        })
        .await
        .map_err(|e| PhotoError::EncodingFailed(format!("Encoding task error: {}", e)))?
    }

    /// Save encoded image to disk asynchronously
    ///
    /// Creates `output_dir` when missing and names the file after the
    /// current local time.
    pub async fn save(
        &self,
        encoded: EncodedImage,
        output_dir: PathBuf,
    ) -> Result<PathBuf, PhotoError> {
        let filepath = storage::new_photo_path(&output_dir);
        info!(path = %filepath.display(), "Saving photo");

        let filepath_clone = filepath.clone();
        tokio::task::spawn_blocking(move || {
            storage::ensure_directory(&output_dir)
                .and_then(|()| std::fs::write(&filepath_clone, &encoded.data))
                .map_err(|e| {
                    PhotoError::SaveFailed(format!(
                        "Failed to save {}: {}",
                        filepath_clone.display(),
                        e
                    ))
                })
        })
        .await
        .map_err(|e| PhotoError::SaveFailed(format!("Save task error: {}", e)))??;

        info!(path = %filepath.display(), "Photo saved successfully");
        Ok(filepath)
    }

    /// Encode image as JPEG
    fn encode_jpeg(image: &RgbImage, quality: u8) -> Result<Vec<u8>, PhotoError> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);

        let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, quality);

        encoder
            .encode(
                image.as_raw(),
                image.width(),
                image.height(),
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| PhotoError::EncodingFailed(format!("JPEG encoding failed: {}", e)))?;

        Ok(buffer)
    }
}

impl Default for PhotoEncoder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GenericImageView, Rgb};

    fn cropped(width: u32, height: u32) -> CropResult {
        CropResult {
            image: RgbImage::from_pixel(width, height, Rgb([200, 40, 40])),
            width,
            height,
        }
    }

    #[test]
    fn test_encoder_uses_full_quality() {
        assert_eq!(PhotoEncoder::new().quality(), 100);
    }

    #[tokio::test]
    async fn test_encode_produces_jpeg() {
        let encoded = PhotoEncoder::new().encode(cropped(32, 16)).await.unwrap();
        assert_eq!(&encoded.data[..2], &[0xFF, 0xD8]);

        let decoded = image::load_from_memory(&encoded.data).unwrap();
        assert_eq!(decoded.dimensions(), (32, 16));
    }

    #[tokio::test]
    async fn test_save_creates_directory_and_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("photos");
        let encoder = PhotoEncoder::new();

        let encoded = encoder.encode(cropped(8, 8)).await.unwrap();
        let path = encoder.save(encoded, target.clone()).await.unwrap();

        assert!(path.starts_with(&target));
        assert!(path.is_file());
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("img_"));
        assert!(name.ends_with(".jpg"));
        assert_eq!(name.len(), "img_".len() + 14 + ".jpg".len());
    }

    #[tokio::test]
    async fn test_save_into_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"x").unwrap();

        let encoder = PhotoEncoder::new();
        let encoded = encoder.encode(cropped(4, 4)).await.unwrap();
        let err = encoder.save(encoded, blocker).await.unwrap_err();
        assert!(matches!(err, PhotoError::SaveFailed(_)));
    }
}
