// SPDX-License-Identifier: GPL-3.0-only

//! Storage utilities for saved photos

use crate::constants::file_naming::{PHOTO_EXTENSION, PHOTO_PREFIX, TIMESTAMP_FORMAT};
use chrono::{DateTime, Local};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Resolve the directory photos are saved to
///
/// `None` or an empty path selects the system pictures directory (falling
/// back to the home directory, then the working directory). Absolute paths
/// are used as given; relative paths are taken relative to the home
/// directory.
pub fn photo_directory(custom: Option<&Path>) -> PathBuf {
    match custom {
        Some(path) if !path.as_os_str().is_empty() => {
            if path.is_absolute() {
                path.to_path_buf()
            } else {
                home_or_current().join(path)
            }
        }
        _ => dirs::picture_dir().unwrap_or_else(home_or_current),
    }
}

fn home_or_current() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| PathBuf::from("."))
}

/// File name for a photo taken at `time`: `img_YYYYMMDDHHMMSS.jpg`
///
/// Two photos in the same second get the same name; the later one replaces
/// the earlier.
pub fn generate_file_name(time: &DateTime<Local>) -> String {
    format!(
        "{}{}.{}",
        PHOTO_PREFIX,
        time.format(TIMESTAMP_FORMAT),
        PHOTO_EXTENSION
    )
}

/// Full path for a photo taken now
pub fn new_photo_path(dir: &Path) -> PathBuf {
    dir.join(generate_file_name(&Local::now()))
}

/// Create `dir` (and parents) if missing
pub fn ensure_directory(dir: &Path) -> io::Result<()> {
    if !dir.is_dir() {
        debug!(path = %dir.display(), "Creating photo directory");
        std::fs::create_dir_all(dir)?;
    }
    Ok(())
}

/// Remove a previously saved photo
///
/// Returns whether a file was removed; a missing file is not an error.
pub async fn discard_photo(path: &Path) -> io::Result<bool> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            info!(path = %path.display(), "Discarded photo");
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "Photo already gone");
            Ok(false)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to discard photo");
            Err(e)
        }
    }
}
