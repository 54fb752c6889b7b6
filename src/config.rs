// SPDX-License-Identifier: GPL-3.0-only

use crate::constants::file_naming::{APP_DIR_NAME, CONFIG_FILE_NAME};
use crate::constants::{
    DEFAULT_MASK_HEIGHT, DEFAULT_MASK_WIDTH, DEFAULT_PICTURE_QUALITY, MAX_PICTURE_QUALITY,
};
use crate::errors::ConfigError;
use crate::flash::FlashMode;
use crate::overlay::MaskSpec;
use crate::storage;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Persisted user settings
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JPEG quality hint handed to the hardware (0-100)
    pub picture_quality: u8,
    /// Flash mode handed to the hardware
    pub flash_mode: FlashMode,
    /// Where photos are saved; `None` means the system pictures directory
    pub save_directory: Option<PathBuf>,
    /// Capture window width in surface pixels
    pub mask_width: u32,
    /// Capture window height in surface pixels
    pub mask_height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            picture_quality: DEFAULT_PICTURE_QUALITY,
            flash_mode: FlashMode::default(), // Off
            save_directory: None,
            mask_width: DEFAULT_MASK_WIDTH,
            mask_height: DEFAULT_MASK_HEIGHT,
        }
    }
}

impl Config {
    /// Default location: `<config_dir>/cropcam/config.json`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Load from `path`; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => {
                return Err(ConfigError::Io {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                });
            }
        };

        let mut config: Self = serde_json::from_str(&text).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        if config.picture_quality > MAX_PICTURE_QUALITY {
            warn!(
                quality = config.picture_quality,
                "Picture quality above {}, clamping", MAX_PICTURE_QUALITY
            );
            config.picture_quality = MAX_PICTURE_QUALITY;
        }
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Load from the default location, falling back to defaults when the
    /// platform has no config directory
    pub fn load_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) => Self::load(&path),
            None => {
                warn!("No config directory on this platform, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Write as pretty JSON, creating the parent directory
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let io_error = |e: std::io::Error| ConfigError::Io {
            path: path.to_path_buf(),
            message: e.to_string(),
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        let text = serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, text).map_err(io_error)?;

        info!(path = %path.display(), "Saved config");
        Ok(())
    }

    /// Quality clamped to the valid range
    pub fn effective_quality(&self) -> u8 {
        self.picture_quality.min(MAX_PICTURE_QUALITY)
    }

    pub fn mask(&self) -> MaskSpec {
        MaskSpec::new(self.mask_width, self.mask_height)
    }
}

/// Settings fixed for the lifetime of one camera session
///
/// Derived from [`Config`] when the session is created. Changing settings
/// means building a new session with a new `SessionConfig`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub picture_quality: u8,
    pub flash_mode: FlashMode,
    /// Resolved, absolute save directory
    pub save_directory: PathBuf,
    pub mask: MaskSpec,
}

impl SessionConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            picture_quality: config.effective_quality(),
            flash_mode: config.flash_mode,
            save_directory: storage::photo_directory(config.save_directory.as_deref()),
            mask: config.mask(),
        }
    }

    pub fn with_save_directory(mut self, dir: PathBuf) -> Self {
        self.save_directory = dir;
        self
    }

    pub fn with_mask(mut self, mask: MaskSpec) -> Self {
        self.mask = mask;
        self
    }

    pub fn with_picture_quality(mut self, quality: u8) -> Self {
        self.picture_quality = quality.min(MAX_PICTURE_QUALITY);
        self
    }

    pub fn with_flash_mode(mut self, mode: FlashMode) -> Self {
        self.flash_mode = mode;
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl From<&Config> for SessionConfig {
    fn from(config: &Config) -> Self {
        Self::from_config(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_fills_defaults() {
        let config: Config = serde_json::from_str(r#"{"flash_mode":"auto"}"#).unwrap();
        assert_eq!(config.flash_mode, FlashMode::Auto);
        assert_eq!(config.picture_quality, 60);
        assert_eq!(config.mask(), MaskSpec::new(900, 600));
    }

    #[test]
    fn test_quality_is_clamped() {
        let config = Config {
            picture_quality: 250,
            ..Config::default()
        };
        assert_eq!(config.effective_quality(), 100);
        assert_eq!(SessionConfig::from_config(&config).picture_quality, 100);
        assert_eq!(
            SessionConfig::default().with_picture_quality(101).picture_quality,
            100
        );
    }

    #[test]
    fn test_session_config_resolves_absolute_directory() {
        let dir = std::env::temp_dir().join("cropcam-session");
        let config = Config {
            save_directory: Some(dir.clone()),
            ..Config::default()
        };
        assert_eq!(SessionConfig::from(&config).save_directory, dir);
    }
}
