// SPDX-License-Identifier: GPL-3.0-only

//! Flash mode preference
//!
//! The mode is only a hint handed to the hardware; firing the flash is the
//! device's job.

use serde::{Deserialize, Serialize};

/// Flash operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashMode {
    /// Hardware decides
    Auto,
    /// Flash fires on every capture
    On,
    /// Flash never fires
    #[default]
    Off,
}

impl FlashMode {
    /// All modes, in cycling order
    pub const ALL: [FlashMode; 3] = [FlashMode::Off, FlashMode::Auto, FlashMode::On];

    /// Cycle to the next mode: Off -> Auto -> On -> Off
    pub fn next(self) -> Self {
        match self {
            FlashMode::Off => FlashMode::Auto,
            FlashMode::Auto => FlashMode::On,
            FlashMode::On => FlashMode::Off,
        }
    }

    /// Value of the hardware flash-mode parameter
    pub fn parameter_value(self) -> &'static str {
        match self {
            FlashMode::Auto => "auto",
            FlashMode::On => "on",
            FlashMode::Off => "off",
        }
    }
}

impl std::fmt::Display for FlashMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.parameter_value())
    }
}

impl std::str::FromStr for FlashMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(FlashMode::Auto),
            "on" => Ok(FlashMode::On),
            "off" => Ok(FlashMode::Off),
            other => Err(format!("Unknown flash mode '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_cycles_through_all_modes() {
        let mut mode = FlashMode::default();
        for expected in FlashMode::ALL.iter().cycle().skip(1).take(6) {
            mode = mode.next();
            assert_eq!(mode, *expected);
        }
    }

    #[test]
    fn test_parse_and_display() {
        for mode in FlashMode::ALL {
            assert_eq!(mode.to_string().parse::<FlashMode>(), Ok(mode));
        }
        assert_eq!(" AUTO ".parse::<FlashMode>(), Ok(FlashMode::Auto));
        assert!("torch".parse::<FlashMode>().is_err());
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&FlashMode::Auto).unwrap();
        assert_eq!(json, "\"auto\"");
        let mode: FlashMode = serde_json::from_str("\"on\"").unwrap();
        assert_eq!(mode, FlashMode::On);
    }
}
