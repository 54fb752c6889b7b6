// SPDX-License-Identifier: GPL-3.0-only

//! Preview and picture size selection
//!
//! Both selectors are pure and keep the device's own ordering as the
//! tie-breaker: the first size reaching the minimum wins.

use super::types::Resolution;
use crate::constants::ASPECT_TOLERANCE;
use tracing::{debug, info};

/// Select the preview size closest to a display target
///
/// First pass: sizes whose aspect ratio is within [`ASPECT_TOLERANCE`] of
/// `target_width / target_height`, minimising `|height - target_height|`.
/// Fallback: the same height metric over every size, ignoring ratio.
///
/// Returns `None` only when `supported` is empty.
pub fn select_preview_size(
    supported: &[Resolution],
    target_width: u32,
    target_height: u32,
) -> Option<Resolution> {
    if let [only] = supported {
        debug!(size = %only, "Single preview size offered, using it");
        return Some(*only);
    }

    let target_ratio = target_width as f64 / target_height as f64;

    let within_ratio = supported
        .iter()
        .filter(|size| (size.aspect_ratio() - target_ratio).abs() <= ASPECT_TOLERANCE);
    if let Some(size) = closest_height(within_ratio, target_height) {
        info!(
            size = %size,
            target = format!("{}x{}", target_width, target_height),
            "Selected preview size matching aspect ratio"
        );
        return Some(size);
    }

    let size = closest_height(supported.iter(), target_height)?;
    info!(
        size = %size,
        target = format!("{}x{}", target_width, target_height),
        "No preview size matches aspect ratio, selected closest height"
    );
    Some(size)
}

/// Select the picture size closest to the screen
///
/// Distance is `|width - screen_width| + |height - screen_height|`. The
/// aspect mismatch is left to the crop step.
///
/// Returns `None` only when `supported` is empty.
pub fn select_picture_size(
    supported: &[Resolution],
    screen_width: u32,
    screen_height: u32,
) -> Option<Resolution> {
    let mut best: Option<(Resolution, u64)> = None;

    for size in supported {
        let distance = size.width.abs_diff(screen_width) as u64
            + size.height.abs_diff(screen_height) as u64;
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((*size, distance)),
        }
    }

    let (size, distance) = best?;
    info!(
        size = %size,
        screen = format!("{}x{}", screen_width, screen_height),
        distance,
        "Selected picture size"
    );
    Some(size)
}

/// Linear scan minimising `|height - target|`, first minimum wins
fn closest_height<'a>(
    sizes: impl Iterator<Item = &'a Resolution>,
    target_height: u32,
) -> Option<Resolution> {
    let mut best: Option<(Resolution, u32)> = None;

    for size in sizes {
        let diff = size.height.abs_diff(target_height);
        match best {
            Some((_, best_diff)) if diff >= best_diff => {}
            _ => best = Some((*size, diff)),
        }
    }

    best.map(|(size, _)| size)
}
