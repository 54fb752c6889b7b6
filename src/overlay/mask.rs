// SPDX-License-Identifier: GPL-3.0-only

//! Mask geometry: the transparent capture window and its four shades
//!
//! The window is centered on the surface. When the surface orientation
//! (portrait vs landscape) disagrees with the configured mask, the mask's
//! width and height are swapped before anything is laid out. The configured
//! [`MaskSpec`] itself is never modified.

use crate::backends::camera::types::Resolution;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Configured window size in surface pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MaskSpec {
    pub width: u32,
    pub height: u32,
}

impl MaskSpec {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// No window configured
    pub fn is_empty(&self) -> bool {
        self.width == 0 && self.height == 0
    }

    fn swapped(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// Mask with width and height aligned to the surface orientation.
    ///
    /// Square surfaces keep the mask as configured.
    pub fn oriented_for(self, surface: SurfaceDims) -> Self {
        let portrait_mismatch = surface.is_portrait() && self.height < self.width;
        let landscape_mismatch = surface.is_landscape() && self.height > self.width;
        if portrait_mismatch || landscape_mismatch {
            self.swapped()
        } else {
            self
        }
    }
}

impl From<Resolution> for MaskSpec {
    fn from(res: Resolution) -> Self {
        Self::new(res.width, res.height)
    }
}

impl std::fmt::Display for MaskSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Current display surface size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SurfaceDims {
    pub width: u32,
    pub height: u32,
}

impl SurfaceDims {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_portrait(&self) -> bool {
        self.height > self.width
    }

    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(0, 0, self.width, self.height)
    }
}

impl From<Resolution> for SurfaceDims {
    fn from(res: Resolution) -> Self {
        Self::new(res.width, res.height)
    }
}

/// Axis-aligned rectangle, origin top-left
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        !self.is_empty()
            && !other.is_empty()
            && self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

impl std::fmt::Display for Rect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "({}, {}) {}x{}",
            self.x, self.y, self.width, self.height
        )
    }
}

/// Window plus the four shade rectangles surrounding it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskLayout {
    pub window: Rect,
    pub top: Rect,
    pub bottom: Rect,
    pub left: Rect,
    pub right: Rect,
}

impl MaskLayout {
    /// The shades in drawing order
    pub fn shades(&self) -> [Rect; 4] {
        [self.top, self.bottom, self.left, self.right]
    }
}

/// Derived geometry for one surface/mask pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskGeometry {
    pub surface: SurfaceDims,
    /// Mask after orientation reconciliation; this is the crop target
    pub window_size: MaskSpec,
    /// `None` when there is nothing to draw
    pub layout: Option<MaskLayout>,
}

impl MaskGeometry {
    /// Final pixel size the captured frame is cropped to
    pub fn crop_target(&self) -> MaskSpec {
        self.window_size
    }

    pub fn is_degenerate(&self) -> bool {
        self.layout.is_none()
    }
}

/// Compute the window and shades for `mask` on `surface`
///
/// Nothing is drawn when the mask is empty, when either configured
/// dimension equals the matching surface dimension, or when the
/// reconciled mask does not fit the surface.
///
/// Top and left shades are `floor(margin / 2)` thick; bottom and right take
/// the remainder, so window and shades tile the surface exactly.
pub fn compute_geometry(surface: SurfaceDims, mask: MaskSpec) -> MaskGeometry {
    let window_size = mask.oriented_for(surface);
    let degenerate = |reason: &str| {
        debug!(
            surface = format!("{}x{}", surface.width, surface.height),
            mask = %mask,
            reason,
            "Mask overlay skipped"
        );
        MaskGeometry {
            surface,
            window_size,
            layout: None,
        }
    };

    if mask.is_empty() {
        return degenerate("no mask configured");
    }

    if mask.width == surface.width || mask.height == surface.height {
        return degenerate("mask edge coincides with surface edge");
    }

    if window_size.width > surface.width || window_size.height > surface.height {
        warn!(
            surface = format!("{}x{}", surface.width, surface.height),
            mask = %window_size,
            "Mask larger than surface, overlay not drawn"
        );
        return MaskGeometry {
            surface,
            window_size,
            layout: None,
        };
    }

    let (sw, sh) = (surface.width, surface.height);
    let (mw, mh) = (window_size.width, window_size.height);
    let h = (sh - mh) / 2;
    let w = (sw - mw) / 2;

    let layout = MaskLayout {
        window: Rect::new(w, h, mw, mh),
        top: Rect::new(0, 0, sw, h),
        bottom: Rect::new(0, h + mh, sw, sh - h - mh),
        left: Rect::new(0, h, w, mh),
        right: Rect::new(w + mw, h, sw - w - mw, mh),
    };

    debug!(
        surface = format!("{}x{}", sw, sh),
        window = %layout.window,
        swapped = window_size != mask,
        "Mask geometry computed"
    );

    MaskGeometry {
        surface,
        window_size,
        layout: Some(layout),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Every surface pixel is covered by exactly one of the five rectangles
    fn assert_tiles(surface: SurfaceDims, layout: &MaskLayout) {
        let mut rects = vec![layout.window];
        rects.extend(layout.shades());

        let total: u64 = rects.iter().map(Rect::area).sum();
        assert_eq!(total, surface.bounds().area());

        for (i, a) in rects.iter().enumerate() {
            assert!(a.right() <= surface.width && a.bottom() <= surface.height);
            for b in &rects[i + 1..] {
                assert!(!a.intersects(b), "{} overlaps {}", a, b);
            }
        }
    }

    #[test]
    fn test_portrait_swap_scenario() {
        let geometry = compute_geometry(SurfaceDims::new(1080, 1920), MaskSpec::new(900, 600));
        assert_eq!(geometry.window_size, MaskSpec::new(600, 900));
        let layout = geometry.layout.unwrap();
        assert_eq!(layout.window, Rect::new(240, 510, 600, 900));
        assert_tiles(geometry.surface, &layout);
    }

    #[test]
    fn test_landscape_keeps_landscape_mask() {
        let geometry = compute_geometry(SurfaceDims::new(1920, 1080), MaskSpec::new(900, 600));
        assert_eq!(geometry.window_size, MaskSpec::new(900, 600));
        let layout = geometry.layout.unwrap();
        assert_eq!(layout.window, Rect::new(510, 240, 900, 600));
        assert_eq!(layout.top, Rect::new(0, 0, 1920, 240));
        assert_eq!(layout.bottom, Rect::new(0, 840, 1920, 240));
        assert_eq!(layout.left, Rect::new(0, 240, 510, 600));
        assert_eq!(layout.right, Rect::new(1410, 240, 510, 600));
    }

    #[test]
    fn test_landscape_swaps_portrait_mask() {
        let geometry = compute_geometry(SurfaceDims::new(1920, 1080), MaskSpec::new(600, 900));
        assert_eq!(geometry.window_size, MaskSpec::new(900, 600));
    }

    #[test]
    fn test_square_surface_never_swaps() {
        let geometry = compute_geometry(SurfaceDims::new(1000, 1000), MaskSpec::new(600, 300));
        assert_eq!(geometry.window_size, MaskSpec::new(600, 300));
        assert_tiles(geometry.surface, &geometry.layout.unwrap());
    }

    #[test]
    fn test_odd_margins_tile_exactly() {
        let surface = SurfaceDims::new(1081, 1917);
        let geometry = compute_geometry(surface, MaskSpec::new(900, 600));
        let layout = geometry.layout.unwrap();
        assert_eq!(layout.window, Rect::new(240, 508, 600, 900));
        assert_eq!(layout.bottom.height, 509);
        assert_eq!(layout.right.width, 241);
        assert_tiles(surface, &layout);
    }

    #[test]
    fn test_tiling_across_sizes() {
        for (sw, sh) in [(640, 480), (481, 641), (1001, 999), (2, 3)] {
            for (mw, mh) in [(1, 1), (100, 50), (51, 101), (300, 200)] {
                let surface = SurfaceDims::new(sw, sh);
                let geometry = compute_geometry(surface, MaskSpec::new(mw, mh));
                if let Some(layout) = geometry.layout {
                    assert_tiles(surface, &layout);
                }
            }
        }
    }

    #[test]
    fn test_empty_mask_renders_nothing() {
        let geometry = compute_geometry(SurfaceDims::new(1080, 1920), MaskSpec::new(0, 0));
        assert!(geometry.is_degenerate());
        assert!(geometry.crop_target().is_empty());
    }

    #[test]
    fn test_mask_matching_surface_edge_renders_nothing() {
        let surface = SurfaceDims::new(1080, 1920);
        assert!(compute_geometry(surface, MaskSpec::new(1080, 500)).is_degenerate());
        assert!(compute_geometry(surface, MaskSpec::new(500, 1920)).is_degenerate());
    }

    #[test]
    fn test_oversized_mask_renders_nothing() {
        let geometry = compute_geometry(SurfaceDims::new(800, 600), MaskSpec::new(1200, 700));
        assert!(geometry.is_degenerate());
        assert_eq!(geometry.crop_target(), MaskSpec::new(1200, 700));
    }

    #[test]
    fn test_orientation_swap_is_idempotent_under_double_rotation() {
        let mask = MaskSpec::new(900, 600);
        let portrait = SurfaceDims::new(1080, 1920);
        let landscape = SurfaceDims::new(1920, 1080);

        let first = mask.oriented_for(portrait);
        let rotated = first.oriented_for(landscape);
        let back = rotated.oriented_for(portrait);

        assert_eq!(rotated, mask);
        assert_eq!(back, first);
        assert_eq!(first.oriented_for(portrait), first);
    }
}
