// SPDX-License-Identifier: GPL-3.0-only

//! Mask overlay drawn over the camera preview
//!
//! [`MaskOverlay`] holds the configured mask and recomputes the geometry on
//! every layout change of the preview surface.

pub mod mask;
pub mod render;

pub use mask::{MaskGeometry, MaskLayout, MaskSpec, Rect, SurfaceDims, compute_geometry};
pub use render::{overlay_image, render_shades};

use tracing::debug;

/// Layout tracker for the preview overlay
#[derive(Debug, Clone)]
pub struct MaskOverlay {
    mask: MaskSpec,
    geometry: Option<MaskGeometry>,
}

impl MaskOverlay {
    pub fn new(mask: MaskSpec) -> Self {
        Self {
            mask,
            geometry: None,
        }
    }

    /// Configured mask, never altered by layout
    pub fn mask(&self) -> MaskSpec {
        self.mask
    }

    /// Geometry from the most recent layout pass
    pub fn geometry(&self) -> Option<&MaskGeometry> {
        self.geometry.as_ref()
    }

    /// Recompute for a new surface size; returns the fresh geometry
    pub fn on_layout(&mut self, surface: SurfaceDims) -> &MaskGeometry {
        match &mut self.geometry {
            Some(current) if current.surface == surface => {
                debug!("Surface unchanged, keeping mask geometry");
            }
            slot => {
                *slot = Some(compute_geometry(surface, self.mask));
            }
        }
        self.geometry
            .as_ref()
            .expect("geometry set by the match above")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout_rotation_keeps_configured_mask() {
        let mut overlay = MaskOverlay::new(MaskSpec::new(900, 600));
        assert!(overlay.geometry().is_none());

        let portrait = *overlay.on_layout(SurfaceDims::new(1080, 1920));
        assert_eq!(portrait.window_size, MaskSpec::new(600, 900));

        let landscape = *overlay.on_layout(SurfaceDims::new(1920, 1080));
        assert_eq!(landscape.window_size, MaskSpec::new(900, 600));

        assert_eq!(overlay.mask(), MaskSpec::new(900, 600));
        assert_eq!(overlay.geometry(), Some(&landscape));
    }

    #[test]
    fn test_layout_same_surface_keeps_geometry() {
        let mut overlay = MaskOverlay::new(MaskSpec::new(30, 20));
        let surface = SurfaceDims::new(101, 57);

        let first = *overlay.on_layout(surface);
        let again = *overlay.on_layout(surface);
        assert_eq!(first, again);
        assert_eq!(first, compute_geometry(surface, MaskSpec::new(30, 20)));
    }
}
