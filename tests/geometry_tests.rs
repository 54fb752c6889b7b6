// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for mask geometry and overlay rendering

use cropcam::overlay::{MaskLayout, Rect, overlay_image};
use cropcam::{MaskOverlay, MaskSpec, SurfaceDims, compute_geometry};

/// Count how many of the five rectangles cover each pixel
fn coverage(surface: SurfaceDims, layout: &MaskLayout) -> Vec<u8> {
    let mut counts = vec![0u8; (surface.width * surface.height) as usize];
    let mut rects: Vec<Rect> = layout.shades().to_vec();
    rects.push(layout.window);

    for rect in rects {
        for y in rect.y..rect.bottom() {
            for x in rect.x..rect.right() {
                counts[(y * surface.width + x) as usize] += 1;
            }
        }
    }
    counts
}

#[test]
fn test_rectangles_tile_surface_exactly_once() {
    let cases = [
        ((1080, 1920), (900, 600)),
        ((1920, 1080), (900, 600)),
        ((101, 57), (30, 20)),
        ((64, 64), (10, 33)),
        ((33, 47), (32, 1)),
    ];

    for ((sw, sh), (mw, mh)) in cases {
        let surface = SurfaceDims::new(sw, sh);
        let geometry = compute_geometry(surface, MaskSpec::new(mw, mh));
        let layout = geometry
            .layout
            .unwrap_or_else(|| panic!("{}x{} / {}x{} should draw", sw, sh, mw, mh));

        assert!(
            coverage(surface, &layout).iter().all(|&c| c == 1),
            "{}x{} / {}x{} does not tile",
            sw,
            sh,
            mw,
            mh
        );
    }
}

#[test]
fn test_window_is_centered() {
    let geometry = compute_geometry(SurfaceDims::new(1080, 1920), MaskSpec::new(900, 600));
    let window = geometry.layout.unwrap().window;

    assert_eq!(window, Rect::new(240, 510, 600, 900));
    assert_eq!(window.x, 1080 - window.right());
    assert_eq!(window.y, 1920 - window.bottom());
}

#[test]
fn test_crop_target_follows_rotation() {
    let mut overlay = MaskOverlay::new(MaskSpec::new(900, 600));

    let portrait = overlay.on_layout(SurfaceDims::new(1080, 1920)).crop_target();
    let landscape = overlay.on_layout(SurfaceDims::new(1920, 1080)).crop_target();
    let back = overlay.on_layout(SurfaceDims::new(1080, 1920)).crop_target();

    assert_eq!(portrait, MaskSpec::new(600, 900));
    assert_eq!(landscape, MaskSpec::new(900, 600));
    assert_eq!(back, portrait);
}

#[test]
fn test_overlay_image_matches_layout() {
    let geometry = compute_geometry(SurfaceDims::new(30, 50), MaskSpec::new(20, 10));
    let layout = geometry.layout.unwrap();
    let image = overlay_image(&geometry);

    for (x, y, pixel) in image.enumerate_pixels() {
        let in_window = layout.window.contains(x, y);
        assert_eq!(pixel[3] == 0, in_window, "pixel ({}, {})", x, y);
    }
}
