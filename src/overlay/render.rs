// SPDX-License-Identifier: GPL-3.0-only

//! Software shade renderer

use super::mask::{MaskGeometry, Rect};
use crate::constants::overlay::SHADE_ALPHA;
use image::{Rgba, RgbaImage};

/// Darken the shade rectangles of `geometry` on `image`
///
/// Black is composited at [`SHADE_ALPHA`] over each shade pixel; the window
/// stays untouched. Degenerate geometry draws nothing. Rectangles are
/// clipped to the image bounds.
pub fn render_shades(image: &mut RgbaImage, geometry: &MaskGeometry) {
    let Some(layout) = geometry.layout else {
        return;
    };

    for shade in layout.shades() {
        darken(image, shade);
    }
}

fn darken(image: &mut RgbaImage, rect: Rect) {
    let x_end = rect.right().min(image.width());
    let y_end = rect.bottom().min(image.height());
    let keep = 255 - SHADE_ALPHA as u16;

    for y in rect.y..y_end {
        for x in rect.x..x_end {
            let Rgba([r, g, b, a]) = *image.get_pixel(x, y);
            let shade = |c: u8| ((c as u16 * keep + 127) / 255) as u8;
            let alpha = a as u16 + (SHADE_ALPHA as u16 * (255 - a as u16) + 127) / 255;
            image.put_pixel(x, y, Rgba([shade(r), shade(g), shade(b), alpha as u8]));
        }
    }
}

/// Standalone overlay: transparent window, black shades at [`SHADE_ALPHA`]
pub fn overlay_image(geometry: &MaskGeometry) -> RgbaImage {
    let mut image = RgbaImage::new(geometry.surface.width, geometry.surface.height);
    render_shades(&mut image, geometry);
    image
}
