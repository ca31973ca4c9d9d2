//! Pure-computation rasterization of a projected frame into RGBA8.
//!
//! Always available (no feature gate) so the `png` snapshot path and any
//! in-memory consumer share the same conversion.

use starfield_core::color::Srgb;
use starfield_core::project::VisualAttributes;

/// Night sky behind the stars.
pub const DEFAULT_BACKGROUND: &str = "#0b0a1f";

/// Draws every particle as an alpha-blended disc over `background`.
///
/// A disc is centered at `(x + jitter_x, y + jitter_y)` with diameter
/// `size`. Edge pixels get partial coverage, so discs smaller than a pixel
/// still show up. The buffer length is `width * height * 4`; alpha is
/// always 255.
pub fn frame_to_rgba(
    frame: &[VisualAttributes],
    width: usize,
    height: usize,
    background: Srgb,
) -> Vec<u8> {
    let mut canvas = vec![background; width * height];
    for star in frame {
        draw_disc(&mut canvas, width, height, star);
    }
    canvas
        .iter()
        .flat_map(|c| {
            let [r, g, b] = c.to_rgb8();
            [r, g, b, 255u8]
        })
        .collect()
}

fn draw_disc(canvas: &mut [Srgb], width: usize, height: usize, star: &VisualAttributes) {
    let cx = star.x + star.jitter_x;
    let cy = star.y + star.jitter_y;
    let r = star.size / 2.0;
    if !(cx.is_finite() && cy.is_finite() && r > 0.0) || star.opacity <= 0.0 {
        return;
    }

    let x0 = (cx - r - 1.0).floor().max(0.0) as usize;
    let y0 = (cy - r - 1.0).floor().max(0.0) as usize;
    let x1 = ((cx + r + 1.0).ceil().max(0.0) as usize).min(width);
    let y1 = ((cy + r + 1.0).ceil().max(0.0) as usize).min(height);

    for py in y0..y1 {
        for px in x0..x1 {
            let dist = (px as f64 + 0.5 - cx).hypot(py as f64 + 0.5 - cy);
            let coverage = (r + 0.5 - dist).clamp(0.0, 1.0);
            if coverage == 0.0 {
                continue;
            }
            let alpha = (star.opacity * coverage).clamp(0.0, 1.0);
            let idx = py * width + px;
            canvas[idx] = canvas[idx].lerp(star.color, alpha);
        }
    }
}
