//! PNG snapshots of a projected frame.
//!
//! Feature-gated behind `png` (default on) so consumers that only need the
//! RGBA buffer from [`crate::pixel`] do not pull in the `image` crate.

use starfield_core::color::Srgb;
use starfield_core::error::StarFieldError;
use starfield_core::field::Surface;
use starfield_core::project::VisualAttributes;
use std::path::Path;

use crate::pixel::frame_to_rgba;

/// Rasterizes `frame` on a canvas the size of `surface` (rounded to whole
/// pixels) and writes it as a PNG.
///
/// Returns `StarFieldError::InvalidDimensions` if the rounded size is zero or
/// overflows `u32`, or `StarFieldError::Io` on write failure.
pub fn write_png(
    frame: &[VisualAttributes],
    surface: Surface,
    background: Srgb,
    path: &Path,
) -> Result<(), StarFieldError> {
    let w = u32::try_from(surface.width.round() as u64)
        .map_err(|_| StarFieldError::InvalidDimensions)?;
    let h = u32::try_from(surface.height.round() as u64)
        .map_err(|_| StarFieldError::InvalidDimensions)?;
    if w == 0 || h == 0 {
        return Err(StarFieldError::InvalidDimensions);
    }
    let rgba = frame_to_rgba(frame, w as usize, h as usize, background);
    let img = image::RgbaImage::from_raw(w, h, rgba)
        .ok_or_else(|| StarFieldError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| StarFieldError::Io(e.to_string()))
}
