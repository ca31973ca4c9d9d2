#![deny(unsafe_code)]
//! CPU-side drawing surface for the star field: rasterizes a frame of
//! [`VisualAttributes`](starfield_core::VisualAttributes) into RGBA8 and writes
//! PNG snapshots.
//!
//! The CLI uses this crate as its drawing surface; the engine itself never
//! touches pixels.

pub mod pixel;

#[cfg(feature = "png")]
pub mod snapshot;

pub use pixel::{frame_to_rgba, DEFAULT_BACKGROUND};
