//! Ripple engine: the single propagating wave and the short-lived highlight
//! set.
//!
//! This is the only owner of shared mutable animation state. A retrigger
//! always overwrites: a new ripple discards the one in flight and a new
//! twinkle replaces the current highlight window. Nothing is queued.

use crate::config::StarFieldParams;
use crate::error::StarFieldError;
use crate::field::{Point, StarField, Surface};
use crate::prng::Xorshift64;
use log::debug;
use serde::Serialize;
use std::collections::BTreeSet;

/// Highlight burst size used when a caller does not pick one.
pub const DEFAULT_TWINKLE_COUNT: usize = 3;

/// Where a ripple started.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RippleOrigin {
    /// The surface center, resolved against the current surface size.
    Center,
    /// A point in surface pixels. May lie outside the surface.
    At { x: f64, y: f64 },
}

impl RippleOrigin {
    /// Validates a caller-supplied origin; `None` means the center.
    ///
    /// Returns `StarFieldError::InvalidTrigger` for a non-finite point.
    pub fn from_point(origin: Option<Point>) -> Result<Self, StarFieldError> {
        match origin {
            None => Ok(RippleOrigin::Center),
            Some(p) if p.is_finite() => Ok(RippleOrigin::At { x: p.x, y: p.y }),
            Some(p) => Err(StarFieldError::InvalidTrigger(format!(
                "ripple origin must be finite, got ({}, {})",
                p.x, p.y
            ))),
        }
    }

    pub fn resolve(self, surface: Surface) -> Point {
        match self {
            RippleOrigin::Center => surface.center(),
            RippleOrigin::At { x, y } => Point::new(x, y),
        }
    }
}

/// The wave, if any. At most one exists at a time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RippleState {
    pub origin: RippleOrigin,
    /// Fraction of the surface diagonal travelled, in [0, 1].
    pub progress: f64,
    pub active: bool,
    #[serde(skip)]
    elapsed_ms: f64,
}

impl RippleState {
    /// A finished wave at the center; what the engine holds before the first
    /// trigger.
    pub fn idle() -> Self {
        Self {
            origin: RippleOrigin::Center,
            progress: 0.0,
            active: false,
            elapsed_ms: 0.0,
        }
    }

    /// A wave that has travelled `progress` of the way. Used by callers that
    /// project a single instant without running the engine.
    pub fn at_progress(origin: RippleOrigin, progress: f64) -> Self {
        Self {
            origin,
            progress: progress.clamp(0.0, 1.0),
            active: true,
            elapsed_ms: 0.0,
        }
    }

    /// Opacity multiplier for a particle at `position`.
    ///
    /// Returns `dim` inside the ring `|d - progress × diagonal| <= band`
    /// while the wave is active, and 1 everywhere else.
    pub fn banding(&self, position: Point, surface: Surface, band: f64, dim: f64) -> f64 {
        if !self.active {
            return 1.0;
        }
        let d = position.distance(self.origin.resolve(surface));
        let travelled = self.progress * surface.diagonal();
        if (d - travelled).abs() <= band {
            dim
        } else {
            1.0
        }
    }
}

/// Owns the ripple wave and the highlight set.
#[derive(Debug)]
pub struct RippleEngine {
    ripple: RippleState,
    highlights: BTreeSet<usize>,
    highlight_remaining_ms: f64,
    particle_count: usize,
    rng: Xorshift64,
    params: StarFieldParams,
}

impl RippleEngine {
    pub fn new(field: &StarField, params: &StarFieldParams, rng: Xorshift64) -> Self {
        Self {
            ripple: RippleState::idle(),
            highlights: BTreeSet::new(),
            highlight_remaining_ms: 0.0,
            particle_count: field.len(),
            rng,
            params: params.clone(),
        }
    }

    /// Starts a wave from `origin` (surface center when `None`), discarding
    /// any wave in flight, and fires a highlight burst of
    /// `ripple_twinkle_count` particles.
    ///
    /// Returns `StarFieldError::InvalidTrigger` for a non-finite origin; the
    /// current state is left untouched in that case.
    pub fn trigger_ripple(&mut self, origin: Option<Point>) -> Result<(), StarFieldError> {
        let origin = RippleOrigin::from_point(origin)?;
        if self.ripple.active {
            debug!(
                "ripple retriggered at progress {:.3}, discarding previous wave",
                self.ripple.progress
            );
        }
        self.ripple = RippleState {
            origin,
            progress: 0.0,
            active: true,
            elapsed_ms: 0.0,
        };
        self.trigger_twinkle(self.params.ripple_twinkle_count);
        Ok(())
    }

    /// Replaces the highlight set with `count` ids sampled with replacement,
    /// open for `highlight_window_ms`. A count of zero clears the set.
    ///
    /// Sampling stops early once every particle is highlighted, so any count
    /// costs at most a coupon-collector run over the field.
    pub fn trigger_twinkle(&mut self, count: usize) {
        self.highlights.clear();
        for _ in 0..count {
            if self.highlights.len() == self.particle_count {
                break;
            }
            self.highlights.insert(self.rng.next_usize(self.particle_count));
        }
        self.highlight_remaining_ms = if self.highlights.is_empty() {
            0.0
        } else {
            self.params.highlight_window_ms
        };
        debug!(
            "twinkle: {} requested, {} highlighted",
            count,
            self.highlights.len()
        );
    }

    /// Advances the wave and the highlight window by `dt` milliseconds.
    pub fn advance(&mut self, dt: f64) {
        if self.ripple.active {
            self.ripple.elapsed_ms += dt;
            if self.ripple.elapsed_ms >= self.params.ripple_duration_ms {
                self.ripple.progress = 1.0;
                self.ripple.active = false;
            } else {
                self.ripple.progress = self.ripple.elapsed_ms / self.params.ripple_duration_ms;
            }
        }
        if !self.highlights.is_empty() {
            self.highlight_remaining_ms -= dt;
            if self.highlight_remaining_ms <= 0.0 {
                self.highlights.clear();
                self.highlight_remaining_ms = 0.0;
            }
        }
    }

    /// Ends the wave and clears highlights.
    pub fn reset(&mut self) {
        self.ripple.active = false;
        self.highlights.clear();
        self.highlight_remaining_ms = 0.0;
    }

    pub fn ripple(&self) -> &RippleState {
        &self.ripple
    }

    pub fn highlights(&self) -> &BTreeSet<usize> {
        &self.highlights
    }
}
