//! Particle field generation and the drawing surface.
//!
//! A [`StarField`] is built once per engine and never changes membership.
//! Particles carry only their immutable core (id, normalized position,
//! intensity); their animation phase lives in the
//! [`Scheduler`](crate::scheduler::Scheduler).

use crate::error::StarFieldError;
use crate::prng::Xorshift64;
use serde::{Deserialize, Serialize};

/// Particle count used when a caller does not pick one.
pub const DEFAULT_PARTICLE_COUNT: usize = 100;

/// Lowest intensity level.
pub const MIN_INTENSITY: u8 = 1;
/// Highest intensity level.
pub const MAX_INTENSITY: u8 = 4;

/// A point in surface pixel space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// One star. Fields are private so position and intensity cannot change
/// after generation.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    id: usize,
    x: f64,
    y: f64,
    intensity: u8,
}

impl Particle {
    pub fn id(&self) -> usize {
        self.id
    }

    /// Normalized position in `[0, 1) × [0, 1)`.
    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }

    /// Intensity level in `[1, 4]`.
    pub fn intensity(&self) -> u8 {
        self.intensity
    }

    /// Peak twinkle opacity: `0.6 + intensity × 0.1`.
    pub fn opacity_ceiling(&self) -> f64 {
        0.6 + f64::from(self.intensity) * 0.1
    }

    /// Position on a surface of the given size.
    pub fn pixel_position(&self, surface: Surface) -> Point {
        Point::new(self.x * surface.width, self.y * surface.height)
    }
}

/// Drawing surface size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Surface {
    pub width: f64,
    pub height: f64,
}

impl Surface {
    /// Returns `StarFieldError::InvalidDimensions` unless both sides are
    /// finite and positive.
    pub fn new(width: f64, height: f64) -> Result<Self, StarFieldError> {
        if !(width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0) {
            return Err(StarFieldError::InvalidDimensions);
        }
        Ok(Self { width, height })
    }

    pub fn center(self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    /// Length of the surface diagonal, the distance a ripple covers.
    pub fn diagonal(self) -> f64 {
        self.width.hypot(self.height)
    }
}

/// The fixed set of particles.
#[derive(Debug, Clone)]
pub struct StarField {
    particles: Vec<Particle>,
}

impl StarField {
    /// Generates `count` particles with uniform positions over the unit
    /// square and uniform intensity over `{1, 2, 3, 4}`. Ids are `0..count`.
    ///
    /// Returns `StarFieldError::InvalidConfiguration` if `count` is zero.
    pub fn generate(count: usize, rng: &mut Xorshift64) -> Result<Self, StarFieldError> {
        if count == 0 {
            return Err(StarFieldError::InvalidConfiguration(
                "particle count must be positive".into(),
            ));
        }
        let levels = usize::from(MAX_INTENSITY - MIN_INTENSITY) + 1;
        let particles = (0..count)
            .map(|id| {
                let x = rng.next_f64();
                let y = rng.next_f64();
                let intensity = MIN_INTENSITY + rng.next_usize(levels) as u8;
                Particle { id, x, y, intensity }
            })
            .collect();
        Ok(Self { particles })
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// Always false: generation rejects empty fields.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<&Particle> {
        self.particles.get(id)
    }
}
