//! The star field engine: one field, one scheduler, one ripple engine.
//!
//! Callers hold a [`StarFieldEngine`], call [`advance`](StarFieldEngine::advance)
//! once per frame tick, feed triggers between ticks, and read
//! [`frame`](StarFieldEngine::frame) to draw. `advance` takes `&mut self` and
//! `frame` takes `&self`, so a frame always sees the state as of the end of the
//! last completed tick.

use crate::config::StarFieldParams;
use crate::error::StarFieldError;
use crate::field::{Point, StarField, Surface};
use crate::prng::Xorshift64;
use crate::project::{project, ProjectionContext, VisualAttributes};
use crate::ripple::{RippleEngine, RippleOrigin, RippleState};
use crate::scheduler::Scheduler;
use crate::trigger::Trigger;
use log::{debug, warn};
use serde_json::Value;
use std::collections::BTreeSet;

/// Ambient star field animation engine.
#[derive(Debug)]
pub struct StarFieldEngine {
    field: StarField,
    surface: Surface,
    params: StarFieldParams,
    scheduler: Scheduler,
    ripple: RippleEngine,
    elapsed_ms: f64,
    disposed: bool,
}

impl StarFieldEngine {
    /// Generates `count` particles and starts their timelines.
    ///
    /// The seed feeds one PRNG that is forked for the scheduler and the ripple
    /// engine after generation, so the layout depends only on `seed` and
    /// `count`.
    ///
    /// Returns `StarFieldError::InvalidConfiguration` for a zero count or
    /// invalid params.
    pub fn init(
        count: usize,
        surface: Surface,
        seed: u64,
        params: StarFieldParams,
    ) -> Result<Self, StarFieldError> {
        params.validate()?;
        let mut rng = Xorshift64::new(seed);
        let field = StarField::generate(count, &mut rng)?;
        let scheduler = Scheduler::start(&field, &params, rng.fork());
        let ripple = RippleEngine::new(&field, &params, rng.fork());
        debug!(
            "star field initialized: {count} particles on {}x{} (seed {seed})",
            surface.width, surface.height
        );
        Ok(Self {
            field,
            surface,
            params,
            scheduler,
            ripple,
            elapsed_ms: 0.0,
            disposed: false,
        })
    }

    /// Builds an engine from a JSON params object, falling back to defaults
    /// for missing keys.
    pub fn from_json(
        count: usize,
        width: f64,
        height: f64,
        seed: u64,
        json_params: &Value,
    ) -> Result<Self, StarFieldError> {
        let surface = Surface::new(width, height)?;
        Self::init(count, surface, seed, StarFieldParams::from_json(json_params)?)
    }

    /// Advances every timeline by `dt` milliseconds.
    ///
    /// Returns `StarFieldError::InvalidTimeStep` for a negative or non-finite
    /// `dt`. After [`dispose`](Self::dispose) this is a no-op.
    pub fn advance(&mut self, dt: f64) -> Result<(), StarFieldError> {
        if !dt.is_finite() || dt < 0.0 {
            return Err(StarFieldError::InvalidTimeStep(dt));
        }
        if self.disposed {
            return Ok(());
        }
        self.ripple.advance(dt);
        self.scheduler.advance(dt);
        self.elapsed_ms += dt;
        Ok(())
    }

    /// Starts a ripple from `origin` in surface pixels, or from the surface
    /// center when `None`. Also fires a highlight burst.
    ///
    /// A non-finite origin is rejected even after dispose.
    pub fn trigger_ripple(&mut self, origin: Option<Point>) -> Result<(), StarFieldError> {
        RippleOrigin::from_point(origin)?;
        if self.disposed {
            warn!("ripple trigger ignored: engine disposed");
            return Ok(());
        }
        self.ripple.trigger_ripple(origin)
    }

    /// Highlights up to `count` randomly sampled particles for the highlight
    /// window.
    pub fn trigger_twinkle(&mut self, count: usize) {
        if self.disposed {
            warn!("twinkle trigger ignored: engine disposed");
            return;
        }
        self.ripple.trigger_twinkle(count);
    }

    /// Starts the transition wobble on every particle.
    pub fn trigger_transition(&mut self) {
        if self.disposed {
            warn!("transition trigger ignored: engine disposed");
            return;
        }
        self.scheduler
            .schedule_jitter(self.field.particles().iter().map(|p| p.id()));
    }

    /// Dispatches a trigger event.
    pub fn apply(&mut self, trigger: &Trigger) -> Result<(), StarFieldError> {
        match trigger {
            Trigger::Ripple { origin } => self.trigger_ripple(*origin),
            Trigger::Twinkle { count } => {
                self.trigger_twinkle(Trigger::clamp_count(*count));
                Ok(())
            }
            Trigger::Transition => {
                self.trigger_transition();
                Ok(())
            }
        }
    }

    /// Changes the drawing surface size. Normalized positions are unchanged.
    pub fn resize(&mut self, width: f64, height: f64) -> Result<(), StarFieldError> {
        self.surface = Surface::new(width, height)?;
        Ok(())
    }

    /// Stops every timeline and clears ripple and highlight state.
    /// Calling it again does nothing.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.scheduler.cancel_all();
        self.ripple.reset();
        self.disposed = true;
        debug!("star field disposed after {:.1} ms", self.elapsed_ms);
    }

    /// Visual attributes of every particle in id order.
    ///
    /// Empty once the engine is disposed.
    pub fn frame(&self) -> Vec<VisualAttributes> {
        if self.disposed {
            return Vec::new();
        }
        let ctx = self.projection_context();
        self.field
            .particles()
            .iter()
            .map(|p| project(p, self.scheduler.values(p.id()), &ctx))
            .collect()
    }

    /// Visual attributes of a single particle.
    pub fn project_particle(&self, id: usize) -> Option<VisualAttributes> {
        if self.disposed {
            return None;
        }
        let particle = self.field.get(id)?;
        Some(project(
            particle,
            self.scheduler.values(id),
            &self.projection_context(),
        ))
    }

    fn projection_context(&self) -> ProjectionContext<'_> {
        ProjectionContext {
            surface: self.surface,
            highlights: self.ripple.highlights(),
            ripple: self.ripple.ripple(),
            params: &self.params,
        }
    }

    pub fn field(&self) -> &StarField {
        &self.field
    }

    pub fn surface(&self) -> Surface {
        self.surface
    }

    pub fn params(&self) -> &StarFieldParams {
        &self.params
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn ripple_state(&self) -> &RippleState {
        self.ripple.ripple()
    }

    pub fn highlights(&self) -> &BTreeSet<usize> {
        self.ripple.highlights()
    }

    /// Total time advanced since init.
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed_ms
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }
}
