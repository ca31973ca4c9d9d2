#![deny(unsafe_code)]
//! Ambient star field animation engine.
//!
//! A fixed field of particles ([`StarField`]) twinkles and pulses on
//! per-particle timelines ([`Scheduler`]), reacts to ripple and twinkle
//! triggers ([`RippleEngine`]), and is projected each frame into
//! [`VisualAttributes`] for a drawing surface. [`StarFieldEngine`] ties the
//! pieces together; [`Seed`] makes a session reproducible.

pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod field;
pub mod params;
pub mod prng;
pub mod project;
pub mod ripple;
pub mod scheduler;
pub mod seed;
pub mod timeline;
pub mod trigger;

pub use color::Srgb;
pub use config::StarFieldParams;
pub use engine::StarFieldEngine;
pub use error::StarFieldError;
pub use field::{Particle, Point, StarField, Surface};
pub use prng::Xorshift64;
pub use project::{project, VisualAttributes};
pub use ripple::{RippleEngine, RippleOrigin, RippleState};
pub use scheduler::{CycleKind, Scheduler, TimelineValues};
pub use seed::Seed;
pub use trigger::{ScheduledTrigger, Trigger};
