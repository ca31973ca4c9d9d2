//! Render state projector: maps one particle plus the current animation
//! state to the attributes the drawing surface needs.
//!
//! [`project`] is a pure function of its arguments. It draws no random
//! numbers and mutates nothing, so identical inputs give bit-identical
//! output.

use crate::color::Srgb;
use crate::config::StarFieldParams;
use crate::field::{Particle, Surface};
use crate::ripple::RippleState;
use crate::scheduler::TimelineValues;
use serde::Serialize;
use std::collections::BTreeSet;

/// Opacity of a highlighted particle before ripple modulation.
pub const HIGHLIGHT_OPACITY: f64 = 1.0;

/// Final per-frame visual attributes of one particle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VisualAttributes {
    /// Pixel position on the current surface, before jitter.
    pub x: f64,
    pub y: f64,
    /// Diameter in pixels.
    pub size: f64,
    /// Opacity in [0, 1].
    pub opacity: f64,
    pub color: Srgb,
    /// Transition jitter offset in pixels.
    pub jitter_x: f64,
    pub jitter_y: f64,
}

/// Everything the projector reads besides the particle and its timeline
/// values.
#[derive(Debug, Clone, Copy)]
pub struct ProjectionContext<'a> {
    pub surface: Surface,
    pub highlights: &'a BTreeSet<usize>,
    pub ripple: &'a RippleState,
    pub params: &'a StarFieldParams,
}

/// Projects one particle.
///
/// - size: `highlight_size` when highlighted, otherwise
///   `(1 + intensity × size_scale) × display_scale`
/// - opacity: `floor + (ceiling − floor) × fade` (or 1 when highlighted),
///   times the ripple banding factor
/// - color: white blended toward the tint by the hue value
pub fn project(
    particle: &Particle,
    values: TimelineValues,
    ctx: &ProjectionContext<'_>,
) -> VisualAttributes {
    let params = ctx.params;
    let position = particle.pixel_position(ctx.surface);
    let highlighted = ctx.highlights.contains(&particle.id());

    let size = if highlighted {
        params.highlight_size
    } else {
        (1.0 + f64::from(particle.intensity()) * params.size_scale) * params.display_scale
    };

    let base = if highlighted {
        HIGHLIGHT_OPACITY
    } else {
        twinkle_opacity(particle, values.fade, params.opacity_floor)
    };
    let band = ctx.ripple.banding(
        position,
        ctx.surface,
        params.ripple_band_px,
        params.ripple_dim,
    );

    VisualAttributes {
        x: position.x,
        y: position.y,
        size,
        opacity: (base * band).clamp(0.0, 1.0),
        color: Srgb::WHITE.lerp(params.tint, values.hue),
        jitter_x: values.jitter_x,
        jitter_y: values.jitter_y,
    }
}

/// Opacity from the twinkle cycle alone, with no ripple applied.
pub fn twinkle_opacity(particle: &Particle, fade: f64, floor: f64) -> f64 {
    let ceiling = particle.opacity_ceiling();
    floor + (ceiling - floor) * fade.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{Point, StarField};
    use crate::prng::Xorshift64;
    use crate::ripple::RippleOrigin;

    fn field() -> StarField {
        StarField::generate(20, &mut Xorshift64::new(42)).unwrap()
    }

    fn values(fade: f64, hue: f64) -> TimelineValues {
        TimelineValues {
            fade,
            hue,
            jitter_x: 1.5,
            jitter_y: -2.0,
        }
    }

    #[test]
    fn projection_is_deterministic() {
        let f = field();
        let params = StarFieldParams::default();
        let highlights = BTreeSet::from([3, 7]);
        let ripple = RippleState::at_progress(RippleOrigin::Center, 0.3);
        let ctx = ProjectionContext {
            surface: Surface::new(390.0, 844.0).unwrap(),
            highlights: &highlights,
            ripple: &ripple,
            params: &params,
        };
        for p in f.particles() {
            let a = project(p, values(0.4, 0.7), &ctx);
            let b = project(p, values(0.4, 0.7), &ctx);
            assert_eq!(a.x.to_bits(), b.x.to_bits());
            assert_eq!(a.opacity.to_bits(), b.opacity.to_bits());
            assert_eq!(a.size.to_bits(), b.size.to_bits());
            assert_eq!(a.color.r.to_bits(), b.color.r.to_bits());
        }
    }

    #[test]
    fn size_and_opacity_follow_highlight_state() {
        let f = field();
        let params = StarFieldParams::default();
        let ripple = RippleState::idle();
        let p = &f.particles()[5];
        let surface = Surface::new(100.0, 100.0).unwrap();

        let none = BTreeSet::new();
        let plain = project(
            p,
            values(1.0, 0.0),
            &ProjectionContext {
                surface,
                highlights: &none,
                ripple: &ripple,
                params: &params,
            },
        );
        let expected = (1.0 + p.intensity() as f64) * params.display_scale;
        assert!((plain.size - expected).abs() < 1e-12);
        assert!((plain.opacity - p.opacity_ceiling().min(1.0)).abs() < 1e-12);

        let lit = BTreeSet::from([5]);
        let hl = project(
            p,
            values(0.0, 0.0),
            &ProjectionContext {
                surface,
                highlights: &lit,
                ripple: &ripple,
                params: &params,
            },
        );
        assert_eq!(hl.size, 3.5);
        assert_eq!(hl.opacity, HIGHLIGHT_OPACITY);
        assert!(hl.size > plain.size);
    }

    #[test]
    fn dark_twinkle_sits_at_floor() {
        let f = field();
        let p = &f.particles()[0];
        assert_eq!(twinkle_opacity(p, 0.0, 0.2), 0.2);
    }

    #[test]
    fn color_blends_from_white_to_tint() {
        let f = field();
        let params = StarFieldParams::default();
        let ripple = RippleState::idle();
        let none = BTreeSet::new();
        let ctx = ProjectionContext {
            surface: Surface::new(100.0, 100.0).unwrap(),
            highlights: &none,
            ripple: &ripple,
            params: &params,
        };
        let p = &f.particles()[0];
        assert_eq!(project(p, values(0.5, 0.0), &ctx).color, Srgb::WHITE);
        assert_eq!(project(p, values(0.5, 1.0), &ctx).color, params.tint);
    }

    #[test]
    fn position_and_jitter_pass_through() {
        let f = field();
        let params = StarFieldParams::default();
        let ripple = RippleState::idle();
        let none = BTreeSet::new();
        let surface = Surface::new(200.0, 400.0).unwrap();
        let ctx = ProjectionContext {
            surface,
            highlights: &none,
            ripple: &ripple,
            params: &params,
        };
        let p = &f.particles()[2];
        let v = project(p, values(0.5, 0.5), &ctx);
        let at = p.pixel_position(surface);
        assert_eq!((v.x, v.y), (at.x, at.y));
        assert_eq!((v.jitter_x, v.jitter_y), (1.5, -2.0));
    }

    #[test]
    fn ring_dims_nearer_particle_but_not_farther_one() {
        let f = field();
        let params = StarFieldParams::default();
        let surface = Surface::new(300.0, 300.0).unwrap();
        let origin = Point::new(0.0, 0.0);
        let none = BTreeSet::new();

        let mut by_distance: Vec<&Particle> = f.particles().iter().collect();
        by_distance.sort_by(|a, b| {
            let da = a.pixel_position(surface).distance(origin);
            let db = b.pixel_position(surface).distance(origin);
            da.total_cmp(&db)
        });
        let near = by_distance[0];
        let d1 = near.pixel_position(surface).distance(origin);
        let far = by_distance
            .iter()
            .find(|p| p.pixel_position(surface).distance(origin) > d1 + 2.0 * params.ripple_band_px)
            .expect("a particle well outside the ring");

        let ripple = RippleState::at_progress(
            RippleOrigin::At { x: 0.0, y: 0.0 },
            d1 / surface.diagonal(),
        );
        let ctx = ProjectionContext {
            surface,
            highlights: &none,
            ripple: &ripple,
            params: &params,
        };
        let v = values(0.6, 0.0);
        let near_out = project(near, v, &ctx);
        let far_out = project(far, v, &ctx);
        assert!(near_out.opacity < twinkle_opacity(near, 0.6, params.opacity_floor));
        assert_eq!(far_out.opacity, twinkle_opacity(far, 0.6, params.opacity_floor));
    }
}
