//! Per-particle animation timelines as explicit state machines.
//!
//! Each timeline stores only its current stage, the time spent in it and the
//! durations drawn for the running iteration. `advance(dt)` consumes time
//! stage by stage, so a single large tick crosses every boundary it spans and
//! redraws random durations exactly as a sequence of small ticks would.
//!
//! Ticks longer than [`CATCH_UP_LIMIT_MS`] (a suspended host, a huge `--dt`)
//! first drop whole iterations of the running timing, so `advance` is bounded
//! for any finite `dt`. Only the phase survives such a skip, not the exact
//! sequence of redraws.

use crate::config::StarFieldParams;
use crate::prng::Xorshift64;

/// Longest tick that is replayed stage by stage.
pub const CATCH_UP_LIMIT_MS: f64 = 600_000.0;

/// Stage of a [`TwinkleCycle`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeStage {
    /// Waiting at level 0 before rising.
    Delay,
    /// Level ramps 0 → 1.
    Rise,
    /// Level ramps 1 → 0.
    Fall,
}

/// Twinkle-fade cycle: delay, rise, fall, then redraw and repeat.
///
/// The level is normalized to [0, 1]; the projector maps it onto the
/// particle's opacity range.
#[derive(Debug, Clone)]
pub struct TwinkleCycle {
    stage: FadeStage,
    elapsed: f64,
    delay: f64,
    duration: f64,
}

impl TwinkleCycle {
    /// Starts a cycle in its delay stage with freshly drawn timings.
    pub fn new(rng: &mut Xorshift64, params: &StarFieldParams) -> Self {
        let (delay, duration) = Self::draw(rng, params);
        Self {
            stage: FadeStage::Delay,
            elapsed: 0.0,
            delay,
            duration,
        }
    }

    fn draw(rng: &mut Xorshift64, params: &StarFieldParams) -> (f64, f64) {
        let delay = rng.next_range(0.0, params.twinkle_delay_max_ms);
        let duration = rng.next_range(
            params.twinkle_duration_min_ms,
            params.twinkle_duration_max_ms,
        );
        (delay, duration)
    }

    pub fn advance(&mut self, dt: f64, rng: &mut Xorshift64, params: &StarFieldParams) {
        let mut remaining = dt;
        let period = self.delay + 2.0 * self.duration;
        if remaining > CATCH_UP_LIMIT_MS && period > 0.0 {
            remaining %= period;
        }
        while remaining > 0.0 {
            let span = match self.stage {
                FadeStage::Delay => self.delay,
                FadeStage::Rise | FadeStage::Fall => self.duration,
            };
            let left = span - self.elapsed;
            if remaining < left {
                self.elapsed += remaining;
                return;
            }
            remaining -= left;
            self.elapsed = 0.0;
            self.stage = match self.stage {
                FadeStage::Delay => FadeStage::Rise,
                FadeStage::Rise => FadeStage::Fall,
                FadeStage::Fall => {
                    (self.delay, self.duration) = Self::draw(rng, params);
                    FadeStage::Delay
                }
            };
        }
    }

    /// Current level in [0, 1].
    pub fn level(&self) -> f64 {
        match self.stage {
            FadeStage::Delay => 0.0,
            FadeStage::Rise => self.elapsed / self.duration,
            FadeStage::Fall => 1.0 - self.elapsed / self.duration,
        }
    }

    pub fn stage(&self) -> FadeStage {
        self.stage
    }

    /// Ramp duration of the running iteration.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Start delay of the running iteration.
    pub fn delay(&self) -> f64 {
        self.delay
    }
}

/// Hue-pulse cycle: a triangle wave 0 → 1 → 0 over one loop.
#[derive(Debug, Clone)]
pub struct HuePulse {
    elapsed: f64,
    duration: f64,
}

impl HuePulse {
    /// Starts at a random point of the first loop so neighbours do not pulse
    /// in lockstep.
    pub fn new(rng: &mut Xorshift64, params: &StarFieldParams) -> Self {
        let duration = Self::draw(rng, params);
        let elapsed = rng.next_range(0.0, duration);
        Self { elapsed, duration }
    }

    fn draw(rng: &mut Xorshift64, params: &StarFieldParams) -> f64 {
        rng.next_range(params.hue_duration_min_ms, params.hue_duration_max_ms)
    }

    pub fn advance(&mut self, dt: f64, rng: &mut Xorshift64, params: &StarFieldParams) {
        let mut remaining = dt;
        if remaining > CATCH_UP_LIMIT_MS && self.duration > 0.0 {
            remaining %= self.duration;
        }
        while remaining > 0.0 {
            let left = self.duration - self.elapsed;
            if remaining < left {
                self.elapsed += remaining;
                return;
            }
            remaining -= left;
            self.elapsed = 0.0;
            self.duration = Self::draw(rng, params);
        }
    }

    /// Current blend in [0, 1].
    pub fn level(&self) -> f64 {
        let t = self.elapsed / self.duration;
        if t < 0.5 {
            2.0 * t
        } else {
            2.0 * (1.0 - t)
        }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }
}

/// One-shot transition wobble: out to a random offset, then back to rest.
#[derive(Debug, Clone)]
pub struct JitterTween {
    target_x: f64,
    target_y: f64,
    elapsed: f64,
    half: f64,
}

impl JitterTween {
    pub fn new(rng: &mut Xorshift64, params: &StarFieldParams) -> Self {
        let amp = params.jitter_amplitude_px;
        Self {
            target_x: rng.next_range(-amp, amp),
            target_y: rng.next_range(-amp, amp),
            elapsed: 0.0,
            half: params.jitter_duration_ms,
        }
    }

    pub fn advance(&mut self, dt: f64) {
        self.elapsed = (self.elapsed + dt).min(2.0 * self.half);
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= 2.0 * self.half
    }

    /// Current `(x, y)` offset in pixels.
    pub fn offset(&self) -> (f64, f64) {
        let k = if self.elapsed < self.half {
            self.elapsed / self.half
        } else {
            (2.0 - self.elapsed / self.half).max(0.0)
        };
        (self.target_x * k, self.target_y * k)
    }

    pub fn target(&self) -> (f64, f64) {
        (self.target_x, self.target_y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> StarFieldParams {
        StarFieldParams::default()
    }

    #[test]
    fn twinkle_draws_within_configured_ranges() {
        let p = params();
        let mut rng = Xorshift64::new(11);
        for _ in 0..200 {
            let c = TwinkleCycle::new(&mut rng, &p);
            assert!((0.0..3000.0).contains(&c.delay()));
            assert!((5000.0..8000.0).contains(&c.duration()));
            assert_eq!(c.stage(), FadeStage::Delay);
            assert_eq!(c.level(), 0.0);
        }
    }

    #[test]
    fn twinkle_walks_delay_rise_fall() {
        let p = params();
        let mut rng = Xorshift64::new(4);
        let mut c = TwinkleCycle::new(&mut rng, &p);
        let (delay, duration) = (c.delay(), c.duration());

        c.advance(delay + duration / 2.0, &mut rng, &p);
        assert_eq!(c.stage(), FadeStage::Rise);
        assert!((c.level() - 0.5).abs() < 1e-9);

        c.advance(duration, &mut rng, &p);
        assert_eq!(c.stage(), FadeStage::Fall);
        assert!((c.level() - 0.5).abs() < 1e-9);

        c.advance(duration / 2.0 + 1e-3, &mut rng, &p);
        assert_eq!(c.stage(), FadeStage::Delay);
        assert_eq!(c.level(), 0.0);
    }

    #[test]
    fn twinkle_redraws_timings_each_iteration() {
        let p = params();
        let mut rng = Xorshift64::new(8);
        let mut c = TwinkleCycle::new(&mut rng, &p);
        let first = (c.delay(), c.duration());
        c.advance(first.0 + 2.0 * first.1 + 1e-3, &mut rng, &p);
        assert_eq!(c.stage(), FadeStage::Delay);
        assert_ne!((c.delay(), c.duration()), first);
    }

    #[test]
    fn one_big_tick_equals_many_small_ticks() {
        let p = params();
        let mut rng_a = Xorshift64::new(77);
        let mut rng_b = Xorshift64::new(77);
        let mut a = TwinkleCycle::new(&mut rng_a, &p);
        let mut b = TwinkleCycle::new(&mut rng_b, &p);

        a.advance(40_000.0, &mut rng_a, &p);
        for _ in 0..4000 {
            b.advance(10.0, &mut rng_b, &p);
        }
        assert_eq!(a.stage(), b.stage());
        assert!((a.level() - b.level()).abs() < 1e-6);
    }

    #[test]
    fn huge_tick_returns_with_levels_in_range() {
        let p = params();
        let mut rng = Xorshift64::new(13);
        let mut c = TwinkleCycle::new(&mut rng, &p);
        let mut h = HuePulse::new(&mut rng, &p);
        for dt in [1e12, 1e20, f64::MAX] {
            c.advance(dt, &mut rng, &p);
            h.advance(dt, &mut rng, &p);
            assert!((0.0..=1.0).contains(&c.level()));
            assert!((0.0..=1.0).contains(&h.level()));
        }
    }

    #[test]
    fn ticks_below_catch_up_limit_are_exact() {
        let p = params();
        let mut rng_a = Xorshift64::new(3);
        let mut rng_b = Xorshift64::new(3);
        let mut a = HuePulse::new(&mut rng_a, &p);
        let mut b = HuePulse::new(&mut rng_b, &p);
        a.advance(CATCH_UP_LIMIT_MS, &mut rng_a, &p);
        for _ in 0..600 {
            b.advance(1000.0, &mut rng_b, &p);
        }
        assert!((a.level() - b.level()).abs() < 1e-6);
    }

    #[test]
    fn twinkle_with_zero_delay_range_still_progresses() {
        let mut p = params();
        p.twinkle_delay_max_ms = 0.0;
        let mut rng = Xorshift64::new(2);
        let mut c = TwinkleCycle::new(&mut rng, &p);
        c.advance(1.0, &mut rng, &p);
        assert_eq!(c.stage(), FadeStage::Rise);
        assert!(c.level() > 0.0);
    }

    #[test]
    fn hue_duration_in_range_and_level_is_triangle() {
        let p = params();
        let mut rng = Xorshift64::new(19);
        let mut h = HuePulse::new(&mut rng, &p);
        assert!((8000.0..11000.0).contains(&h.duration()));

        // Walk to the start of the next loop, where the level is 0.
        let d = h.duration();
        h.advance(d - h.elapsed, &mut rng, &p);
        assert_eq!(h.level(), 0.0);
        let d = h.duration();
        h.advance(d / 4.0, &mut rng, &p);
        assert!((h.level() - 0.5).abs() < 1e-9);
        h.advance(d / 4.0, &mut rng, &p);
        assert!((h.level() - 1.0).abs() < 1e-9);
        h.advance(d / 4.0, &mut rng, &p);
        assert!((h.level() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn hue_pulses_start_desynchronized() {
        let p = params();
        let mut rng = Xorshift64::new(5);
        let levels: Vec<f64> = (0..10).map(|_| HuePulse::new(&mut rng, &p).level()).collect();
        assert!(levels.windows(2).any(|w| w[0] != w[1]));
    }

    #[test]
    fn jitter_goes_out_and_comes_back() {
        let p = params();
        let mut rng = Xorshift64::new(31);
        let mut j = JitterTween::new(&mut rng, &p);
        let (tx, ty) = j.target();
        assert!((-10.0..10.0).contains(&tx));
        assert!((-10.0..10.0).contains(&ty));
        assert_eq!(j.offset(), (0.0, 0.0));

        j.advance(800.0);
        let (x, y) = j.offset();
        assert!((x - tx).abs() < 1e-9 && (y - ty).abs() < 1e-9);
        assert!(!j.is_finished());

        j.advance(400.0);
        let (x, _) = j.offset();
        assert!((x - tx / 2.0).abs() < 1e-9);

        j.advance(10_000.0);
        assert!(j.is_finished());
        assert_eq!(j.offset(), (0.0, 0.0));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn levels_stay_in_unit_interval(
                seed: u64,
                ticks in proptest::collection::vec(0.0_f64..5000.0, 1..50),
            ) {
                let p = StarFieldParams::default();
                let mut rng = Xorshift64::new(seed);
                let mut twinkle = TwinkleCycle::new(&mut rng, &p);
                let mut hue = HuePulse::new(&mut rng, &p);
                for dt in ticks {
                    twinkle.advance(dt, &mut rng, &p);
                    hue.advance(dt, &mut rng, &p);
                    prop_assert!((0.0..=1.0).contains(&twinkle.level()));
                    prop_assert!((0.0..=1.0).contains(&hue.level()));
                }
            }

            #[test]
            fn jitter_stays_within_amplitude(seed: u64, dt in 0.0_f64..2000.0) {
                let p = StarFieldParams::default();
                let mut rng = Xorshift64::new(seed);
                let mut j = JitterTween::new(&mut rng, &p);
                j.advance(dt);
                let (x, y) = j.offset();
                prop_assert!(x.abs() <= p.jitter_amplitude_px);
                prop_assert!(y.abs() <= p.jitter_amplitude_px);
            }
        }
    }
}
