//! Seedable Xorshift64 PRNG shared by the generator, the scheduler and the
//! ripple engine.
//!
//! Every random draw in the engine goes through this type so that a fixed
//! seed reproduces the same star layout, the same twinkle/hue timings and the
//! same highlight sampling on every platform.

/// Xorshift64 deterministic PRNG with shifts (13, 7, 17).
///
/// A seed of 0 is replaced by a non-zero fallback because 0 is a fixed point
/// of the algorithm.
#[derive(Debug, Clone)]
pub struct Xorshift64 {
    state: u64,
}

impl Xorshift64 {
    const FALLBACK_SEED: u64 = 0x5EED_DEAD_BEEF_CAFE;

    /// Multiplier used by [`fork`](Self::fork) to decorrelate child streams.
    const FORK_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

    /// Creates a new PRNG with the given seed.
    pub fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }

    /// Advances the state and returns the next 64-bit value.
    pub fn next_u64(&mut self) -> u64 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 7;
        self.state ^= self.state << 17;
        self.state
    }

    /// Returns a uniformly distributed f64 in [0, 1) from the upper 53 bits.
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Returns a uniformly distributed f64 in [min, max).
    ///
    /// When `min == max` the result is exactly `min`.
    pub fn next_range(&mut self, min: f64, max: f64) -> f64 {
        min + self.next_f64() * (max - min)
    }

    /// Returns a uniformly distributed usize in [0, max).
    ///
    /// # Panics
    ///
    /// Panics if `max` is 0.
    pub fn next_usize(&mut self, max: usize) -> usize {
        (self.next_u64() as usize) % max
    }

    /// Splits off an independent stream.
    ///
    /// The engine hands one fork to each component so that, for example,
    /// extra twinkle triggers never shift the scheduler's timing draws.
    pub fn fork(&mut self) -> Xorshift64 {
        Xorshift64::new(self.next_u64().wrapping_mul(Self::FORK_MIX))
    }
}
