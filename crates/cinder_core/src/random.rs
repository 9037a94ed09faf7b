//! # Parameter Sampler
//!
//! Randomness that is good enough for visuals. Effects use it to jitter
//! rotation, timing offsets and spray direction so repeated events never
//! look identical.
//!
//! Three families are offered:
//! - uniform: [`Sampler::random`], [`Sampler::below`], [`Sampler::chance`]
//! - symmetric-uniform: [`Sampler::crandom`]
//! - seeded periodic: [`Sampler::periodic`], a short linear-congruential
//!   stream that always starts from the same seed

use rand::{Rng, RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Pseudo-random parameter source for effect construction.
///
/// Not thread-safe; each effects context owns one.
#[derive(Clone, Debug)]
pub struct Sampler {
    /// Main stream.
    rng: ChaCha8Rng,
    /// State of the periodic LCG stream.
    periodic_seed: u32,
}

impl Sampler {
    /// Initial state of the periodic stream.
    pub const PERIODIC_SEED: u32 = 0x92;

    /// Creates a reproducible sampler.
    #[must_use]
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            periodic_seed: Self::PERIODIC_SEED,
        }
    }

    /// Creates a sampler seeded from OS entropy.
    #[must_use]
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_entropy(),
            periodic_seed: Self::PERIODIC_SEED,
        }
    }

    /// Uniform value in `[0, 1)`.
    #[inline]
    pub fn random(&mut self) -> f32 {
        self.rng.gen::<f32>()
    }

    /// Uniform value in `[-1, 1)`.
    #[inline]
    pub fn crandom(&mut self) -> f32 {
        2.0 * (self.random() - 0.5)
    }

    /// Uniform value in `[lo, hi)`.
    #[inline]
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + (hi - lo) * self.random()
    }

    /// Uniform integer in `[0, n)`. Returns 0 when `n` is 0.
    #[inline]
    pub fn below(&mut self, n: u32) -> u32 {
        if n == 0 {
            return 0;
        }
        self.rng.gen_range(0..n)
    }

    /// Raw bits masked by `mask`, e.g. `bits(63)` for an offset in `0..=63`.
    #[inline]
    pub fn bits(&mut self, mask: u32) -> u32 {
        self.rng.next_u32() & mask
    }

    /// True with probability `p`.
    #[inline]
    pub fn chance(&mut self, p: f32) -> bool {
        self.random() < p
    }

    /// Fair coin flip.
    #[inline]
    pub fn coin(&mut self) -> bool {
        self.rng.next_u32() & 1 == 1
    }

    /// Next value of the periodic stream, in `[0, 1)`.
    pub fn periodic(&mut self) -> f32 {
        self.periodic_seed = self.periodic_seed.wrapping_mul(69_069).wrapping_add(1);
        (self.periodic_seed & 0xffff) as f32 / 65_536.0
    }

    /// Restarts the periodic stream from [`Sampler::PERIODIC_SEED`].
    pub fn reset_periodic(&mut self) {
        self.periodic_seed = Self::PERIODIC_SEED;
    }
}

impl Default for Sampler {
    fn default() -> Self {
        Self::from_entropy()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ranges() {
        let mut s = Sampler::from_seed(1);
        for _ in 0..10_000 {
            let r = s.random();
            assert!((0.0..1.0).contains(&r));
            let c = s.crandom();
            assert!((-1.0..1.0).contains(&c));
            assert!(s.below(360) < 360);
            assert!(s.bits(63) <= 63);
        }
    }

    #[test]
    fn test_same_seed_same_stream() {
        let mut a = Sampler::from_seed(99);
        let mut b = Sampler::from_seed(99);
        for _ in 0..100 {
            assert_eq!(a.random().to_bits(), b.random().to_bits());
        }
    }

    #[test]
    fn test_periodic_stream_restarts() {
        let mut s = Sampler::from_seed(0);
        let first: Vec<f32> = (0..8).map(|_| s.periodic()).collect();
        s.reset_periodic();
        let again: Vec<f32> = (0..8).map(|_| s.periodic()).collect();
        assert_eq!(first, again);
        assert!(first.iter().all(|v| (0.0..1.0).contains(v)));
    }

    #[test]
    fn test_chance_frequency() {
        let mut s = Sampler::from_seed(5);
        let hits = (0..100_000).filter(|_| s.chance(0.25)).count();
        let freq = hits as f64 / 100_000.0;
        assert!((freq - 0.25).abs() < 0.01, "frequency {freq}");
    }
}
