//! Seeded linear congruential generator shared by every host.
//!
//! The update is the classic 32-bit LCG (`a = 1664525`, `c = 1013904223`)
//! with wrapping arithmetic, so a client and the server that start from the
//! same seed observe the same sequence on any platform.

use serde::{Deserialize, Serialize};

use crate::math::Fixed;

const LCG_MULTIPLIER: u32 = 1_664_525;
const LCG_INCREMENT: u32 = 1_013_904_223;

/// 2^32 as a float, the divisor that maps a state onto `[0, 1)`.
const STATE_SPAN: f64 = 4_294_967_296.0;

/// Deterministic pseudo-random generator.
///
/// Not suitable for anything security related.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SeededRng {
    state: u32,
}

impl SeededRng {
    /// Create a generator from an integer seed.
    #[must_use]
    pub const fn new(seed: u32) -> Self {
        Self { state: seed }
    }

    /// Current internal state.
    #[must_use]
    pub const fn state(&self) -> u32 {
        self.state
    }

    fn advance(&mut self) -> u32 {
        self.state = self
            .state
            .wrapping_mul(LCG_MULTIPLIER)
            .wrapping_add(LCG_INCREMENT);
        self.state
    }

    /// Next value in `[0, 1)`.
    ///
    /// Every 32-bit state divided by 2^32 is exactly representable as an
    /// `f64`, so this value carries no rounding.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> f64 {
        f64::from(self.advance()) / STATE_SPAN
    }

    /// Next value in `[0, 1)` as an exact fixed-point fraction.
    ///
    /// Draws from the same sequence as [`next`](Self::next); the 32 state bits
    /// become the 32 fractional bits of the result.
    pub fn next_fixed(&mut self) -> Fixed {
        Fixed::from_bits(i64::from(self.advance()))
    }

    /// Next value in `[0, 1)` narrowed to `f32` for simulation use.
    pub fn next_f32(&mut self) -> f32 {
        self.next() as f32
    }

    /// Uniform value in `[min, max)`.
    pub fn next_range_f32(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Uniform index in `[0, bound)`. Returns 0 when `bound` is 0.
    pub fn next_below(&mut self, bound: usize) -> usize {
        if bound == 0 {
            return 0;
        }
        let pick = (self.next() * bound as f64) as usize;
        pick.min(bound - 1)
    }

    /// Returns `true` with the given probability.
    pub fn chance(&mut self, probability: f64) -> bool {
        self.next() < probability
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_sequence() {
        let mut rng = SeededRng::new(0);
        let _ = rng.next();
        assert_eq!(rng.state(), 1_013_904_223);
        let _ = rng.next();
        assert_eq!(
            rng.state(),
            1_013_904_223u32
                .wrapping_mul(1_664_525)
                .wrapping_add(1_013_904_223)
        );
    }

    #[test]
    fn test_values_in_unit_interval() {
        let mut rng = SeededRng::new(12345);
        for _ in 0..10_000 {
            let v = rng.next();
            assert!((0.0..1.0).contains(&v), "value out of range: {v}");
        }
    }

    #[test]
    fn test_fixed_and_float_draws_agree() {
        let mut a = SeededRng::new(777);
        let mut b = SeededRng::new(777);
        for _ in 0..100 {
            let float = a.next();
            let fixed = b.next_fixed();
            assert_eq!(fixed.to_num::<f64>(), float);
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = SeededRng::new(42);
        let mut b = SeededRng::new(42);
        for _ in 0..1000 {
            assert_eq!(a.next().to_bits(), b.next().to_bits());
        }
    }

    #[test]
    fn test_next_below_stays_in_bounds() {
        let mut rng = SeededRng::new(9);
        assert_eq!(rng.next_below(0), 0);
        for _ in 0..1000 {
            assert!(rng.next_below(3) < 3);
        }
    }
}
