//! Fixed-point math utilities for deterministic world generation.
//!
//! Every host generates the archipelago locally from a shared seed, so the
//! generator must not depend on the platform's floating-point behaviour.
//! Basic float arithmetic is IEEE-exact, but `sin`/`cos` are not: libm
//! implementations differ between targets. Generation therefore runs entirely
//! on [`Fixed`], including square roots and the coastline noise terms.

use fixed::types::I32F32;

/// Fixed-point number type for all generation math.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
/// Range: approximately -2,147,483,648 to 2,147,483,647
/// Precision: approximately 0.00000000023
pub type Fixed = I32F32;

/// π rounded to the nearest I32F32 value.
pub const FIXED_PI: Fixed = Fixed::from_bits(0x0003_243F_6A89);

/// π/2 rounded to the nearest I32F32 value.
pub const FIXED_FRAC_PI_2: Fixed = Fixed::from_bits(0x0001_921F_B544);

/// 2π rounded to the nearest I32F32 value.
pub const FIXED_TAU: Fixed = Fixed::from_bits(0x0006_487E_D511);

/// Builds the fixed-point ratio `num / den` without touching floats.
#[must_use]
pub fn fixed_ratio(num: i32, den: i32) -> Fixed {
    Fixed::from_num(num) / Fixed::from_num(den)
}

/// Rounds towards negative infinity and converts to an integer.
#[must_use]
pub fn fixed_floor(value: Fixed) -> i32 {
    value.floor().to_num::<i32>()
}

/// Computes the square root of a fixed-point number using binary search.
#[must_use]
pub fn fixed_sqrt(value: Fixed) -> Fixed {
    if value <= Fixed::ZERO {
        return Fixed::ZERO;
    }

    let mut low = Fixed::ZERO;
    let mut high = if value > Fixed::ONE { value } else { Fixed::ONE };

    for _ in 0..48 {
        let mid = (low + high) / Fixed::from_num(2);
        let mid_sq = mid.saturating_mul(mid);

        if mid_sq <= value {
            low = mid;
        } else {
            high = mid;
        }
    }

    low
}

/// Sine of an angle in radians, evaluated as a Taylor series in fixed point.
///
/// The argument is reduced to `[-π/2, π/2]` first, where the series truncated
/// after the x¹¹ term is accurate to better than 1e-7.
#[must_use]
pub fn fixed_sin(angle: Fixed) -> Fixed {
    // Reduce into [-π, π).
    let turns = ((angle + FIXED_PI) / FIXED_TAU).floor();
    let mut x = angle - turns * FIXED_TAU;

    // Fold into [-π/2, π/2] using sin(π - x) = sin(x).
    if x > FIXED_FRAC_PI_2 {
        x = FIXED_PI - x;
    } else if x < -FIXED_FRAC_PI_2 {
        x = -FIXED_PI - x;
    }

    let x_sq = x * x;
    let mut term = x;
    let mut sum = x;
    for k in 1..=5 {
        let divisor = Fixed::from_num((2 * k) * (2 * k + 1));
        term = -(term * x_sq) / divisor;
        sum += term;
    }
    sum
}

/// Cosine of an angle in radians, via `cos(x) = sin(x + π/2)`.
#[must_use]
pub fn fixed_cos(angle: Fixed) -> Fixed {
    fixed_sin(angle + FIXED_FRAC_PI_2)
}
