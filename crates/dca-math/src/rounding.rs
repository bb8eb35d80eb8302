//! Rounding with directional control.
//!
//! Editor ranges are reported at a fixed decimal precision; the lower end
//! of a range is rounded up and the upper end rounded down so the rounded
//! range never admits a value the exact range would reject.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};

/// Binary floating point noise below this many decimals is discarded before
/// a directional rounding is applied, so `0.1 + 0.2` rounds up to `0.3`.
const NOISE_DECIMALS: u32 = 12;

/// Rounding direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rounding {
    /// Round half away from zero.
    #[default]
    Nearest,
    /// Round toward positive infinity.
    Up,
    /// Round toward negative infinity.
    Down,
}

impl Rounding {
    fn strategy(self) -> RoundingStrategy {
        match self {
            Rounding::Nearest => RoundingStrategy::MidpointAwayFromZero,
            Rounding::Up => RoundingStrategy::ToPositiveInfinity,
            Rounding::Down => RoundingStrategy::ToNegativeInfinity,
        }
    }
}

/// Rounds `value` to `decimals` decimal places in the given direction.
///
/// Non-finite values are returned unchanged. Values outside the decimal
/// range fall back to scaled `f64` rounding.
///
/// # Example
///
/// ```rust
/// use dca_math::rounding::{round_to, Rounding};
///
/// assert_eq!(round_to(1.231, 2, Rounding::Up), 1.24);
/// assert_eq!(round_to(1.239, 2, Rounding::Down), 1.23);
/// assert_eq!(round_to(364.5, 0, Rounding::Nearest), 365.0);
/// ```
#[must_use]
pub fn round_to(value: f64, decimals: u32, mode: Rounding) -> f64 {
    if !value.is_finite() {
        return value;
    }

    let Some(exact) = Decimal::from_f64(value) else {
        return round_scaled(value, decimals, mode);
    };

    let cleaned = if decimals < NOISE_DECIMALS {
        exact.round_dp_with_strategy(NOISE_DECIMALS, RoundingStrategy::MidpointNearestEven)
    } else {
        exact
    };

    cleaned
        .round_dp_with_strategy(decimals, mode.strategy())
        .to_f64()
        .unwrap_or(value)
}

/// Rounds to a whole number in the given direction.
#[must_use]
pub fn round_whole(value: f64, mode: Rounding) -> f64 {
    round_to(value, 0, mode)
}

fn round_scaled(value: f64, decimals: u32, mode: Rounding) -> f64 {
    let scale = 10f64.powi(decimals.min(300) as i32);
    let scaled = value * scale;
    let rounded = match mode {
        Rounding::Nearest => scaled.round(),
        Rounding::Up => scaled.ceil(),
        Rounding::Down => scaled.floor(),
    };
    rounded / scale
}
