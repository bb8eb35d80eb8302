//! Exponential decline.
//!
//! `q(t) = q_start · exp(−D · (t − start))` with nominal decline `D` per day.
//! The effective annual decline is `D_eff = 1 − exp(−365.25 · D)`.

use crate::constants::{DAYS_PER_YEAR, D_ZERO_TOLERANCE};
use crate::traits::DeclineCurve;

/// An exponential decline anchored at `(start, q_start)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Exponential {
    /// Rate at the anchor.
    pub q_start: f64,
    /// Nominal decline per day.
    pub d: f64,
    /// Anchor day index.
    pub start: f64,
}

impl Exponential {
    /// Creates a new exponential curve.
    #[must_use]
    pub fn new(q_start: f64, d: f64, start: f64) -> Self {
        Self { q_start, d, start }
    }

    fn is_flat(&self) -> bool {
        self.d.abs() < D_ZERO_TOLERANCE
    }
}

impl DeclineCurve for Exponential {
    fn rate(&self, t: f64) -> f64 {
        self.q_start * (-self.d * (t - self.start)).exp()
    }

    fn derivative(&self, t: f64) -> f64 {
        -self.d * self.rate(t)
    }

    fn integral(&self, left: f64, right: f64) -> f64 {
        if self.is_flat() {
            return self.q_start * (right - left);
        }
        let e_left = (-self.d * (left - self.start)).exp();
        let e_right = (-self.d * (right - self.start)).exp();
        self.q_start / self.d * (e_left - e_right)
    }

    fn inverse_integral(&self, volume: f64, left: f64) -> Option<f64> {
        if volume == 0.0 {
            return Some(left);
        }
        if volume < 0.0 || self.q_start <= 0.0 {
            return None;
        }
        if self.is_flat() {
            return Some(left + volume / self.q_start);
        }
        let x = (-self.d * (left - self.start)).exp() - volume * self.d / self.q_start;
        if x <= 0.0 {
            return None;
        }
        Some(self.start - x.ln() / self.d)
    }

    fn time_to_rate(&self, q: f64) -> Option<f64> {
        if q <= 0.0 || self.q_start <= 0.0 {
            return None;
        }
        if self.is_flat() {
            return (q == self.q_start).then_some(self.start);
        }
        Some(self.start + (self.q_start / q).ln() / self.d)
    }
}

/// Converts a nominal daily decline to the effective annual decline.
#[must_use]
pub fn d_to_d_eff(d: f64) -> f64 {
    1.0 - (-d * DAYS_PER_YEAR).exp()
}

/// Converts an effective annual decline to the nominal daily decline.
#[must_use]
pub fn d_eff_to_d(d_eff: f64) -> f64 {
    -(1.0 - d_eff).ln() / DAYS_PER_YEAR
}

/// Rate at `end` of a curve starting at `q_start` at `start`.
#[must_use]
pub fn q_end_from_start(q_start: f64, d: f64, start: f64, end: f64) -> f64 {
    q_start * (-d * (end - start)).exp()
}

/// Rate at `start` of a curve ending at `q_end` at `end`.
#[must_use]
pub fn q_start_from_end(q_end: f64, d: f64, start: f64, end: f64) -> f64 {
    q_end * (d * (end - start)).exp()
}

/// Nominal decline of the curve through `(start, q_start)` and `(end, q_end)`.
///
/// `None` for a zero-length window or non-positive rates.
#[must_use]
pub fn d_from_rates(q_start: f64, q_end: f64, start: f64, end: f64) -> Option<f64> {
    let dt = end - start;
    if dt <= 0.0 || q_start <= 0.0 || q_end <= 0.0 {
        return None;
    }
    Some((q_start / q_end).ln() / dt)
}

/// Index at which a curve starting at `(start, q_start)` reaches `q_end`.
///
/// `None` for a zero decline or non-positive rates.
#[must_use]
pub fn end_idx_from_rates(q_start: f64, q_end: f64, d: f64, start: f64) -> Option<f64> {
    if d.abs() < D_ZERO_TOLERANCE || q_start <= 0.0 || q_end <= 0.0 {
        return None;
    }
    Some(start + (q_start / q_end).ln() / d)
}

/// Nominal decline implied by a rate and its derivative at the same point.
#[must_use]
pub fn d_from_derivative(q: f64, derivative: f64) -> Option<f64> {
    (q > 0.0).then(|| -derivative / q)
}
