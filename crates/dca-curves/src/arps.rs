//! Arps hyperbolic decline.
//!
//! `q(t) = q_start · (1 + b·D·(t − start))^(−1/b)` with nominal initial
//! decline `D` per day and hyperbolic exponent `b`. The effective annual
//! decline is the secant form `D_eff = 1 − (1 + 365.25·b·D)^(−1/b)`.
//!
//! The general cumulative formula has a removable singularity at `b = 1`;
//! within [`B_UNITY_TOLERANCE`] of it the logarithmic limit is used instead.

use crate::constants::{B_UNITY_TOLERANCE, DAYS_PER_YEAR, D_ZERO_TOLERANCE};
use crate::traits::DeclineCurve;

/// A hyperbolic (Arps) decline anchored at `(start, q_start)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hyperbolic {
    /// Rate at the anchor.
    pub q_start: f64,
    /// Nominal initial decline per day.
    pub d: f64,
    /// Hyperbolic exponent.
    pub b: f64,
    /// Anchor day index.
    pub start: f64,
}

impl Hyperbolic {
    /// Creates a new hyperbolic curve.
    #[must_use]
    pub fn new(q_start: f64, d: f64, b: f64, start: f64) -> Self {
        Self {
            q_start,
            d,
            b,
            start,
        }
    }

    fn base(&self, t: f64) -> f64 {
        1.0 + self.b * self.d * (t - self.start)
    }

    fn is_harmonic(&self) -> bool {
        (self.b - 1.0).abs() < B_UNITY_TOLERANCE
    }

    /// Instantaneous nominal decline `D / (1 + b·D·Δt)` at day index `t`.
    #[must_use]
    pub fn decline_at(&self, t: f64) -> f64 {
        decline_at(self.d, self.b, t - self.start)
    }
}

impl DeclineCurve for Hyperbolic {
    fn rate(&self, t: f64) -> f64 {
        self.q_start * self.base(t).powf(-1.0 / self.b)
    }

    fn derivative(&self, t: f64) -> f64 {
        -self.d * self.q_start * self.base(t).powf(-1.0 / self.b - 1.0)
    }

    fn integral(&self, left: f64, right: f64) -> f64 {
        if self.d.abs() < D_ZERO_TOLERANCE {
            return self.q_start * (right - left);
        }
        if self.is_harmonic() {
            return self.q_start / self.d * (self.base(right) / self.base(left)).ln();
        }
        let exponent = 1.0 - 1.0 / self.b;
        self.q_start / ((self.b - 1.0) * self.d)
            * (self.base(right).powf(exponent) - self.base(left).powf(exponent))
    }

    fn inverse_integral(&self, volume: f64, left: f64) -> Option<f64> {
        if volume == 0.0 {
            return Some(left);
        }
        if volume < 0.0 || self.q_start <= 0.0 {
            return None;
        }
        if self.d.abs() < D_ZERO_TOLERANCE {
            return Some(left + volume / self.q_start);
        }
        let bd = self.b * self.d;
        if self.is_harmonic() {
            let base = self.base(left) * (volume * self.d / self.q_start).exp();
            return base.is_finite().then(|| self.start + (base - 1.0) / bd);
        }
        let exponent = (self.b - 1.0) / self.b;
        let x = self.base(left).powf(exponent) + volume * (self.b - 1.0) * self.d / self.q_start;
        if x <= 0.0 {
            return None;
        }
        let base = x.powf(1.0 / exponent);
        base.is_finite().then(|| self.start + (base - 1.0) / bd)
    }

    fn time_to_rate(&self, q: f64) -> Option<f64> {
        if q <= 0.0 || self.q_start <= 0.0 || self.d.abs() < D_ZERO_TOLERANCE {
            return None;
        }
        Some(self.start + ((self.q_start / q).powf(self.b) - 1.0) / (self.b * self.d))
    }
}

/// Instantaneous nominal decline after `dt` days.
#[must_use]
pub fn decline_at(d: f64, b: f64, dt: f64) -> f64 {
    d / (1.0 + b * d * dt)
}

/// Converts a nominal daily decline to the secant effective annual decline.
#[must_use]
pub fn d_to_d_eff(d: f64, b: f64) -> f64 {
    1.0 - (1.0 + DAYS_PER_YEAR * b * d).powf(-1.0 / b)
}

/// Converts a secant effective annual decline to the nominal daily decline.
#[must_use]
pub fn d_eff_to_d(d_eff: f64, b: f64) -> f64 {
    ((1.0 - d_eff).powf(-b) - 1.0) / (DAYS_PER_YEAR * b)
}

/// Rate at `end` of a curve starting at `q_start` at `start`.
#[must_use]
pub fn q_end_from_start(q_start: f64, d: f64, b: f64, start: f64, end: f64) -> f64 {
    q_start * (1.0 + b * d * (end - start)).powf(-1.0 / b)
}

/// Rate at `start` of a curve ending at `q_end` at `end`.
#[must_use]
pub fn q_start_from_end(q_end: f64, d: f64, b: f64, start: f64, end: f64) -> f64 {
    q_end * (1.0 + b * d * (end - start)).powf(1.0 / b)
}

/// Nominal initial decline of the curve through both points.
///
/// `None` for a zero-length window or non-positive rates.
#[must_use]
pub fn d_from_rates(q_start: f64, q_end: f64, b: f64, start: f64, end: f64) -> Option<f64> {
    let dt = end - start;
    if dt <= 0.0 || q_start <= 0.0 || q_end <= 0.0 {
        return None;
    }
    Some(((q_start / q_end).powf(b) - 1.0) / (b * dt))
}

/// Index at which a curve starting at `(start, q_start)` reaches `q_end`.
#[must_use]
pub fn end_idx_from_rates(q_start: f64, q_end: f64, d: f64, b: f64, start: f64) -> Option<f64> {
    Hyperbolic::new(q_start, d, b, start).time_to_rate(q_end)
}

/// Nominal initial decline implied by a rate and its derivative.
#[must_use]
pub fn d_from_derivative(q: f64, derivative: f64) -> Option<f64> {
    (q > 0.0).then(|| -derivative / q)
}
