//! Linear decline.
//!
//! `q(t) = k · (t − start) + q_start`. Instead of a nominal decline the
//! family carries a slope `k` (rate per day); its effective annual form is
//! the fraction of the starting rate lost per year, `−365.25·k / q_start`.

use crate::constants::{DAYS_PER_YEAR, D_ZERO_TOLERANCE};
use crate::traits::DeclineCurve;

/// A linear rate curve anchored at `(start, q_start)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Linear {
    /// Rate at the anchor.
    pub q_start: f64,
    /// Slope in rate units per day.
    pub k: f64,
    /// Anchor day index.
    pub start: f64,
}

impl Linear {
    /// Creates a new linear curve.
    #[must_use]
    pub fn new(q_start: f64, k: f64, start: f64) -> Self {
        Self { q_start, k, start }
    }
}

impl DeclineCurve for Linear {
    fn rate(&self, t: f64) -> f64 {
        self.k * (t - self.start) + self.q_start
    }

    fn derivative(&self, _t: f64) -> f64 {
        self.k
    }

    fn integral(&self, left: f64, right: f64) -> f64 {
        let (l, r) = (left - self.start, right - self.start);
        self.q_start * (r - l) + 0.5 * self.k * (r * r - l * l)
    }

    fn inverse_integral(&self, volume: f64, left: f64) -> Option<f64> {
        if volume == 0.0 {
            return Some(left);
        }
        if volume < 0.0 {
            return None;
        }
        let l = left - self.start;
        // Solve k/2·x² + q·x − c = 0 for x = right − start
        let c = volume + self.q_start * l + 0.5 * self.k * l * l;
        if self.k.abs() < D_ZERO_TOLERANCE {
            return (self.q_start > 0.0).then(|| self.start + c / self.q_start);
        }
        let disc = self.q_start * self.q_start + 2.0 * self.k * c;
        if disc < 0.0 {
            return None;
        }
        Some(self.start + (disc.sqrt() - self.q_start) / self.k)
    }

    fn time_to_rate(&self, q: f64) -> Option<f64> {
        if self.k.abs() < D_ZERO_TOLERANCE {
            return None;
        }
        Some(self.start + (q - self.q_start) / self.k)
    }
}

/// Converts a slope to the annual fraction of `q_start` lost.
#[must_use]
pub fn k_to_d_eff(k: f64, q_start: f64) -> f64 {
    -k * DAYS_PER_YEAR / q_start
}

/// Converts an annual fraction of `q_start` lost to a slope.
#[must_use]
pub fn d_eff_to_k(d_eff: f64, q_start: f64) -> f64 {
    -d_eff * q_start / DAYS_PER_YEAR
}

/// Slope of the line through `(start, q_start)` and `(end, q_end)`.
#[must_use]
pub fn k_from_rates(q_start: f64, q_end: f64, start: f64, end: f64) -> Option<f64> {
    let dt = end - start;
    (dt > 0.0).then(|| (q_end - q_start) / dt)
}

/// Index at which the line from `(start, q_start)` reaches `q_end`.
#[must_use]
pub fn end_idx_from_rates(q_start: f64, q_end: f64, k: f64, start: f64) -> Option<f64> {
    Linear::new(q_start, k, start).time_to_rate(q_end)
}

/// Rate at `start` of a line ending at `q_end` at `end`.
#[must_use]
pub fn q_start_from_end(q_end: f64, k: f64, start: f64, end: f64) -> f64 {
    q_end - k * (end - start)
}
