//! Modified Arps decline: hyperbolic until the instantaneous decline falls
//! to a target, exponential afterwards.
//!
//! The hyperbolic phase is anchored at `(start, q_start)` with initial
//! decline `D` and exponent `b`. Its instantaneous decline `D/(1 + b·D·Δt)`
//! reaches the exponential equivalent of `target_D_eff_sw` at the switch
//! index; from there the curve is exponential, anchored at `(sw_idx, q_sw)`
//! with decline `D_exp`.
//!
//! Two degenerate cases:
//!
//! - `target_D_eff_sw == 0`: no switch, pushed [`NO_SWITCH_DAYS`] out.
//! - target decline ≥ `D`: the curve is already past the target and
//!   switches at `start` with `D_exp = D`.

use dca_math::solvers::{bisection, SolverConfig};

use crate::arps::{self, Hyperbolic};
use crate::constants::NO_SWITCH_DAYS;
use crate::exponential::{self, Exponential};
use crate::traits::DeclineCurve;

/// Where and how a modified Arps curve switches to exponential decline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwitchPoint {
    /// Day index of the switch.
    pub sw_idx: f64,
    /// Rate at the switch.
    pub q_sw: f64,
    /// Nominal decline of the exponential phase.
    pub d_exp: f64,
    /// Effective annual decline of the exponential phase.
    pub d_exp_eff: f64,
    /// Effective decline actually achieved at the switch.
    pub realized_d_eff_sw: f64,
}

/// Computes the switch point of a modified Arps curve.
#[must_use]
pub fn switch_point(start: f64, q_start: f64, d: f64, b: f64, target_d_eff_sw: f64) -> SwitchPoint {
    let (offset, d_exp) = if target_d_eff_sw <= 0.0 {
        (NO_SWITCH_DAYS, arps::decline_at(d, b, NO_SWITCH_DAYS))
    } else {
        let d_target = exponential::d_eff_to_d(target_d_eff_sw);
        if d_target >= d {
            (0.0, d)
        } else {
            ((d / d_target - 1.0) / (b * d), d_target)
        }
    };

    let sw_idx = start + offset;
    let q_sw = arps::q_end_from_start(q_start, d, b, start, sw_idx);
    let d_exp_eff = exponential::d_to_d_eff(d_exp);

    SwitchPoint {
        sw_idx,
        q_sw,
        d_exp,
        d_exp_eff,
        realized_d_eff_sw: d_exp_eff,
    }
}

/// A modified Arps curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModifiedArps {
    hyperbolic: Hyperbolic,
    exponential: Exponential,
    sw_idx: f64,
}

impl ModifiedArps {
    /// Creates a curve from its hyperbolic parameters and target switch decline.
    #[must_use]
    pub fn new(q_start: f64, d: f64, b: f64, start: f64, target_d_eff_sw: f64) -> Self {
        let sw = switch_point(start, q_start, d, b, target_d_eff_sw);
        Self::from_switch(q_start, d, b, start, &sw)
    }

    /// Creates a curve from an already computed switch point.
    #[must_use]
    pub fn from_switch(q_start: f64, d: f64, b: f64, start: f64, sw: &SwitchPoint) -> Self {
        Self {
            hyperbolic: Hyperbolic::new(q_start, d, b, start),
            exponential: Exponential::new(sw.q_sw, sw.d_exp, sw.sw_idx),
            sw_idx: sw.sw_idx,
        }
    }

    /// The hyperbolic phase.
    #[must_use]
    pub fn hyperbolic(&self) -> &Hyperbolic {
        &self.hyperbolic
    }

    /// The exponential phase.
    #[must_use]
    pub fn exponential(&self) -> &Exponential {
        &self.exponential
    }

    /// Day index of the switch.
    #[must_use]
    pub fn sw_idx(&self) -> f64 {
        self.sw_idx
    }

    /// Ratio `q(start + dt) / q_start`, independent of `q_start`.
    #[must_use]
    pub fn rate_ratio(&self, dt: f64) -> f64 {
        if self.hyperbolic.q_start <= 0.0 {
            return 0.0;
        }
        self.rate(self.hyperbolic.start + dt) / self.hyperbolic.q_start
    }
}

impl DeclineCurve for ModifiedArps {
    fn rate(&self, t: f64) -> f64 {
        if t < self.sw_idx {
            self.hyperbolic.rate(t)
        } else {
            self.exponential.rate(t)
        }
    }

    fn derivative(&self, t: f64) -> f64 {
        if t < self.sw_idx {
            self.hyperbolic.derivative(t)
        } else {
            self.exponential.derivative(t)
        }
    }

    fn integral(&self, left: f64, right: f64) -> f64 {
        if right <= self.sw_idx {
            self.hyperbolic.integral(left, right)
        } else if left >= self.sw_idx {
            self.exponential.integral(left, right)
        } else {
            self.hyperbolic.integral(left, self.sw_idx)
                + self.exponential.integral(self.sw_idx, right)
        }
    }

    fn inverse_integral(&self, volume: f64, left: f64) -> Option<f64> {
        if left >= self.sw_idx {
            return self.exponential.inverse_integral(volume, left);
        }
        let hyperbolic_volume = self.hyperbolic.integral(left, self.sw_idx);
        if volume <= hyperbolic_volume {
            self.hyperbolic.inverse_integral(volume, left)
        } else {
            self.exponential
                .inverse_integral(volume - hyperbolic_volume, self.sw_idx)
        }
    }

    fn time_to_rate(&self, q: f64) -> Option<f64> {
        if q >= self.exponential.q_start {
            self.hyperbolic.time_to_rate(q)
        } else {
            self.exponential.time_to_rate(q)
        }
    }
}

/// Solves for the hyperbolic-phase decline `D` of a modified Arps curve
/// through `(start_idx, q_start)` and `(end_idx, q_end)` that honours the
/// target switch decline.
///
/// 1. If the pure Arps fit still declines at least as fast as the target at
///    the end of the window, no switch happens inside it and that fit is
///    returned.
/// 2. If the pure exponential fit is not steeper than the target, the
///    points are flatter than the target allows and there is no solution.
/// 3. Otherwise the switch offset `t1` is bracketed in
///    `[0, min(1/(b·D_t), Δt)]` and solved by bisection; `D` follows from
///    `D/(1 + b·D·t1) = D_t`.
///
/// Returns `None` when no solution exists or the bisection fails.
#[must_use]
pub fn get_d(
    q_start: f64,
    q_end: f64,
    start_idx: f64,
    end_idx: f64,
    b: f64,
    target_d_eff_sw: f64,
    config: &SolverConfig,
) -> Option<f64> {
    let dt = end_idx - start_idx;
    if dt <= 0.0 || q_end <= 0.0 || q_end >= q_start || b <= 0.0 {
        return None;
    }

    let d_arps = arps::d_from_rates(q_start, q_end, b, start_idx, end_idx)?;
    if target_d_eff_sw <= 0.0 {
        return Some(d_arps);
    }

    let d_target = exponential::d_eff_to_d(target_d_eff_sw);
    if arps::decline_at(d_arps, b, dt) >= d_target {
        return Some(d_arps);
    }

    let d_exp = exponential::d_from_rates(q_start, q_end, start_idx, end_idx)?;
    if d_exp <= d_target {
        log::debug!(
            "modified arps: exponential decline {d_exp:.6e} not above target {d_target:.6e}, no solution"
        );
        return None;
    }

    let singular = 1.0 / (b * d_target);
    let upper = if singular <= dt {
        singular * (1.0 - 1e-12)
    } else {
        dt
    };
    let ln_ratio = (q_start / q_end).ln();
    let consistency = |t1: f64| {
        -(1.0 - b * d_target * t1).ln() / b + d_target * (dt - t1) - ln_ratio
    };

    match bisection(consistency, 0.0, upper, config) {
        Ok(result) => {
            let d = d_target / (1.0 - b * d_target * result.root);
            d.is_finite().then_some(d)
        }
        Err(err) => {
            log::debug!("modified arps: switch time bisection failed: {err}");
            None
        }
    }
}

/// Nominal hyperbolic decline implied by a rate and its derivative at the
/// curve's start.
#[must_use]
pub fn d_from_derivative(q: f64, derivative: f64) -> Option<f64> {
    arps::d_from_derivative(q, derivative)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn curve() -> ModifiedArps {
        ModifiedArps::new(1000.0, arps::d_eff_to_d(0.7, 1.2), 1.2, 0.0, 0.08)
    }

    #[test]
    fn test_switch_decline_matches_target() {
        let c = curve();
        let at_switch = c.hyperbolic().decline_at(c.sw_idx());
        assert_relative_eq!(at_switch, exponential::d_eff_to_d(0.08), max_relative = 1e-12);
        assert!(c.sw_idx() > 0.0);
    }

    #[test]
    fn test_rate_is_continuous_at_switch() {
        let c = curve();
        let sw = c.sw_idx();
        let from_hyperbolic = c.hyperbolic().rate(sw);
        let from_exponential = c.exponential().rate(sw);
        assert_relative_eq!(from_hyperbolic, from_exponential, max_relative = 1e-12);
        assert_relative_eq!(c.derivative(sw - 1e-9), c.derivative(sw), max_relative = 1e-6);
    }

    #[test]
    fn test_immediate_switch() {
        // Target of 95% effective exponential is steeper than the Arps decline
        let d = arps::d_eff_to_d(0.3, 1.2);
        let sw = switch_point(100.0, 500.0, d, 1.2, 0.95);
        assert_eq!(sw.sw_idx, 100.0);
        assert_eq!(sw.d_exp, d);
        assert_relative_eq!(sw.q_sw, 500.0);
    }

    #[test]
    fn test_no_switch_target() {
        let d = arps::d_eff_to_d(0.5, 1.5);
        let sw = switch_point(0.0, 100.0, d, 1.5, 0.0);
        assert_eq!(sw.sw_idx, NO_SWITCH_DAYS);
        assert!(sw.realized_d_eff_sw < 0.01);
    }

    #[test]
    fn test_piecewise_integral_straddling_switch() {
        let c = curve();
        let sw = c.sw_idx();
        let (left, right) = (sw - 200.0, sw + 400.0);
        let pieces = c.hyperbolic().integral(left, sw) + c.exponential().integral(sw, right);
        assert_relative_eq!(c.integral(left, right), pieces);

        let steps = 200_000u32;
        let h = (right - left) / f64::from(steps);
        let numeric: f64 = (0..steps)
            .map(|i| c.rate(left + (f64::from(i) + 0.5) * h) * h)
            .sum();
        assert_relative_eq!(c.integral(left, right), numeric, max_relative = 1e-6);
    }

    #[test]
    fn test_inverse_integral_both_phases() {
        let c = curve();
        let sw = c.sw_idx();
        for right in [sw * 0.5, sw + 1000.0] {
            let volume = c.integral(10.0, right);
            assert_relative_eq!(c.inverse_integral(volume, 10.0).unwrap(), right, max_relative = 1e-8);
        }
        let volume = c.integral(sw + 10.0, sw + 500.0);
        assert_relative_eq!(c.inverse_integral(volume, sw + 10.0).unwrap(), sw + 500.0, max_relative = 1e-8);
    }

    #[test]
    fn test_time_to_rate_both_phases() {
        let c = curve();
        let q_sw = c.exponential().q_start;
        for q in [q_sw * 1.5, q_sw * 0.5] {
            let t = c.time_to_rate(q).unwrap();
            assert_relative_eq!(c.rate(t), q, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_get_d_without_switch_in_window() {
        let b = 1.1;
        let d = arps::d_eff_to_d(0.6, b);
        let q_end = arps::q_end_from_start(1000.0, d, b, 0.0, 200.0);
        let solved = get_d(1000.0, q_end, 0.0, 200.0, b, 0.06, &SolverConfig::default()).unwrap();
        assert_relative_eq!(solved, d, max_relative = 1e-10);
    }

    #[test]
    fn test_get_d_with_switch_in_window() {
        let b = 1.4;
        let d = arps::d_eff_to_d(0.75, b);
        let target = 0.12;
        let c = ModifiedArps::new(1000.0, d, b, 0.0, target);
        let end = c.sw_idx() + 2000.0;
        let q_end = c.rate(end);

        let solved = get_d(1000.0, q_end, 0.0, end, b, target, &SolverConfig::default()).unwrap();
        assert_relative_eq!(solved, d, max_relative = 1e-6);
    }

    #[test]
    fn test_get_d_no_solution_when_flatter_than_target() {
        // 1000 -> 900 over ten years is ~1% per year, flatter than an 8% target
        let result = get_d(1000.0, 900.0, 0.0, 3652.5, 1.2, 0.08, &SolverConfig::default());
        assert!(result.is_none());
    }

    #[test]
    fn test_get_d_rejects_degenerate_input() {
        let config = SolverConfig::default();
        assert!(get_d(100.0, 100.0, 0.0, 10.0, 1.0, 0.08, &config).is_none());
        assert!(get_d(100.0, 50.0, 10.0, 10.0, 1.0, 0.08, &config).is_none());
    }

    #[test]
    fn test_rate_ratio_is_scale_free() {
        let d = arps::d_eff_to_d(0.7, 1.2);
        let small = ModifiedArps::new(10.0, d, 1.2, 0.0, 0.08);
        let large = ModifiedArps::new(10_000.0, d, 1.2, 0.0, 0.08);
        assert_relative_eq!(small.rate_ratio(3000.0), large.rate_ratio(3000.0), max_relative = 1e-12);
    }
}
