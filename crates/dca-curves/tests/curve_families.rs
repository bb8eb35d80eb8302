//! Cross-family checks of the closed-form decline curves.
//!
//! Every family must agree with itself: the integral with a numerical
//! quadrature of its rates, the inverse integral with the integral, the
//! derivative with a finite difference, and the decline conversions with
//! their inverses.

use approx::assert_relative_eq;
use dca_curves::prelude::*;
use dca_math::solvers::SolverConfig;
use proptest::prelude::*;

// =============================================================================
// HELPERS
// =============================================================================

fn families() -> Vec<(&'static str, Box<dyn DeclineCurve>)> {
    vec![
        ("exponential", Box::new(Exponential::new(1000.0, exponential::d_eff_to_d(0.4), 100.0))),
        ("hyperbolic", Box::new(Hyperbolic::new(1000.0, arps::d_eff_to_d(0.6, 1.3), 0.7, 100.0))),
        ("harmonic", Box::new(Hyperbolic::new(1000.0, arps::d_eff_to_d(0.6, 1.0), 1.0, 100.0))),
        ("linear", Box::new(Linear::new(1000.0, -0.5, 100.0))),
        ("flat", Box::new(Flat::new(250.0))),
        (
            "modified_arps",
            Box::new(ModifiedArps::new(1000.0, arps::d_eff_to_d(0.7, 1.2), 1.2, 100.0, 0.1)),
        ),
    ]
}

fn simpson(curve: &dyn DeclineCurve, left: f64, right: f64, n: u32) -> f64 {
    let h = (right - left) / f64::from(n);
    let inner: f64 = (1..n)
        .map(|i| {
            let weight = if i % 2 == 0 { 2.0 } else { 4.0 };
            weight * curve.rate(left + f64::from(i) * h)
        })
        .sum();
    h / 3.0 * (curve.rate(left) + inner + curve.rate(right))
}

// =============================================================================
// PER-FAMILY CONSISTENCY
// =============================================================================

#[test]
fn integral_matches_quadrature() {
    for (name, curve) in families() {
        let exact = curve.integral(100.0, 1500.0);
        let numeric = simpson(curve.as_ref(), 100.0, 1500.0, 20_000);
        assert_relative_eq!(exact, numeric, max_relative = 1e-6);
        assert!(exact > 0.0, "{name}");
    }
}

#[test]
fn inverse_integral_recovers_index() {
    for (name, curve) in families() {
        for right in [150.0, 700.0, 1500.0] {
            let volume = curve.integral(120.0, right);
            let t = curve
                .inverse_integral(volume, 120.0)
                .unwrap_or_else(|| panic!("{name}: no inverse at {right}"));
            assert_relative_eq!(t, right, max_relative = 1e-9);
        }
        assert_eq!(curve.inverse_integral(0.0, 300.0), Some(300.0), "{name}");
    }
}

#[test]
fn derivative_matches_finite_difference() {
    let h = 1e-4;
    for (_, curve) in families() {
        for t in [150.0, 800.0, 1400.0] {
            let fd = (curve.rate(t + h) - curve.rate(t - h)) / (2.0 * h);
            assert_relative_eq!(curve.derivative(t), fd, epsilon = 1e-9, max_relative = 1e-5);
        }
    }
}

#[test]
fn time_to_rate_inverts_rate() {
    for (name, curve) in families() {
        if name == "flat" {
            continue;
        }
        for t in [200.0, 900.0] {
            let q = curve.rate(t);
            assert_relative_eq!(curve.time_to_rate(q).unwrap(), t, max_relative = 1e-9);
        }
    }
}

// =============================================================================
// CONVERSIONS AND SOLVERS
// =============================================================================

proptest! {
    #[test]
    fn decline_conversions_round_trip(d_eff in 0.01..0.9999_f64, b in 0.05..5.0_f64) {
        let exp = exponential::d_to_d_eff(exponential::d_eff_to_d(d_eff));
        prop_assert!((exp - d_eff).abs() < 1e-9);

        let hyp = arps::d_to_d_eff(arps::d_eff_to_d(d_eff, b), b);
        prop_assert!((hyp - d_eff).abs() < 1e-9);
    }

    #[test]
    fn boundary_solvers_agree(q_start in 10.0..1e5_f64, d_eff in 0.05..0.95_f64, b in 0.1..2.0_f64, dt in 10.0..5000.0_f64) {
        let d = arps::d_eff_to_d(d_eff, b);
        let q_end = arps::q_end_from_start(q_start, d, b, 0.0, dt);
        let fitted = arps::d_from_rates(q_start, q_end, b, 0.0, dt).unwrap();
        prop_assert!((fitted - d).abs() <= 1e-8 * d);

        let back = arps::q_start_from_end(q_end, d, b, 0.0, dt);
        prop_assert!((back - q_start).abs() <= 1e-9 * q_start);
    }
}

#[test]
fn modified_arps_get_d_reproduces_curve() {
    let (b, target) = (1.2, 0.1);
    let d = arps::d_eff_to_d(0.7, b);
    let curve = ModifiedArps::new(1000.0, d, b, 0.0, target);
    assert!(curve.sw_idx() < 5000.0);

    let q_end = curve.rate(5000.0);
    let solved = modified_arps::get_d(1000.0, q_end, 0.0, 5000.0, b, target, &SolverConfig::default()).unwrap();
    assert_relative_eq!(solved, d, max_relative = 1e-8);
}
