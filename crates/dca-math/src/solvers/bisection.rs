//! Bisection root-finding algorithm.

use crate::error::{MathError, MathResult};
use crate::solvers::{SolverConfig, SolverResult};

/// Bisection root-finding algorithm.
///
/// A simple and reliable bracketing method that works by repeatedly
/// halving the interval and selecting the subinterval containing the root.
///
/// Requires: `f(a) * f(b) <= 0` (opposite signs at endpoints). An endpoint
/// that is already a root within tolerance is returned without iterating.
///
/// # Arguments
///
/// * `f` - The function for which to find a root
/// * `a` - Lower bound of the bracket
/// * `b` - Upper bound of the bracket
/// * `config` - Solver configuration
///
/// # Returns
///
/// The root and iteration statistics. Exhausting the iteration budget is
/// not an error; the midpoint of the final bracket is returned with
/// `converged = false`.
///
/// # Errors
///
/// `MathError::InvalidBracket` if both endpoints have the same sign,
/// `MathError::NonFinite` if `f` is NaN or infinite at an endpoint.
///
/// # Example
///
/// ```rust
/// use dca_math::solvers::{bisection, SolverConfig};
///
/// // Find root of x^2 - 2 (i.e., sqrt(2))
/// let f = |x: f64| x * x - 2.0;
///
/// let result = bisection(f, 1.0, 2.0, &SolverConfig::default()).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-9);
/// ```
pub fn bisection<F>(f: F, a: f64, b: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let mut lo = a.min(b);
    let mut hi = a.max(b);

    let mut f_lo = f(lo);
    let f_hi = f(hi);

    if !f_lo.is_finite() {
        return Err(MathError::NonFinite { x: lo, value: f_lo });
    }
    if !f_hi.is_finite() {
        return Err(MathError::NonFinite { x: hi, value: f_hi });
    }

    // Handle case where endpoint is the root
    if f_lo.abs() < config.tolerance {
        return Ok(SolverResult {
            root: lo,
            iterations: 0,
            residual: f_lo,
            converged: true,
        });
    }
    if f_hi.abs() < config.tolerance {
        return Ok(SolverResult {
            root: hi,
            iterations: 0,
            residual: f_hi,
            converged: true,
        });
    }

    // Check that root is bracketed
    if f_lo * f_hi > 0.0 {
        return Err(MathError::InvalidBracket {
            a: lo,
            b: hi,
            fa: f_lo,
            fb: f_hi,
        });
    }

    for iteration in 0..config.max_iterations {
        let mid = (lo + hi) / 2.0;
        let f_mid = f(mid);

        // Check for convergence
        if f_mid.abs() < config.tolerance || (hi - lo) / 2.0 < config.tolerance {
            return Ok(SolverResult {
                root: mid,
                iterations: iteration + 1,
                residual: f_mid,
                converged: true,
            });
        }

        // Update bracket
        if f_mid * f_lo < 0.0 {
            hi = mid;
        } else {
            lo = mid;
            f_lo = f_mid;
        }
    }

    let mid = (lo + hi) / 2.0;
    let residual = f(mid);
    log::debug!(
        "bisection budget of {} iterations spent, best estimate {mid} (residual {residual:.2e})",
        config.max_iterations
    );
    Ok(SolverResult {
        root: mid,
        iterations: config.max_iterations,
        residual,
        converged: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_sqrt_2() {
        let f = |x: f64| x * x - 2.0;

        let result = bisection(f, 1.0, 2.0, &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-9);
        assert!(result.converged);
    }

    #[test]
    fn test_reversed_bracket() {
        let f = |x: f64| x * x - 2.0;

        // Reversed bracket should still work
        let result = bisection(f, 2.0, 1.0, &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-9);
    }

    #[test]
    fn test_invalid_bracket() {
        let f = |x: f64| x * x - 2.0;

        // Both endpoints have same sign
        let result = bisection(f, 2.0, 3.0, &SolverConfig::default());

        assert!(matches!(result, Err(MathError::InvalidBracket { .. })));
    }

    #[test]
    fn test_root_at_endpoint() {
        let f = |x: f64| x - 1.0;

        let result = bisection(f, 0.0, 1.0, &SolverConfig::default()).unwrap();

        assert_eq!(result.root, 1.0);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn test_root_at_endpoint_without_sign_change() {
        // Touches zero at the lower endpoint only
        let f = |x: f64| x * x;

        let result = bisection(f, 0.0, 1.0, &SolverConfig::default()).unwrap();

        assert_eq!(result.root, 0.0);
    }

    #[test]
    fn test_negative_root() {
        let f = |x: f64| x + 1.0;

        let result = bisection(f, -2.0, 0.0, &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root, -1.0, epsilon = 1e-9);
    }

    #[test]
    fn test_budget_exhaustion_returns_estimate() {
        let f = |x: f64| x - std::f64::consts::PI;
        let config = SolverConfig::default()
            .with_tolerance(1e-15)
            .with_max_iterations(10);

        let result = bisection(f, 0.0, 4.0, &config).unwrap();

        assert!(!result.converged);
        assert_eq!(result.iterations, 10);
        assert!((result.root - std::f64::consts::PI).abs() < 4.0 / 1024.0);
    }

    #[test]
    fn test_non_finite_endpoint() {
        let f = |x: f64| (1.0 - x).ln();

        let result = bisection(f, 0.0, 1.0, &SolverConfig::default());

        assert!(matches!(result, Err(MathError::NonFinite { .. })));
    }
}
