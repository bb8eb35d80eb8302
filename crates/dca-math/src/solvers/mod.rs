//! Root-finding algorithms.
//!
//! Decline curve inverse problems (for example locating the switch time of
//! a modified Arps curve) are monotone on a known interval, so a bracketing
//! method is all the engine needs:
//!
//! - [`bisection`]: Simple and reliable bracketing method
//!
//! # Convergence
//!
//! The bisection stops when `|f(x)| < tolerance`, when the bracket is
//! narrower than the tolerance, or when the iteration budget is spent. The
//! last case is not an error: the midpoint is returned as a best estimate
//! with [`SolverResult::converged`] set to `false`.
//!
//! # Example
//!
//! ```rust
//! use dca_math::solvers::{bisection, SolverConfig};
//!
//! // Time for an exponential decline with D = 0.001/day to halve
//! let f = |t: f64| (-0.001 * t).exp() - 0.5;
//!
//! let result = bisection(f, 0.0, 2000.0, &SolverConfig::default()).unwrap();
//! assert!((result.root - 2.0_f64.ln() / 0.001).abs() < 1e-6);
//! ```

mod bisection;

pub use bisection::bisection;

/// Default tolerance for root-finding algorithms.
pub const DEFAULT_TOLERANCE: f64 = 1e-10;

/// Default maximum iterations for root-finding algorithms.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Configuration for root-finding algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Tolerance for convergence.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Result of a root-finding iteration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverResult {
    /// The root found (or best estimate).
    pub root: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Final residual (function value at root).
    pub residual: f64,
    /// Whether the tolerance was met before the iteration budget ran out.
    pub converged: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solver_config() {
        let config = SolverConfig::default()
            .with_tolerance(1e-8)
            .with_max_iterations(50);

        assert!((config.tolerance - 1e-8).abs() < f64::EPSILON);
        assert_eq!(config.max_iterations, 50);
    }

    #[test]
    fn test_hyperbolic_cumulative_time() {
        // Time for an Arps curve (qi = 1000, D = 0.002, b = 0.8) to produce 200k
        let (qi, d, b) = (1000.0_f64, 0.002_f64, 0.8_f64);
        let cum = |t: f64| qi / ((b - 1.0) * d) * ((1.0 + b * d * t).powf(1.0 - 1.0 / b) - 1.0);
        let f = |t: f64| cum(t) - 200_000.0;

        let result = bisection(f, 0.0, 10_000.0, &SolverConfig::default().with_tolerance(1e-6))
            .unwrap();

        assert!(f(result.root).abs() < 1e-3);
        assert!(result.root > 200.0);
    }
}
