//! Core trait for decline curves.
//!
//! This module defines the [`DeclineCurve`] trait that every curve family
//! satisfies. A curve is anchored at a start index with a start rate and
//! is evaluated on real-valued day indices.

/// The core trait for decline curves.
///
/// # Required Methods
///
/// - [`rate`](DeclineCurve::rate): production rate at a day index
/// - [`derivative`](DeclineCurve::derivative): `dq/dt` at a day index
/// - [`integral`](DeclineCurve::integral): cumulative volume over a window
/// - [`inverse_integral`](DeclineCurve::inverse_integral): the index at
///   which a cumulative volume is reached
/// - [`time_to_rate`](DeclineCurve::time_to_rate): the index at which the
///   curve reaches a rate
///
/// # Derived Methods
///
/// [`predict`](DeclineCurve::predict) and
/// [`first_derivative`](DeclineCurve::first_derivative) map the pointwise
/// methods over a slice of indices.
pub trait DeclineCurve {
    /// Returns the rate at day index `t`.
    fn rate(&self, t: f64) -> f64;

    /// Returns the first derivative of the rate at day index `t`.
    fn derivative(&self, t: f64) -> f64;

    /// Returns the cumulative volume produced over `[left, right]`.
    fn integral(&self, left: f64, right: f64) -> f64;

    /// Returns the index at which `volume` has been produced starting from
    /// `left`, or `None` if the curve never produces that much.
    fn inverse_integral(&self, volume: f64, left: f64) -> Option<f64>;

    /// Returns the index at which the curve's rate equals `q`, or `None` if
    /// it never does. The index may precede the curve's anchor.
    fn time_to_rate(&self, q: f64) -> Option<f64>;

    /// Evaluates the rate at each index.
    fn predict(&self, indices: &[f64]) -> Vec<f64> {
        indices.iter().map(|&t| self.rate(t)).collect()
    }

    /// Evaluates the derivative at each index.
    fn first_derivative(&self, indices: &[f64]) -> Vec<f64> {
        indices.iter().map(|&t| self.derivative(t)).collect()
    }
}
