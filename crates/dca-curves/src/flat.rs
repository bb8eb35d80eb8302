//! Constant-rate curve, also used for zero-production (shut-in) periods.

use crate::traits::DeclineCurve;

/// A constant rate `c`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Flat {
    /// The constant rate.
    pub c: f64,
}

impl Flat {
    /// Creates a new flat curve.
    #[must_use]
    pub fn new(c: f64) -> Self {
        Self { c }
    }

    /// The all-zero curve.
    #[must_use]
    pub fn zero() -> Self {
        Self { c: 0.0 }
    }
}

impl DeclineCurve for Flat {
    fn rate(&self, _t: f64) -> f64 {
        self.c
    }

    fn derivative(&self, _t: f64) -> f64 {
        0.0
    }

    fn integral(&self, left: f64, right: f64) -> f64 {
        self.c * (right - left)
    }

    fn inverse_integral(&self, volume: f64, left: f64) -> Option<f64> {
        if volume == 0.0 {
            return Some(left);
        }
        (volume > 0.0 && self.c > 0.0).then(|| left + volume / self.c)
    }

    fn time_to_rate(&self, _q: f64) -> Option<f64> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat() {
        let flat = Flat::new(40.0);
        assert_eq!(flat.predict(&[0.0, 10.0]), vec![40.0, 40.0]);
        assert_eq!(flat.integral(0.0, 10.0), 400.0);
        assert_eq!(flat.inverse_integral(400.0, 5.0), Some(15.0));
    }

    #[test]
    fn test_zero_never_reaches_volume() {
        let zero = Flat::zero();
        assert_eq!(zero.integral(0.0, 100.0), 0.0);
        assert_eq!(zero.inverse_integral(1.0, 0.0), None);
        assert_eq!(zero.inverse_integral(0.0, 3.0), Some(3.0));
        assert_eq!(zero.first_derivative(&[1.0]), vec![0.0]);
    }
}
