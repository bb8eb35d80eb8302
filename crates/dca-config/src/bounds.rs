//! Global numeric and date bounds injected into every segment.

use serde::{Deserialize, Serialize};

use crate::error::{Validate, ValidationError};

/// Valid rate and day-index ranges for segment parameters.
///
/// Every computed rate must lie in `[numeric_small, numeric_large]` and
/// every computed index in `[date_idx_small, date_idx_large]`. Values
/// outside are reported by the segment operations, except during default
/// synthesis where they are clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SegmentBounds {
    /// Smallest valid rate.
    #[serde(default = "default_numeric_small")]
    pub numeric_small: f64,

    /// Largest valid rate.
    #[serde(default = "default_numeric_large")]
    pub numeric_large: f64,

    /// Smallest valid day index.
    #[serde(default)]
    pub date_idx_small: f64,

    /// Largest valid day index.
    #[serde(default = "default_date_idx_large")]
    pub date_idx_large: f64,
}

fn default_numeric_small() -> f64 {
    1e-4
}

fn default_numeric_large() -> f64 {
    1e10
}

fn default_date_idx_large() -> f64 {
    100_000.0
}

impl Default for SegmentBounds {
    fn default() -> Self {
        Self {
            numeric_small: default_numeric_small(),
            numeric_large: default_numeric_large(),
            date_idx_small: 0.0,
            date_idx_large: default_date_idx_large(),
        }
    }
}

impl SegmentBounds {
    /// Creates bounds from the four scalars.
    #[must_use]
    pub fn new(numeric_small: f64, numeric_large: f64, date_idx_small: f64, date_idx_large: f64) -> Self {
        Self {
            numeric_small,
            numeric_large,
            date_idx_small,
            date_idx_large,
        }
    }

    /// Returns true if `q` is a valid rate.
    #[must_use]
    pub fn rate_in_range(&self, q: f64) -> bool {
        q >= self.numeric_small && q <= self.numeric_large
    }

    /// Returns true if `idx` is a valid day index.
    #[must_use]
    pub fn index_in_range(&self, idx: f64) -> bool {
        idx >= self.date_idx_small && idx <= self.date_idx_large
    }

    /// Clamps a rate into the valid range.
    #[must_use]
    pub fn clamp_rate(&self, q: f64) -> f64 {
        clamp_between(q, self.numeric_small, self.numeric_large)
    }

    /// Clamps a day index into the valid range.
    #[must_use]
    pub fn clamp_index(&self, idx: f64) -> f64 {
        clamp_between(idx, self.date_idx_small, self.date_idx_large)
    }
}

/// Clamps into the interval spanned by `a` and `b` in either order. A NaN
/// bound leaves the value unchanged.
fn clamp_between(value: f64, a: f64, b: f64) -> f64 {
    let (lo, hi) = (a.min(b), a.max(b));
    if lo <= hi {
        value.clamp(lo, hi)
    } else {
        value
    }
}

impl Validate for SegmentBounds {
    fn validate(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        let scalars = [
            ("numeric_small", self.numeric_small),
            ("numeric_large", self.numeric_large),
            ("date_idx_small", self.date_idx_small),
            ("date_idx_large", self.date_idx_large),
        ];
        for (field, value) in scalars {
            if !value.is_finite() {
                errors.push(ValidationError::with_rule(field, format!("{value} is not finite"), "finite"));
            }
        }

        if self.numeric_small <= 0.0 {
            errors.push(ValidationError::with_rule(
                "numeric_small",
                "Smallest rate must be positive",
                "positive_rate",
            ));
        }

        if self.numeric_small >= self.numeric_large {
            errors.push(ValidationError::with_rule(
                "numeric_large",
                format!(
                    "Largest rate {} must exceed smallest rate {}",
                    self.numeric_large, self.numeric_small
                ),
                "ordered_rates",
            ));
        }

        if self.date_idx_small < 0.0 || self.date_idx_large < 0.0 {
            errors.push(ValidationError::with_rule(
                "date_idx_small",
                "Day index bounds cannot precede the epoch",
                "non_negative_index",
            ));
        }

        if self.date_idx_small >= self.date_idx_large {
            errors.push(ValidationError::with_rule(
                "date_idx_large",
                format!(
                    "Largest index {} must exceed smallest index {}",
                    self.date_idx_large, self.date_idx_small
                ),
                "ordered_indices",
            ));
        }

        errors
    }
}
