//! Error types for segment operations.

use std::fmt;

use thiserror::Error;

use dca_curves::constants::{D_EFF_MAX, D_EFF_MIN};

/// A specialized Result type for segment operations.
pub type SegmentResult<T> = Result<T, SegmentError>;

/// Which side of a bound a value fell on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Above the upper bound.
    TooLarge,
    /// Below the lower bound.
    TooSmall,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::TooLarge => write!(f, "too large"),
            Direction::TooSmall => write!(f, "too small"),
        }
    }
}

fn percent(fraction: &f64) -> f64 {
    dca_math::rounding::round_to(fraction * 100.0, 4, dca_math::rounding::Rounding::Nearest)
}

/// Errors reported by segment operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SegmentError {
    /// The inverse problem has no solution for the given inputs.
    #[error("Unsolvable: {reason}")]
    Unsolvable {
        /// Why no solution exists.
        reason: String,
    },

    /// A solved or supplied value violates a rate or index bound.
    #[error("{field} {value} is {direction} (limit {limit})")]
    OutOfRange {
        /// Offending field.
        field: String,
        /// Offending value.
        value: f64,
        /// The violated bound.
        limit: f64,
        /// Which bound was violated.
        direction: Direction,
    },

    /// An effective decline outside its admissible interval.
    #[error("{field} {value} is out of range {}%-{}%", percent(.min), percent(.max))]
    DeclineOutOfRange {
        /// Offending field.
        field: String,
        /// Offending value.
        value: f64,
        /// Lower end of the interval.
        min: f64,
        /// Upper end of the interval.
        max: f64,
    },

    /// The operation does not apply to this segment variant.
    #[error("Operation '{operation}' is not supported for '{segment}' segments")]
    Unsupported {
        /// The attempted operation.
        operation: &'static str,
        /// The segment variant.
        segment: &'static str,
    },

    /// Neither cut-off of a terminal-rate action can be met.
    #[error("Not satisfiable: {reason}")]
    NotSatisfiable {
        /// Why neither cut-off applies.
        reason: String,
    },

    /// Unknown segment variant name.
    #[error("Unknown segment variant '{name}'")]
    UnknownVariant {
        /// The name that was supplied.
        name: String,
    },
}

impl SegmentError {
    /// Creates an unsolvable error.
    #[must_use]
    pub fn unsolvable(reason: impl Into<String>) -> Self {
        Self::Unsolvable {
            reason: reason.into(),
        }
    }

    /// Creates a "too large" error.
    #[must_use]
    pub fn too_large(field: impl Into<String>, value: f64, limit: f64) -> Self {
        Self::OutOfRange {
            field: field.into(),
            value,
            limit,
            direction: Direction::TooLarge,
        }
    }

    /// Creates a "too small" error.
    #[must_use]
    pub fn too_small(field: impl Into<String>, value: f64, limit: f64) -> Self {
        Self::OutOfRange {
            field: field.into(),
            value,
            limit,
            direction: Direction::TooSmall,
        }
    }

    /// Creates an effective decline error against the standard interval.
    #[must_use]
    pub fn decline_out_of_range(field: impl Into<String>, value: f64) -> Self {
        Self::DeclineOutOfRange {
            field: field.into(),
            value,
            min: D_EFF_MIN,
            max: D_EFF_MAX,
        }
    }

    /// Creates an unsupported operation error.
    #[must_use]
    pub fn unsupported(operation: &'static str, segment: &'static str) -> Self {
        Self::Unsupported { operation, segment }
    }

    /// Creates a not satisfiable error.
    #[must_use]
    pub fn not_satisfiable(reason: impl Into<String>) -> Self {
        Self::NotSatisfiable {
            reason: reason.into(),
        }
    }
}
