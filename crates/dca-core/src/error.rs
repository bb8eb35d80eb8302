//! Error types for the DCA engine.
//!
//! This module defines the error type shared by the lower layers of DCA;
//! crate-specific error enums wrap it with `#[from]`.

use thiserror::Error;

/// A specialized Result type for DCA core operations.
pub type DcaResult<T> = Result<T, DcaError>;

/// The core error type for DCA operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DcaError {
    /// Error in date calculations or invalid date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// A day index that cannot be mapped onto the calendar.
    #[error("Day index {index} is outside the supported calendar range")]
    IndexOutOfRange {
        /// The offending index.
        index: i64,
    },

    /// Invalid input value.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },
}

impl DcaError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DcaError::invalid_date("2024-02-30 is not a valid date");
        assert!(err.to_string().contains("Invalid date"));
    }

    #[test]
    fn test_index_error_display() {
        let err = DcaError::IndexOutOfRange { index: -1 };
        assert!(err.to_string().contains("-1"));
    }
}
