//! # DCA Core
//!
//! Core types and errors for the DCA decline curve engine.
//!
//! This crate provides the foundational building blocks used throughout DCA:
//!
//! - **Dates**: A calendar [`Date`] with month/year shift arithmetic
//! - **Day Index**: The epoch-anchored integer time axis ([`DayIndex`])
//!   every decline curve is evaluated on
//! - **Errors**: The shared [`DcaError`] type
//!
//! ## Time Axis
//!
//! Every segment lives on an integer day index counted from
//! 1900-01-01 (day 0). Converting a fractional index back to a date rounds
//! to the nearest day.
//!
//! ```rust
//! use dca_core::prelude::*;
//!
//! let date = Date::from_ymd(1900, 1, 31).unwrap();
//! assert_eq!(DayIndex::from_date(date).value(), 30);
//! assert_eq!(DayIndex::from_f64(29.6).to_date(), date);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_possible_wrap)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::trivially_copy_pass_by_ref)]
#![allow(clippy::return_self_not_must_use)]

pub mod error;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{DcaError, DcaResult};
    pub use crate::types::{epoch, Date, DayIndex};
}

// Re-export commonly used types at crate root
pub use error::{DcaError, DcaResult};
pub use types::{Date, DayIndex};
