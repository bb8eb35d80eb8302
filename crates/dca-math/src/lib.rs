//! # DCA Math
//!
//! Numeric utilities for the DCA decline curve engine.
//!
//! This crate provides:
//!
//! - **Rounding**: Decimal-precision rounding with directional control
//!   (nearest, up, down), used to keep editor ranges inclusive
//! - **Solvers**: A bounded bisection root finder that always terminates
//!   and reports whether it met the tolerance
//!
//! ## Design Philosophy
//!
//! - **Deterministic**: No hidden state, every call is a pure function
//! - **Numerical Stability**: Careful handling of edge cases
//! - **Total**: Iteration budgets never panic, they return a best estimate

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
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::float_cmp)]

pub mod error;
pub mod rounding;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::rounding::{round_to, round_whole, Rounding};
    pub use crate::solvers::{bisection, SolverConfig, SolverResult};
}

pub use error::{MathError, MathResult};
