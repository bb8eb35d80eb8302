//! # DCA Curves
//!
//! Closed-form decline curve kernel for the DCA engine.
//!
//! This crate provides:
//!
//! - **Curve Trait**: Core [`DeclineCurve`] trait for rate, derivative,
//!   cumulative volume and its inverse
//! - **Families**: [`Exponential`], [`Hyperbolic`] (Arps), [`Linear`],
//!   [`Flat`] and [`ModifiedArps`] (hyperbolic switching to exponential)
//! - **Conversions**: Nominal ↔ effective annual decline per family
//! - **Boundary Solvers**: Given three of `{q_start, q_end, start, end, D}`
//!   solve for the fourth
//!
//! ## Quick Start
//!
//! ```rust
//! use dca_curves::prelude::*;
//!
//! let d = exponential::d_eff_to_d(0.5);
//! let curve = Exponential::new(1000.0, d, 0.0);
//!
//! // One year of 50% effective decline halves the rate
//! assert!((curve.rate(365.25) - 500.0).abs() < 1e-9);
//!
//! // The inverse integral undoes the integral
//! let volume = curve.integral(0.0, 100.0);
//! let t = curve.inverse_integral(volume, 0.0).unwrap();
//! assert!((t - 100.0).abs() < 1e-6);
//! ```
//!
//! All times are day indices on the epoch-anchored axis; all nominal
//! declines are per day.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::float_cmp)]
#![allow(clippy::suboptimal_flops)]

pub mod arps;
pub mod constants;
pub mod exponential;
pub mod flat;
pub mod linear;
pub mod modified_arps;
pub mod traits;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::arps::{self, Hyperbolic};
    pub use crate::constants::{
        B_MAX, B_MIN, DAYS_PER_YEAR, D_EFF_MAX, D_EFF_MIN, NO_SWITCH_DAYS,
    };
    pub use crate::exponential::{self, Exponential};
    pub use crate::flat::Flat;
    pub use crate::linear::{self, Linear};
    pub use crate::modified_arps::{self, ModifiedArps, SwitchPoint};
    pub use crate::traits::DeclineCurve;
}

pub use arps::Hyperbolic;
pub use exponential::Exponential;
pub use flat::Flat;
pub use linear::Linear;
pub use modified_arps::{ModifiedArps, SwitchPoint};
pub use traits::DeclineCurve;
