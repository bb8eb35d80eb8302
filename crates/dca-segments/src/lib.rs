//! # DCA Segments
//!
//! Segment variants of a decline-curve forecast and their editing
//! operations.
//!
//! This crate provides:
//!
//! - **Records**: [`SegmentRecord`], the persisted, serde-tagged parameter
//!   set of each variant
//! - **Variants**: [`Empty`], [`Flat`], [`ExpDecline`], [`Arps`] and
//!   [`ModifiedArps`], plus the dispatching [`Segment`] enum
//! - **Contract**: [`SegmentModel`] with value queries, range computation
//!   for editor forms, change operations, neighbour buttons and
//!   "solve for the missing field" operations
//! - **Well Life**: [`resolve_well_life`] turning policy and production
//!   metadata into a terminal day index
//!
//! ## Quick Start
//!
//! ```rust
//! use dca_segments::prelude::*;
//!
//! let config = EngineConfig::default();
//! let raw = RawSegment::new()
//!     .with("start_idx", 0.0)
//!     .with("end_idx", 365.0)
//!     .with("q_start", 1000.0)
//!     .with("D_eff", 0.5);
//! let seg = Segment::generate(SegmentKind::ExpDecline, &raw, &config);
//!
//! // Solve the decline back from both end rates
//! let solved = seg.calc_d_eff(&CalcInput::new()).unwrap();
//! if let SegmentRecord::ExpDecline(params) = solved.record() {
//!     assert!((params.d_eff - 0.5).abs() < 1e-9);
//! }
//! ```
//!
//! Every operation returns a new segment; nothing is mutated in place.
//! Generation never fails: missing or invalid raw fields are replaced by
//! defaults clamped into the configured bounds.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::similar_names)]
#![allow(clippy::float_cmp)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::suboptimal_flops)]

pub mod contract;
pub mod error;
pub mod raw;
pub mod record;
pub mod variants;
pub mod well_life;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::contract::{
        CalcField, CalcInput, CalcRange, Generate, QEndTarget, QFinalConfig, SegmentModel,
    };
    pub use crate::error::{Direction, SegmentError, SegmentResult};
    pub use crate::raw::RawSegment;
    pub use crate::record::{SegmentKind, SegmentRecord};
    pub use crate::variants::{Arps, Empty, ExpDecline, Flat, ModifiedArps, Segment};
    pub use crate::well_life::{
        resolve_well_life, ProductionInfo, WellLifeConfig, WellLifeMethod,
    };
    pub use dca_config::{EngineConfig, SegmentBounds};
}

pub use contract::{CalcField, CalcInput, CalcRange, Generate, QEndTarget, QFinalConfig, SegmentModel};
pub use error::{SegmentError, SegmentResult};
pub use raw::RawSegment;
pub use record::{SegmentKind, SegmentRecord};
pub use variants::{Arps, Empty, ExpDecline, Flat, ModifiedArps, Segment};
pub use well_life::{resolve_well_life, ProductionInfo, WellLifeConfig, WellLifeMethod};
