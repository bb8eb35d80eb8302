//! # DCA
//!
//! Decline curve analysis engine for oil and gas production forecasts.
//!
//! This is the umbrella crate: it re-exports the member crates under short
//! module names and gathers their preludes into one.
//!
//! | Module | Crate | Contents |
//! |--------|-------|----------|
//! | [`types`] | `dca-core` | dates, the epoch-anchored day index, errors |
//! | [`math`] | `dca-math` | bisection root finder, decimal rounding |
//! | [`curves`] | `dca-curves` | closed-form decline families |
//! | [`config`] | `dca-config` | bounds, solver and precision settings |
//! | [`segments`] | `dca-segments` | segment variants and editing operations |
//!
//! ```rust
//! use dca::prelude::*;
//!
//! let config = EngineConfig::default();
//! let raw = RawSegment::from_json_str(
//!     r#"{"name": "arps_modified", "start_idx": 0, "end_idx": 3650, "q_start": 800, "D_eff": 0.7}"#,
//! );
//! let seg = Segment::from_raw(&raw, &config).unwrap();
//! assert_eq!(seg.kind(), SegmentKind::ModifiedArps);
//! assert!(seg.q_end() < seg.q_start());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub use dca_config as config;
pub use dca_core as types;
pub use dca_curves as curves;
pub use dca_math as math;
pub use dca_segments as segments;

/// Prelude module for convenient imports.
///
/// The closed-form `Flat` and `ModifiedArps` curves stay under
/// [`crate::curves`]; the names here refer to the segment variants.
pub mod prelude {
    pub use dca_config::prelude::*;
    pub use dca_core::prelude::*;
    pub use dca_curves::prelude::{
        arps, exponential, linear, modified_arps, DeclineCurve, Exponential, Hyperbolic, Linear,
        SwitchPoint, B_MAX, B_MIN, DAYS_PER_YEAR, D_EFF_MAX, D_EFF_MIN,
    };
    pub use dca_math::prelude::*;
    pub use dca_segments::prelude::*;
}
