//! DCA Configuration Layer
//!
//! This crate provides the configuration shared by every segment of the
//! DCA decline curve engine.
//!
//! # Features
//!
//! - **Segment Bounds**: Valid rate and day-index ranges injected into
//!   every segment instance
//! - **Solver Settings**: Tolerance and iteration budget of the root finder
//! - **Precision**: Decimal places used when reporting editor ranges
//! - **Loading**: TOML and JSON documents, every key optional
//!
//! # Example
//!
//! ```rust
//! use dca_config::{EngineConfig, SegmentBounds, Validate};
//!
//! let config = EngineConfig::from_toml_str(
//!     r#"
//!     [bounds]
//!     numeric_small = 0.01
//!     date_idx_large = 80000
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(config.bounds.numeric_small, 0.01);
//! assert!(config.is_valid());
//!
//! let custom = EngineConfig::new().with_bounds(SegmentBounds::new(1.0, 1e6, 0.0, 50_000.0));
//! assert!(custom.bounds.rate_in_range(10.0));
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

mod bounds;
mod engine;
mod error;

pub use bounds::SegmentBounds;
pub use engine::{EngineConfig, SolverSettings};
pub use error::{ConfigError, ConfigResult, Validate, ValidationError};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::bounds::SegmentBounds;
    pub use crate::engine::{EngineConfig, SolverSettings};
    pub use crate::error::{ConfigError, ConfigResult, Validate};
}
