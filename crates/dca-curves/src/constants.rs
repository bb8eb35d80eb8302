//! Shared constants of the decline curve kernel.

/// Days per year used by every nominal ↔ effective decline conversion.
pub const DAYS_PER_YEAR: f64 = 365.25;

/// Lowest effective annual decline a non-degenerate segment may carry.
pub const D_EFF_MIN: f64 = 0.01;

/// Highest effective annual decline a non-degenerate segment may carry.
pub const D_EFF_MAX: f64 = 0.9999;

/// Smallest hyperbolic exponent.
pub const B_MIN: f64 = 0.01;

/// Largest hyperbolic exponent.
pub const B_MAX: f64 = 10.0;

/// Offset of the switch point when a modified Arps curve has no target
/// switch decline.
pub const NO_SWITCH_DAYS: f64 = 300_000.0;

/// `|b - 1|` below which the Arps integral uses its logarithmic limit.
pub const B_UNITY_TOLERANCE: f64 = 1e-9;

/// Nominal declines below this magnitude are treated as zero.
pub const D_ZERO_TOLERANCE: f64 = 1e-14;
