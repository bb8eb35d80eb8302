//! Persisted segment records.
//!
//! A record is the complete, self-consistent parameter set of one segment
//! as it is written back to storage. Field names follow the persisted
//! document (`D_eff`, `target_D_eff_sw`, ...); the variant tag lives in
//! `name`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SegmentError;

/// Segment variant discriminant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SegmentKind {
    /// Zero production.
    #[serde(rename = "empty")]
    Empty,
    /// Constant rate.
    #[serde(rename = "flat")]
    Flat,
    /// Exponential decline.
    #[serde(rename = "exp_dec")]
    ExpDecline,
    /// Arps hyperbolic decline.
    #[serde(rename = "arps")]
    Arps,
    /// Hyperbolic decline switching to exponential.
    #[serde(rename = "arps_modified")]
    ModifiedArps,
}

impl SegmentKind {
    /// All variants.
    pub const ALL: [SegmentKind; 5] = [
        SegmentKind::Empty,
        SegmentKind::Flat,
        SegmentKind::ExpDecline,
        SegmentKind::Arps,
        SegmentKind::ModifiedArps,
    ];

    /// The persisted name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            SegmentKind::Empty => "empty",
            SegmentKind::Flat => "flat",
            SegmentKind::ExpDecline => "exp_dec",
            SegmentKind::Arps => "arps",
            SegmentKind::ModifiedArps => "arps_modified",
        }
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SegmentKind {
    type Err = SegmentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SegmentKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| SegmentError::UnknownVariant { name: s.to_string() })
    }
}

/// Slope indicator: `-1` declining, `1` inclining, `0` flat.
#[must_use]
pub fn slope_of(q_start: f64, q_end: f64) -> f64 {
    if q_end < q_start {
        -1.0
    } else if q_end > q_start {
        1.0
    } else {
        0.0
    }
}

/// Parameters of an empty (shut-in) segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmptyParams {
    /// First day index.
    pub start_idx: f64,
    /// Last day index.
    pub end_idx: f64,
    /// Always zero.
    #[serde(default)]
    pub q_start: f64,
    /// Always zero.
    #[serde(default)]
    pub q_end: f64,
    /// Always zero.
    #[serde(default)]
    pub slope: f64,
}

/// Parameters of a constant-rate segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlatParams {
    /// First day index.
    pub start_idx: f64,
    /// Last day index.
    pub end_idx: f64,
    /// The constant rate.
    pub q_start: f64,
    /// Equal to `q_start`.
    pub q_end: f64,
    /// Always zero.
    #[serde(default)]
    pub slope: f64,
}

/// Parameters of an exponential decline segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExpDeclineParams {
    /// First day index.
    pub start_idx: f64,
    /// Last day index.
    pub end_idx: f64,
    /// Rate at `start_idx`.
    pub q_start: f64,
    /// Rate at `end_idx`.
    pub q_end: f64,
    /// Nominal decline per day.
    #[serde(rename = "D")]
    pub d: f64,
    /// Effective annual decline.
    #[serde(rename = "D_eff")]
    pub d_eff: f64,
    /// Slope indicator.
    pub slope: f64,
}

/// Parameters of an Arps hyperbolic segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArpsParams {
    /// First day index.
    pub start_idx: f64,
    /// Last day index.
    pub end_idx: f64,
    /// Rate at `start_idx`.
    pub q_start: f64,
    /// Rate at `end_idx`.
    pub q_end: f64,
    /// Hyperbolic exponent.
    pub b: f64,
    /// Nominal initial decline per day.
    #[serde(rename = "D")]
    pub d: f64,
    /// Secant effective annual decline.
    #[serde(rename = "D_eff")]
    pub d_eff: f64,
    /// Slope indicator.
    pub slope: f64,
}

/// Parameters of a modified Arps segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModifiedArpsParams {
    /// First day index.
    pub start_idx: f64,
    /// Last day index.
    pub end_idx: f64,
    /// Rate at `start_idx`.
    pub q_start: f64,
    /// Rate at `end_idx`.
    pub q_end: f64,
    /// Hyperbolic exponent.
    pub b: f64,
    /// Nominal initial decline of the hyperbolic phase.
    #[serde(rename = "D")]
    pub d: f64,
    /// Secant effective decline of the hyperbolic phase.
    #[serde(rename = "D_eff")]
    pub d_eff: f64,
    /// Requested effective decline at the switch; zero disables it.
    #[serde(rename = "target_D_eff_sw")]
    pub target_d_eff_sw: f64,
    /// Effective decline actually reached at the switch.
    #[serde(rename = "realized_D_eff_sw")]
    pub realized_d_eff_sw: f64,
    /// Day index of the switch, possibly past `end_idx`.
    pub sw_idx: f64,
    /// Rate at the switch.
    pub q_sw: f64,
    /// Nominal decline of the exponential phase.
    #[serde(rename = "D_exp")]
    pub d_exp: f64,
    /// Effective decline of the exponential phase.
    #[serde(rename = "D_exp_eff")]
    pub d_exp_eff: f64,
    /// Slope indicator.
    pub slope: f64,
}

/// A persisted segment record, tagged by `name`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name")]
pub enum SegmentRecord {
    /// Zero production.
    #[serde(rename = "empty")]
    Empty(EmptyParams),
    /// Constant rate.
    #[serde(rename = "flat")]
    Flat(FlatParams),
    /// Exponential decline.
    #[serde(rename = "exp_dec")]
    ExpDecline(ExpDeclineParams),
    /// Arps hyperbolic decline.
    #[serde(rename = "arps")]
    Arps(ArpsParams),
    /// Hyperbolic decline switching to exponential.
    #[serde(rename = "arps_modified")]
    ModifiedArps(ModifiedArpsParams),
}

macro_rules! common_field {
    ($self:ident, $field:ident) => {
        match $self {
            SegmentRecord::Empty(p) => p.$field,
            SegmentRecord::Flat(p) => p.$field,
            SegmentRecord::ExpDecline(p) => p.$field,
            SegmentRecord::Arps(p) => p.$field,
            SegmentRecord::ModifiedArps(p) => p.$field,
        }
    };
}

impl SegmentRecord {
    /// The variant of this record.
    #[must_use]
    pub fn kind(&self) -> SegmentKind {
        match self {
            SegmentRecord::Empty(_) => SegmentKind::Empty,
            SegmentRecord::Flat(_) => SegmentKind::Flat,
            SegmentRecord::ExpDecline(_) => SegmentKind::ExpDecline,
            SegmentRecord::Arps(_) => SegmentKind::Arps,
            SegmentRecord::ModifiedArps(_) => SegmentKind::ModifiedArps,
        }
    }

    /// First day index.
    #[must_use]
    pub fn start_idx(&self) -> f64 {
        common_field!(self, start_idx)
    }

    /// Last day index.
    #[must_use]
    pub fn end_idx(&self) -> f64 {
        common_field!(self, end_idx)
    }

    /// Rate at `start_idx`.
    #[must_use]
    pub fn q_start(&self) -> f64 {
        common_field!(self, q_start)
    }

    /// Rate at `end_idx`.
    #[must_use]
    pub fn q_end(&self) -> f64 {
        common_field!(self, q_end)
    }

    /// Slope indicator.
    #[must_use]
    pub fn slope(&self) -> f64 {
        common_field!(self, slope)
    }
}
