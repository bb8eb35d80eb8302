//! Segment variants and the dispatching [`Segment`] enum.

mod arps;
mod decline;
mod empty;
mod exp_decline;
mod flat;
mod modified_arps;

pub use arps::Arps;
pub use empty::Empty;
pub use exp_decline::ExpDecline;
pub use flat::Flat;
pub use modified_arps::ModifiedArps;

use dca_config::EngineConfig;

use crate::contract::{CalcField, CalcInput, CalcRange, Generate, QEndTarget, QFinalConfig, SegmentModel};
use crate::error::SegmentResult;
use crate::raw::RawSegment;
use crate::record::{SegmentKind, SegmentRecord};
use crate::well_life::ProductionInfo;

/// Any segment variant.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    /// Shut-in period.
    Empty(Empty),
    /// Constant rate.
    Flat(Flat),
    /// Exponential decline.
    ExpDecline(ExpDecline),
    /// Hyperbolic decline.
    Arps(Arps),
    /// Hyperbolic decline switching to exponential.
    ModifiedArps(ModifiedArps),
}

/// Calls `$call` on the wrapped variant.
macro_rules! dispatch {
    ($self:expr, $seg:ident => $call:expr) => {
        match $self {
            Segment::Empty($seg) => $call,
            Segment::Flat($seg) => $call,
            Segment::ExpDecline($seg) => $call,
            Segment::Arps($seg) => $call,
            Segment::ModifiedArps($seg) => $call,
        }
    };
}

/// Calls `$call` on the wrapped variant and re-wraps the result.
macro_rules! dispatch_map {
    ($self:expr, $seg:ident => $call:expr) => {
        match $self {
            Segment::Empty($seg) => $call.map(Segment::Empty),
            Segment::Flat($seg) => $call.map(Segment::Flat),
            Segment::ExpDecline($seg) => $call.map(Segment::ExpDecline),
            Segment::Arps($seg) => $call.map(Segment::Arps),
            Segment::ModifiedArps($seg) => $call.map(Segment::ModifiedArps),
        }
    };
}

impl Segment {
    /// Generates a segment of the given variant from raw input.
    ///
    /// Never fails; see [`Generate::generate`].
    #[must_use]
    pub fn generate(kind: SegmentKind, raw: &RawSegment, config: &EngineConfig) -> Self {
        match kind {
            SegmentKind::Empty => Segment::Empty(Empty::generate(raw, config)),
            SegmentKind::Flat => Segment::Flat(Flat::generate(raw, config)),
            SegmentKind::ExpDecline => Segment::ExpDecline(ExpDecline::generate(raw, config)),
            SegmentKind::Arps => Segment::Arps(Arps::generate(raw, config)),
            SegmentKind::ModifiedArps => Segment::ModifiedArps(ModifiedArps::generate(raw, config)),
        }
    }

    /// Generates a segment from raw input carrying its variant in `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SegmentError::UnknownVariant`](crate::error::SegmentError::UnknownVariant)
    /// if `name` is missing or unknown.
    pub fn from_raw(raw: &RawSegment, config: &EngineConfig) -> SegmentResult<Self> {
        let kind: SegmentKind = raw.name().unwrap_or_default().parse()?;
        Ok(Self::generate(kind, raw, config))
    }

    /// Rebuilds a segment from a persisted record.
    #[must_use]
    pub fn from_record(record: &SegmentRecord, config: &EngineConfig) -> Self {
        Self::generate(record.kind(), &RawSegment::from(record), config)
    }

    /// The variant of this segment.
    #[must_use]
    pub fn kind(&self) -> SegmentKind {
        match self {
            Segment::Empty(_) => SegmentKind::Empty,
            Segment::Flat(_) => SegmentKind::Flat,
            Segment::ExpDecline(_) => SegmentKind::ExpDecline,
            Segment::Arps(_) => SegmentKind::Arps,
            Segment::ModifiedArps(_) => SegmentKind::ModifiedArps,
        }
    }
}

impl SegmentModel for Segment {
    fn name(&self) -> &'static str {
        dispatch!(self, s => s.name())
    }

    fn config(&self) -> &EngineConfig {
        dispatch!(self, s => s.config())
    }

    fn record(&self) -> SegmentRecord {
        dispatch!(self, s => s.record())
    }

    fn rate(&self, t: f64) -> f64 {
        dispatch!(self, s => s.rate(t))
    }

    fn derivative(&self, t: f64) -> f64 {
        dispatch!(self, s => s.derivative(t))
    }

    fn integral(&self, left: f64, right: f64) -> f64 {
        dispatch!(self, s => s.integral(left, right))
    }

    fn inverse_integral(&self, volume: f64, left: f64) -> Option<f64> {
        dispatch!(self, s => s.inverse_integral(volume, left))
    }

    fn time_to_rate(&self, q: f64) -> Option<f64> {
        dispatch!(self, s => s.time_to_rate(q))
    }

    fn form_calc_range(&self, target: CalcField) -> CalcRange {
        dispatch!(self, s => s.form_calc_range(target))
    }

    fn change_q_start(&self, value: f64) -> SegmentResult<Self> {
        dispatch_map!(self, s => s.change_q_start(value))
    }

    fn change_q_end(&self, value: f64, target: QEndTarget) -> SegmentResult<Self> {
        dispatch_map!(self, s => s.change_q_end(value, target))
    }

    fn change_d_eff(&self, value: f64) -> SegmentResult<Self> {
        dispatch_map!(self, s => s.change_d_eff(value))
    }

    fn change_b(&self, value: f64) -> SegmentResult<Self> {
        dispatch_map!(self, s => s.change_b(value))
    }

    fn change_target_d_eff_sw(&self, value: f64) -> SegmentResult<Self> {
        dispatch_map!(self, s => s.change_target_d_eff_sw(value))
    }

    fn button_q_final(
        &self,
        config: &QFinalConfig,
        info: &ProductionInfo,
        first_segment: &Segment,
    ) -> SegmentResult<Self> {
        dispatch_map!(self, s => s.button_q_final(config, info, first_segment))
    }

    fn button_anchor_prev(&self, prev: &Segment) -> SegmentResult<Self> {
        dispatch_map!(self, s => s.button_anchor_prev(prev))
    }

    fn button_anchor_next(&self, next: &Segment) -> SegmentResult<Self> {
        dispatch_map!(self, s => s.button_anchor_next(next))
    }

    fn button_match_slope(&self, prev: &Segment) -> SegmentResult<Self> {
        dispatch_map!(self, s => s.button_match_slope(prev))
    }

    fn button_connect_prev(&self, prev: &Segment) -> SegmentResult<Self> {
        dispatch_map!(self, s => s.button_connect_prev(prev))
    }

    fn calc_q_start(&self, input: &CalcInput) -> SegmentResult<Self> {
        dispatch_map!(self, s => s.calc_q_start(input))
    }

    fn calc_end_idx(&self, input: &CalcInput) -> SegmentResult<Self> {
        dispatch_map!(self, s => s.calc_end_idx(input))
    }

    fn calc_q_end(&self, input: &CalcInput) -> SegmentResult<Self> {
        dispatch_map!(self, s => s.calc_q_end(input))
    }

    fn calc_d_eff(&self, input: &CalcInput) -> SegmentResult<Self> {
        dispatch_map!(self, s => s.calc_d_eff(input))
    }
}
