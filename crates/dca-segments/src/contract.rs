//! The operation contract shared by every segment variant.
//!
//! [`SegmentModel`] is the editing surface of a segment. Its default
//! methods report [`SegmentError::Unsupported`], so a variant only
//! implements what applies to its curve family. The free functions here
//! are the shared plumbing: bound checks, default synthesis of the time
//! window, the generic editor range, and the terminal index of a
//! terminal-rate action.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use dca_config::{EngineConfig, SegmentBounds};
use dca_core::DayIndex;
use dca_curves::constants::{D_EFF_MAX, D_EFF_MIN};
use dca_math::rounding::{round_to, Rounding};

use crate::error::{SegmentError, SegmentResult};
use crate::raw::RawSegment;
use crate::record::SegmentRecord;
use crate::variants::Segment;
use crate::well_life::{resolve_well_life, ProductionInfo, WellLifeConfig};

/// Default rate at the start of a synthesized segment.
pub const DEFAULT_Q_START: f64 = 100.0;

/// Default rate at the end of a synthesized segment.
pub const DEFAULT_Q_END: f64 = 50.0;

/// Default hyperbolic exponent.
pub const DEFAULT_B: f64 = 1.1;

/// Default effective decline at the modified Arps switch.
pub const DEFAULT_TARGET_D_EFF_SW: f64 = 0.08;

/// Default window length of a synthesized segment, in days.
pub const DEFAULT_WINDOW_DAYS: f64 = 365.0;

// =============================================================================
// EDITOR TYPES
// =============================================================================

/// An editable segment field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CalcField {
    /// Last day index.
    #[serde(rename = "end_idx")]
    EndIdx,
    /// Rate at the start.
    #[serde(rename = "q_start")]
    QStart,
    /// Rate at the end.
    #[serde(rename = "q_end")]
    QEnd,
    /// Effective annual decline.
    #[serde(rename = "D_eff")]
    DEff,
}

impl CalcField {
    /// The four editable fields of a decline segment.
    pub const ALL: [CalcField; 4] = [
        CalcField::EndIdx,
        CalcField::QStart,
        CalcField::QEnd,
        CalcField::DEff,
    ];
}

/// Inclusive `[min, max]` per field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalcRange(BTreeMap<CalcField, [f64; 2]>);

impl CalcRange {
    /// Creates an empty range set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the range of a field.
    pub fn insert(&mut self, field: CalcField, min: f64, max: f64) {
        self.0.insert(field, [min, max]);
    }

    /// The range of a field.
    #[must_use]
    pub fn get(&self, field: CalcField) -> Option<[f64; 2]> {
        self.0.get(&field).copied()
    }

    /// Returns true if `value` is inside the range of `field`.
    #[must_use]
    pub fn contains(&self, field: CalcField, value: f64) -> bool {
        self.get(field)
            .is_some_and(|[min, max]| value >= min && value <= max)
    }

    /// Iterates over the fields in order.
    pub fn iter(&self) -> impl Iterator<Item = (CalcField, [f64; 2])> + '_ {
        self.0.iter().map(|(field, range)| (*field, *range))
    }

    /// Number of fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if no field has a range.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Inputs of the `calc_*` operations; missing fields keep the segment's
/// current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CalcInput {
    /// First day index.
    #[serde(default)]
    pub start_idx: Option<f64>,
    /// Last day index.
    #[serde(default)]
    pub end_idx: Option<f64>,
    /// Rate at the start.
    #[serde(default)]
    pub q_start: Option<f64>,
    /// Rate at the end.
    #[serde(default)]
    pub q_end: Option<f64>,
    /// Effective annual decline.
    #[serde(default, rename = "D_eff")]
    pub d_eff: Option<f64>,
}

impl CalcInput {
    /// Creates an input keeping every current value.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the first day index.
    #[must_use]
    pub fn with_start_idx(mut self, value: f64) -> Self {
        self.start_idx = Some(value);
        self
    }

    /// Sets the last day index.
    #[must_use]
    pub fn with_end_idx(mut self, value: f64) -> Self {
        self.end_idx = Some(value);
        self
    }

    /// Sets the start rate.
    #[must_use]
    pub fn with_q_start(mut self, value: f64) -> Self {
        self.q_start = Some(value);
        self
    }

    /// Sets the end rate.
    #[must_use]
    pub fn with_q_end(mut self, value: f64) -> Self {
        self.q_end = Some(value);
        self
    }

    /// Sets the effective decline.
    #[must_use]
    pub fn with_d_eff(mut self, value: f64) -> Self {
        self.d_eff = Some(value);
        self
    }
}

/// What a new end rate is allowed to move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QEndTarget {
    /// Keep the window, re-solve the decline.
    #[serde(rename = "D_eff")]
    DEff,
    /// Keep the decline, re-solve the end index.
    EndIdx,
}

/// Settings of the terminal-rate action.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct QFinalConfig {
    /// Terminal rate cut-off.
    #[serde(default)]
    pub q_final: Option<f64>,
    /// Well-life cut-off.
    #[serde(default)]
    pub well_life: WellLifeConfig,
}

// =============================================================================
// CONTRACT
// =============================================================================

/// Operations every segment variant supports.
///
/// Every operation returns a new segment; records are never mutated.
pub trait SegmentModel: Sized {
    /// The persisted variant name.
    fn name(&self) -> &'static str;

    /// Configuration injected at generation.
    fn config(&self) -> &EngineConfig;

    /// Global bounds.
    fn bounds(&self) -> &SegmentBounds {
        &self.config().bounds
    }

    /// The persisted record.
    fn record(&self) -> SegmentRecord;

    /// First day index.
    fn start_idx(&self) -> f64 {
        self.record().start_idx()
    }

    /// Last day index.
    fn end_idx(&self) -> f64 {
        self.record().end_idx()
    }

    /// Rate at the start.
    fn q_start(&self) -> f64 {
        self.record().q_start()
    }

    /// Rate at the end.
    fn q_end(&self) -> f64 {
        self.record().q_end()
    }

    /// Rate at day index `t`.
    fn rate(&self, t: f64) -> f64;

    /// Derivative of the rate at day index `t`.
    fn derivative(&self, t: f64) -> f64;

    /// Rates at each index.
    fn predict(&self, indices: &[f64]) -> Vec<f64> {
        indices.iter().map(|&t| self.rate(t)).collect()
    }

    /// Derivatives at each index.
    fn first_derivative(&self, indices: &[f64]) -> Vec<f64> {
        indices.iter().map(|&t| self.derivative(t)).collect()
    }

    /// Cumulative volume over `[left, right]`.
    fn integral(&self, left: f64, right: f64) -> f64;

    /// Index at which `volume` has been produced from `left`.
    fn inverse_integral(&self, volume: f64, left: f64) -> Option<f64>;

    /// Index at which the rate reaches `q`.
    fn time_to_rate(&self, _q: f64) -> Option<f64> {
        None
    }

    /// Admissible ranges of the other fields while `target` is solved for.
    fn form_calc_range(&self, target: CalcField) -> CalcRange {
        default_calc_range(self, &CalcField::ALL, target)
    }

    /// Replaces the start rate.
    fn change_q_start(&self, _value: f64) -> SegmentResult<Self> {
        Err(SegmentError::unsupported("change_q_start", self.name()))
    }

    /// Replaces the end rate.
    fn change_q_end(&self, _value: f64, _target: QEndTarget) -> SegmentResult<Self> {
        Err(SegmentError::unsupported("change_q_end", self.name()))
    }

    /// Replaces the effective decline.
    fn change_d_eff(&self, _value: f64) -> SegmentResult<Self> {
        Err(SegmentError::unsupported("change_d_eff", self.name()))
    }

    /// Replaces the hyperbolic exponent.
    fn change_b(&self, _value: f64) -> SegmentResult<Self> {
        Err(SegmentError::unsupported("change_b", self.name()))
    }

    /// Replaces the switch decline target.
    fn change_target_d_eff_sw(&self, _value: f64) -> SegmentResult<Self> {
        Err(SegmentError::unsupported("change_target_d_eff_sw", self.name()))
    }

    /// Truncates the segment at the earlier of a terminal rate and the well life.
    fn button_q_final(
        &self,
        _config: &QFinalConfig,
        _info: &ProductionInfo,
        _first_segment: &Segment,
    ) -> SegmentResult<Self> {
        Err(SegmentError::unsupported("button_q_final", self.name()))
    }

    /// Starts this segment at the previous segment's end rate.
    fn button_anchor_prev(&self, _prev: &Segment) -> SegmentResult<Self> {
        Err(SegmentError::unsupported("button_anchor_prev", self.name()))
    }

    /// Ends this segment at the next segment's start rate.
    fn button_anchor_next(&self, _next: &Segment) -> SegmentResult<Self> {
        Err(SegmentError::unsupported("button_anchor_next", self.name()))
    }

    /// Matches the previous segment's relative slope at the junction.
    fn button_match_slope(&self, _prev: &Segment) -> SegmentResult<Self> {
        Err(SegmentError::unsupported("button_match_slope", self.name()))
    }

    /// Starts this segment the day after the previous one ends.
    fn button_connect_prev(&self, _prev: &Segment) -> SegmentResult<Self> {
        Err(SegmentError::unsupported("button_connect_prev", self.name()))
    }

    /// Solves the start rate.
    fn calc_q_start(&self, _input: &CalcInput) -> SegmentResult<Self> {
        Err(SegmentError::unsupported("calc_q_start", self.name()))
    }

    /// Solves the end index.
    fn calc_end_idx(&self, _input: &CalcInput) -> SegmentResult<Self> {
        Err(SegmentError::unsupported("calc_end_idx", self.name()))
    }

    /// Solves the end rate.
    fn calc_q_end(&self, _input: &CalcInput) -> SegmentResult<Self> {
        Err(SegmentError::unsupported("calc_q_end", self.name()))
    }

    /// Solves the effective decline.
    fn calc_d_eff(&self, _input: &CalcInput) -> SegmentResult<Self> {
        Err(SegmentError::unsupported("calc_d_eff", self.name()))
    }
}

/// Construction of a segment from raw input.
pub trait Generate: Sized {
    /// Validates raw input and derives every dependent field.
    ///
    /// Never fails: missing, malformed or out-of-bound fields are replaced
    /// by defaults clamped into the bounds.
    fn generate(raw: &RawSegment, config: &EngineConfig) -> Self;
}

/// Regenerates `segment` starting the day after `prev` ends.
///
/// The window keeps its length, clamped to the upper index bound.
pub fn connect_after<S: SegmentModel + Generate>(segment: &S, prev: &Segment) -> SegmentResult<S> {
    let bounds = segment.bounds();
    let start = check_index(bounds, "start_idx", prev.end_idx() + 1.0, bounds.date_idx_small)?;
    let end = bounds.clamp_index(start + (segment.end_idx() - segment.start_idx()));
    let raw = RawSegment::from(&segment.record())
        .with("start_idx", start)
        .with("end_idx", end);
    Ok(S::generate(&raw, segment.config()))
}

// =============================================================================
// INPUT CHECKS
// =============================================================================

/// Returns `value` if it is present, finite and inside `[min, max]`.
#[must_use]
pub fn check_valid_input(value: Option<f64>, min: f64, max: f64) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v >= min && *v <= max)
}

/// Requires a rate inside the rate bounds.
///
/// Infinite values are reported against the bound they overshoot.
pub fn check_rate(bounds: &SegmentBounds, field: &str, value: f64) -> SegmentResult<f64> {
    if value.is_nan() {
        return Err(SegmentError::unsolvable(format!("{field} is not a number")));
    }
    if value > bounds.numeric_large {
        return Err(SegmentError::too_large(field, value, bounds.numeric_large));
    }
    if value < bounds.numeric_small {
        return Err(SegmentError::too_small(field, value, bounds.numeric_small));
    }
    Ok(value)
}

/// Requires an index inside `[lower, date_idx_large]`.
pub fn check_index(bounds: &SegmentBounds, field: &str, value: f64, lower: f64) -> SegmentResult<f64> {
    if value.is_nan() {
        return Err(SegmentError::unsolvable(format!("{field} is not a number")));
    }
    if value > bounds.date_idx_large {
        return Err(SegmentError::too_large(field, value, bounds.date_idx_large));
    }
    let lower = lower.max(bounds.date_idx_small);
    if value < lower {
        return Err(SegmentError::too_small(field, value, lower));
    }
    Ok(value)
}

/// Requires an effective decline inside `[D_EFF_MIN, D_EFF_MAX]`.
pub fn check_d_eff(field: &str, value: f64) -> SegmentResult<f64> {
    if value.is_finite() && (D_EFF_MIN..=D_EFF_MAX).contains(&value) {
        Ok(value)
    } else {
        Err(SegmentError::decline_out_of_range(field, value))
    }
}

/// Rounds an index to the configured precision.
#[must_use]
pub fn round_index(config: &EngineConfig, value: f64, mode: Rounding) -> f64 {
    round_to(value, config.index_precision, mode)
}

/// Resolves the time window of raw input.
///
/// A valid start is kept, else the lower index bound is used. A valid end
/// not before the start is kept, else the window defaults to
/// [`DEFAULT_WINDOW_DAYS`] clamped to the upper index bound.
#[must_use]
pub fn resolve_window(raw: &RawSegment, bounds: &SegmentBounds) -> (f64, f64) {
    let start = check_valid_input(raw.get_f64("start_idx"), bounds.date_idx_small, bounds.date_idx_large)
        .unwrap_or_else(|| {
            log::debug!("start_idx missing or out of bounds, using {}", bounds.date_idx_small);
            bounds.date_idx_small
        });
    let end = check_valid_input(raw.get_f64("end_idx"), start, bounds.date_idx_large).unwrap_or_else(|| {
        log::debug!("end_idx missing or before start_idx, using a {DEFAULT_WINDOW_DAYS}-day window");
        bounds.clamp_index(start + DEFAULT_WINDOW_DAYS)
    });
    (start, end)
}

// =============================================================================
// EDITOR RANGES
// =============================================================================

/// Clamps, rounds and orders one editor range entry.
///
/// Non-finite ends are replaced by the field's bound. The lower end is
/// rounded up and the upper end down; a range emptied by clamping or
/// rounding collapses onto `current`.
#[must_use]
pub fn range_entry(config: &EngineConfig, field: CalcField, min: f64, max: f64, current: f64, lower: f64) -> [f64; 2] {
    let bounds = &config.bounds;
    let (lo, hi, decimals) = match field {
        CalcField::EndIdx => (lower.max(bounds.date_idx_small), bounds.date_idx_large, config.index_precision),
        CalcField::QStart | CalcField::QEnd => (bounds.numeric_small, bounds.numeric_large, config.rate_precision),
        CalcField::DEff => (D_EFF_MIN, D_EFF_MAX, config.decline_precision),
    };
    let lo = lo.min(hi);

    let min = if min.is_nan() { lo } else { min.clamp(lo, hi) };
    let max = if max.is_nan() { hi } else { max.clamp(lo, hi) };
    let min = round_to(min, decimals, Rounding::Up);
    let max = round_to(max, decimals, Rounding::Down);

    if min <= max {
        [min, max]
    } else {
        [current, current]
    }
}

/// Full bound span for every field in `fields` except `target`.
pub fn default_calc_range<S: SegmentModel>(segment: &S, fields: &[CalcField], target: CalcField) -> CalcRange {
    let config = segment.config();
    let bounds = &config.bounds;
    let mut range = CalcRange::new();
    for &field in fields.iter().filter(|&&field| field != target) {
        let (lo, hi, current) = match field {
            CalcField::EndIdx => (segment.start_idx(), bounds.date_idx_large, segment.end_idx()),
            CalcField::QStart => (bounds.numeric_small, bounds.numeric_large, segment.q_start()),
            CalcField::QEnd => (bounds.numeric_small, bounds.numeric_large, segment.q_end()),
            CalcField::DEff => (D_EFF_MIN, D_EFF_MAX, D_EFF_MIN),
        };
        let [min, max] = range_entry(config, field, lo, hi, current, segment.start_idx());
        range.insert(field, min, max);
    }
    range
}

// =============================================================================
// TERMINAL INDEX
// =============================================================================

/// End index of a terminal-rate action.
///
/// Candidates are the index at which the rate reaches the cut-off
/// (`rate_cutoff_idx`) and the well-life index; each is floored and only
/// counts if it does not precede `start`. The earlier candidate wins.
pub fn q_final_end_idx(
    config: &EngineConfig,
    q_final: &QFinalConfig,
    info: &ProductionInfo,
    first_segment: &Segment,
    start: f64,
    rate_cutoff_idx: Option<f64>,
) -> SegmentResult<f64> {
    let first_start = DayIndex::from_f64(first_segment.start_idx());
    let well_life_idx = resolve_well_life(&q_final.well_life, info, first_start).map(DayIndex::as_f64);

    let floored = |idx: f64| round_index(config, idx, Rounding::Down);
    let end = [rate_cutoff_idx, well_life_idx]
        .into_iter()
        .flatten()
        .filter(|idx| idx.is_finite())
        .map(floored)
        .filter(|&idx| idx >= start)
        .reduce(f64::min)
        .ok_or_else(|| {
            SegmentError::not_satisfiable("neither the terminal rate nor the well life ends this segment")
        })?;

    if end > config.bounds.date_idx_large {
        return Err(SegmentError::too_large("end_idx", end, config.bounds.date_idx_large));
    }
    Ok(end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_valid_input() {
        assert_eq!(check_valid_input(Some(5.0), 0.0, 10.0), Some(5.0));
        assert_eq!(check_valid_input(Some(11.0), 0.0, 10.0), None);
        assert_eq!(check_valid_input(Some(f64::NAN), 0.0, 10.0), None);
        assert_eq!(check_valid_input(None, 0.0, 10.0), None);
    }

    #[test]
    fn test_check_rate_directions() {
        let bounds = SegmentBounds::new(1.0, 100.0, 0.0, 1000.0);
        assert_eq!(check_rate(&bounds, "q_start", 50.0), Ok(50.0));
        assert_eq!(
            check_rate(&bounds, "q_start", 500.0),
            Err(SegmentError::too_large("q_start", 500.0, 100.0))
        );
        assert_eq!(
            check_rate(&bounds, "q_end", 0.5),
            Err(SegmentError::too_small("q_end", 0.5, 1.0))
        );
        assert!(matches!(
            check_rate(&bounds, "q_end", f64::NAN),
            Err(SegmentError::Unsolvable { .. })
        ));
        assert_eq!(
            check_rate(&bounds, "q_start", f64::INFINITY),
            Err(SegmentError::too_large("q_start", f64::INFINITY, 100.0))
        );
    }

    #[test]
    fn test_check_index_respects_lower() {
        let bounds = SegmentBounds::new(1.0, 100.0, 0.0, 1000.0);
        assert!(check_index(&bounds, "end_idx", 50.0, 100.0).is_err());
        assert_eq!(check_index(&bounds, "end_idx", 150.0, 100.0), Ok(150.0));
        assert!(check_index(&bounds, "end_idx", 1001.0, 100.0).is_err());
    }

    #[test]
    fn test_check_d_eff() {
        assert!(check_d_eff("D_eff", 0.5).is_ok());
        assert!(matches!(
            check_d_eff("D_eff", 0.005),
            Err(SegmentError::DeclineOutOfRange { .. })
        ));
        assert!(check_d_eff("D_eff", 1.0).is_err());
    }

    #[test]
    fn test_resolve_window() {
        let bounds = SegmentBounds::new(1.0, 100.0, 0.0, 1000.0);
        let raw = RawSegment::new().with("start_idx", 100.0).with("end_idx", 400.0);
        assert_eq!(resolve_window(&raw, &bounds), (100.0, 400.0));

        let raw = RawSegment::new().with("start_idx", 900.0).with("end_idx", 10.0);
        assert_eq!(resolve_window(&raw, &bounds), (900.0, 1000.0));

        assert_eq!(resolve_window(&RawSegment::new(), &bounds), (0.0, 365.0));
    }

    #[test]
    fn test_range_entry_rounding_and_collapse() {
        let config = EngineConfig::default().with_rate_precision(2);
        assert_eq!(range_entry(&config, CalcField::QStart, 1.231, 9.876, 5.0, 0.0), [1.24, 9.87]);
        assert_eq!(range_entry(&config, CalcField::QStart, 1.231, 1.235, 1.233, 0.0), [1.233, 1.233]);
        assert_eq!(range_entry(&config, CalcField::DEff, f64::NAN, 2.0, 0.5, 0.0), [D_EFF_MIN, D_EFF_MAX]);
        assert_eq!(range_entry(&config, CalcField::EndIdx, 10.0, f64::INFINITY, 50.0, 20.0), [20.0, 100_000.0]);
    }

    #[test]
    fn test_calc_range_serializes_with_field_names() {
        let mut range = CalcRange::new();
        range.insert(CalcField::DEff, 0.1, 0.2);
        range.insert(CalcField::EndIdx, 10.0, 20.0);
        let value = serde_json::to_value(&range).unwrap();
        assert_eq!(value["D_eff"][1], 0.2);
        assert_eq!(value["end_idx"][0], 10.0);
        assert!(range.contains(CalcField::EndIdx, 15.0));
        assert!(!range.contains(CalcField::QEnd, 15.0));
    }
}
