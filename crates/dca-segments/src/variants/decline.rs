//! Operations shared by the decline families.
//!
//! A decline segment is fully determined by its window `(start, end)`, its
//! start rate and its nominal decline `D`, plus family shape parameters
//! held by its [`Kernel`]. Every operation here solves for one of those
//! four values with the kernel's closed forms and rebuilds the segment.

use dca_config::EngineConfig;
use dca_curves::constants::{B_MAX, B_MIN, D_EFF_MAX, D_EFF_MIN};
use dca_curves::modified_arps::{self, ModifiedArps as ModifiedArpsCurve};
use dca_curves::{arps, exponential, DeclineCurve, Exponential, Hyperbolic};
use dca_math::rounding::Rounding;
use dca_math::solvers::SolverConfig;

use crate::contract::{
    check_d_eff, check_index, check_rate, check_valid_input, q_final_end_idx, range_entry, resolve_window,
    round_index, CalcField, CalcInput, CalcRange, QEndTarget, QFinalConfig, SegmentModel, DEFAULT_B,
    DEFAULT_Q_END, DEFAULT_Q_START, DEFAULT_WINDOW_DAYS,
};
use crate::error::{SegmentError, SegmentResult};
use crate::raw::RawSegment;
use crate::variants::Segment;
use crate::well_life::ProductionInfo;

/// Effective decline used when raw input gives no way to derive one.
const FALLBACK_D_EFF: f64 = 0.5;

// =============================================================================
// KERNELS
// =============================================================================

/// Closed forms of one decline family with fixed shape parameters.
pub(crate) trait Kernel {
    /// Curve type of the family.
    type Curve: DeclineCurve;

    /// The curve through `(start, q_start)` with nominal decline `d`.
    fn curve(&self, q_start: f64, d: f64, start: f64) -> Self::Curve;

    /// Effective annual decline to nominal.
    fn d_eff_to_d(&self, d_eff: f64) -> f64;

    /// Nominal decline to effective annual.
    fn d_to_d_eff(&self, d: f64) -> f64;

    /// Nominal decline of the curve through both points.
    fn fit_d(&self, q_start: f64, q_end: f64, start: f64, end: f64) -> Option<f64>;

    /// `q(start + dt) / q_start`.
    fn ratio(&self, d: f64, dt: f64) -> f64 {
        self.curve(1.0, d, 0.0).rate(dt)
    }

    /// Days until the rate has fallen to `ratio · q_start`.
    fn offset_to_ratio(&self, d: f64, ratio: f64) -> Option<f64> {
        self.curve(1.0, d, 0.0).time_to_rate(ratio)
    }
}

pub(crate) struct ExpKernel;

impl Kernel for ExpKernel {
    type Curve = Exponential;

    fn curve(&self, q_start: f64, d: f64, start: f64) -> Exponential {
        Exponential::new(q_start, d, start)
    }

    fn d_eff_to_d(&self, d_eff: f64) -> f64 {
        exponential::d_eff_to_d(d_eff)
    }

    fn d_to_d_eff(&self, d: f64) -> f64 {
        exponential::d_to_d_eff(d)
    }

    fn fit_d(&self, q_start: f64, q_end: f64, start: f64, end: f64) -> Option<f64> {
        exponential::d_from_rates(q_start, q_end, start, end)
    }
}

pub(crate) struct ArpsKernel {
    pub b: f64,
}

impl Kernel for ArpsKernel {
    type Curve = Hyperbolic;

    fn curve(&self, q_start: f64, d: f64, start: f64) -> Hyperbolic {
        Hyperbolic::new(q_start, d, self.b, start)
    }

    fn d_eff_to_d(&self, d_eff: f64) -> f64 {
        arps::d_eff_to_d(d_eff, self.b)
    }

    fn d_to_d_eff(&self, d: f64) -> f64 {
        arps::d_to_d_eff(d, self.b)
    }

    fn fit_d(&self, q_start: f64, q_end: f64, start: f64, end: f64) -> Option<f64> {
        arps::d_from_rates(q_start, q_end, self.b, start, end)
    }
}

pub(crate) struct ModifiedKernel {
    pub b: f64,
    pub target_d_eff_sw: f64,
    pub solver: SolverConfig,
}

impl Kernel for ModifiedKernel {
    type Curve = ModifiedArpsCurve;

    fn curve(&self, q_start: f64, d: f64, start: f64) -> ModifiedArpsCurve {
        ModifiedArpsCurve::new(q_start, d, self.b, start, self.target_d_eff_sw)
    }

    fn d_eff_to_d(&self, d_eff: f64) -> f64 {
        arps::d_eff_to_d(d_eff, self.b)
    }

    fn d_to_d_eff(&self, d: f64) -> f64 {
        arps::d_to_d_eff(d, self.b)
    }

    fn fit_d(&self, q_start: f64, q_end: f64, start: f64, end: f64) -> Option<f64> {
        modified_arps::get_d(q_start, q_end, start, end, self.b, self.target_d_eff_sw, &self.solver)
    }
}

// =============================================================================
// VARIANT PLUMBING
// =============================================================================

/// The four free values of a decline segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Window {
    pub start: f64,
    pub end: f64,
    pub q_start: f64,
    pub d: f64,
}

/// A segment variant backed by a [`Kernel`].
pub(crate) trait DeclineVariant: SegmentModel {
    type Kernel: Kernel;

    fn kernel(&self) -> Self::Kernel;

    fn window(&self) -> Window;

    /// A segment with the same shape parameters on a new window.
    fn with_window(&self, window: Window) -> Self;
}

/// Rebuilds `segment` on `window`, reporting the first violated bound.
pub(crate) fn validated<V: DeclineVariant>(segment: &V, window: Window) -> SegmentResult<V> {
    let bounds = segment.bounds();
    check_index(bounds, "start_idx", window.start, bounds.date_idx_small)?;
    check_index(bounds, "end_idx", window.end, window.start)?;
    check_rate(bounds, "q_start", window.q_start)?;
    if !window.d.is_finite() {
        return Err(SegmentError::unsolvable("decline is not a finite number"));
    }
    let next = segment.with_window(window);
    check_rate(bounds, "q_end", next.q_end())?;
    Ok(next)
}

/// Derives the window of a decline segment from raw input.
///
/// `D_eff` is taken from `D_eff`, then `D`, then a fit through `q_end`,
/// and finally [`FALLBACK_D_EFF`]; it is clamped into
/// `[D_EFF_MIN, D_EFF_MAX]`. A window whose end rate would fall below the
/// smallest rate is shortened to the day that rate is reached.
pub(crate) fn generate_window<K: Kernel>(kernel: &K, raw: &RawSegment, config: &EngineConfig) -> Window {
    let bounds = &config.bounds;
    let (start, mut end) = resolve_window(raw, bounds);
    let q_start = check_valid_input(raw.get_f64("q_start"), bounds.numeric_small, bounds.numeric_large)
        .unwrap_or_else(|| {
            log::debug!("q_start missing or out of bounds, using default");
            bounds.clamp_rate(DEFAULT_Q_START)
        });

    let d_eff = raw_d_eff(kernel, raw, config, start, end, q_start).clamp(D_EFF_MIN, D_EFF_MAX);
    let d = kernel.d_eff_to_d(d_eff);

    if q_start * kernel.ratio(d, end - start) < bounds.numeric_small {
        if let Some(offset) = kernel.offset_to_ratio(d, bounds.numeric_small / q_start) {
            end = round_index(config, start + offset, Rounding::Down).max(start).min(end);
            log::debug!("end rate below the smallest rate, end_idx shortened to {end}");
        }
    }

    Window { start, end, q_start, d }
}

fn raw_d_eff<K: Kernel>(kernel: &K, raw: &RawSegment, config: &EngineConfig, start: f64, end: f64, q_start: f64) -> f64 {
    if let Some(d_eff) = check_valid_input(raw.get_f64("D_eff"), D_EFF_MIN, D_EFF_MAX) {
        return d_eff;
    }

    let from_d = raw
        .get_f64("D")
        .filter(|d| *d > 0.0)
        .map(|d| kernel.d_to_d_eff(d));
    if let Some(d_eff) = check_valid_input(from_d, D_EFF_MIN, D_EFF_MAX) {
        return d_eff;
    }

    let bounds = &config.bounds;
    let q_end = check_valid_input(raw.get_f64("q_end"), bounds.numeric_small, bounds.numeric_large)
        .filter(|q| *q < q_start)
        .unwrap_or_else(|| {
            log::debug!("no usable decline in raw input, synthesizing default");
            let fallback = bounds.clamp_rate(DEFAULT_Q_END);
            if fallback < q_start {
                fallback
            } else {
                q_start * 0.5
            }
        });
    let fit_end = if end > start { end } else { start + DEFAULT_WINDOW_DAYS };

    kernel
        .fit_d(q_start, q_end, start, fit_end)
        .map(|d| kernel.d_to_d_eff(d))
        .filter(|d_eff| d_eff.is_finite())
        .unwrap_or(FALLBACK_D_EFF)
}

/// Hyperbolic exponent of raw input, defaulting to [`DEFAULT_B`].
pub(crate) fn raw_b(raw: &RawSegment) -> f64 {
    check_valid_input(raw.get_f64("b"), B_MIN, B_MAX).unwrap_or_else(|| {
        log::debug!("b missing or out of range, using {DEFAULT_B}");
        DEFAULT_B
    })
}

/// Requires a hyperbolic exponent inside `[B_MIN, B_MAX]`.
pub(crate) fn check_b(value: f64) -> SegmentResult<f64> {
    if value.is_nan() {
        return Err(SegmentError::unsolvable("b is not a number"));
    }
    if value > B_MAX {
        return Err(SegmentError::too_large("b", value, B_MAX));
    }
    if value < B_MIN {
        return Err(SegmentError::too_small("b", value, B_MIN));
    }
    Ok(value)
}

// =============================================================================
// EDITOR RANGES
// =============================================================================

/// Editor ranges of a decline segment.
///
/// Each bound comes from the extreme segment that puts the solved field at
/// one of its limits: a rate at the rate bounds, the end index at the
/// index bound, or `D_eff` at `D_EFF_MIN`/`D_EFF_MAX`.
pub(crate) fn calc_range<V: DeclineVariant>(segment: &V, target: CalcField) -> CalcRange {
    let kernel = segment.kernel();
    let bounds = segment.bounds();
    let w = segment.window();
    let (q_start, q_end) = (w.q_start, segment.q_end());
    let dt = w.end - w.start;
    let span = bounds.date_idx_large - w.start;
    let d_lo = kernel.d_eff_to_d(D_EFF_MIN);
    let d_hi = kernel.d_eff_to_d(D_EFF_MAX);

    let fit_eff = |q0: f64, q1: f64, end: f64| kernel.fit_d(q0, q1, w.start, end).map(|d| kernel.d_to_d_eff(d));
    let reach = |d: f64, ratio: f64| kernel.offset_to_ratio(d, ratio).map_or(f64::NAN, |offset| w.start + offset);

    let entries = match target {
        CalcField::EndIdx => [
            (CalcField::QStart, q_end, q_end / kernel.ratio(w.d, span)),
            (CalcField::QEnd, q_start * kernel.ratio(w.d, span), q_start),
            (
                CalcField::DEff,
                fit_eff(q_start, q_end, bounds.date_idx_large).unwrap_or(D_EFF_MIN),
                D_EFF_MAX,
            ),
        ],
        CalcField::QStart => [
            (CalcField::EndIdx, w.start, reach(w.d, q_end / bounds.numeric_large)),
            (CalcField::QEnd, bounds.numeric_small, bounds.numeric_large * kernel.ratio(w.d, dt)),
            (
                CalcField::DEff,
                D_EFF_MIN,
                fit_eff(bounds.numeric_large, q_end, w.end).unwrap_or(D_EFF_MAX),
            ),
        ],
        CalcField::QEnd => [
            (CalcField::EndIdx, w.start, reach(w.d, bounds.numeric_small / q_start)),
            (CalcField::QStart, bounds.numeric_small / kernel.ratio(w.d, dt), bounds.numeric_large),
            (
                CalcField::DEff,
                D_EFF_MIN,
                fit_eff(q_start, bounds.numeric_small, w.end).unwrap_or(D_EFF_MAX),
            ),
        ],
        CalcField::DEff => [
            (CalcField::EndIdx, reach(d_hi, q_end / q_start), reach(d_lo, q_end / q_start)),
            (CalcField::QStart, q_end / kernel.ratio(d_lo, dt), q_end / kernel.ratio(d_hi, dt)),
            (CalcField::QEnd, q_start * kernel.ratio(d_hi, dt), q_start * kernel.ratio(d_lo, dt)),
        ],
    };

    let mut range = CalcRange::new();
    for (field, min, max) in entries {
        let current = match field {
            CalcField::EndIdx => w.end,
            CalcField::QStart => q_start,
            CalcField::QEnd => q_end,
            CalcField::DEff => kernel.d_to_d_eff(w.d),
        };
        let [min, max] = range_entry(segment.config(), field, min, max, current, w.start);
        range.insert(field, min, max);
    }
    range
}

// =============================================================================
// CHANGE OPERATIONS
// =============================================================================

pub(crate) fn change_q_start<V: DeclineVariant>(segment: &V, value: f64) -> SegmentResult<V> {
    let q_start = check_rate(segment.bounds(), "q_start", value)?;
    validated(segment, Window { q_start, ..segment.window() })
}

pub(crate) fn change_q_end<V: DeclineVariant>(segment: &V, value: f64, target: QEndTarget) -> SegmentResult<V> {
    let kernel = segment.kernel();
    let w = segment.window();
    let q_end = check_rate(segment.bounds(), "q_end", value)?;

    match target {
        QEndTarget::DEff => {
            let d = kernel
                .fit_d(w.q_start, q_end, w.start, w.end)
                .ok_or_else(|| SegmentError::unsolvable(format!("no {} decline reaches q_end {q_end}", segment.name())))?;
            check_d_eff("D_eff", kernel.d_to_d_eff(d))?;
            validated(segment, Window { d, ..w })
        }
        QEndTarget::EndIdx => {
            let offset = kernel
                .offset_to_ratio(w.d, q_end / w.q_start)
                .ok_or_else(|| SegmentError::unsolvable(format!("the curve never reaches q_end {q_end}")))?;
            let end = round_index(segment.config(), w.start + offset, Rounding::Nearest);
            check_index(segment.bounds(), "end_idx", end, w.start)?;
            validated(segment, Window { end, ..w })
        }
    }
}

pub(crate) fn change_d_eff<V: DeclineVariant>(segment: &V, value: f64) -> SegmentResult<V> {
    let d_eff = check_d_eff("D_eff", value)?;
    let d = segment.kernel().d_eff_to_d(d_eff);
    validated(segment, Window { d, ..segment.window() })
}

// =============================================================================
// BUTTONS
// =============================================================================

pub(crate) fn button_q_final<V: DeclineVariant>(
    segment: &V,
    config: &QFinalConfig,
    info: &ProductionInfo,
    first_segment: &Segment,
) -> SegmentResult<V> {
    let w = segment.window();
    let curve = segment.kernel().curve(w.q_start, w.d, w.start);
    let rate_cutoff_idx = config
        .q_final
        .filter(|q| q.is_finite() && *q > 0.0)
        .and_then(|q| curve.time_to_rate(q));
    let end = q_final_end_idx(segment.config(), config, info, first_segment, w.start, rate_cutoff_idx)?;
    validated(segment, Window { end, ..w })
}

pub(crate) fn button_anchor_prev<V: DeclineVariant>(segment: &V, prev: &Segment) -> SegmentResult<V> {
    let q_start = check_rate(segment.bounds(), "q_start", prev.q_end())?;
    validated(segment, Window { q_start, ..segment.window() })
}

pub(crate) fn button_anchor_next<V: DeclineVariant>(segment: &V, next: &Segment) -> SegmentResult<V> {
    let w = segment.window();
    let q_end = check_rate(segment.bounds(), "q_end", next.q_start())?;
    let q_start = q_end / segment.kernel().ratio(w.d, w.end - w.start);
    let q_start = check_rate(segment.bounds(), "q_start", q_start)?;
    validated(segment, Window { q_start, ..w })
}

pub(crate) fn button_match_slope<V: DeclineVariant>(segment: &V, prev: &Segment) -> SegmentResult<V> {
    let w = segment.window();
    let q_prev = prev.rate(w.start);
    if !(q_prev.is_finite() && q_prev > 0.0) {
        return Err(SegmentError::unsolvable(
            "previous segment has no positive rate at this segment's start",
        ));
    }
    let d = -prev.derivative(prev.end_idx()) / q_prev;
    check_d_eff("D_eff", segment.kernel().d_to_d_eff(d))?;
    validated(segment, Window { d, ..w })
}

// =============================================================================
// CALC OPERATIONS
// =============================================================================

fn input_start<V: DeclineVariant>(segment: &V, input: &CalcInput) -> SegmentResult<f64> {
    let bounds = segment.bounds();
    let start = input.start_idx.unwrap_or_else(|| segment.start_idx());
    check_index(bounds, "start_idx", start, bounds.date_idx_small)
}

fn input_window<V: DeclineVariant>(segment: &V, input: &CalcInput) -> SegmentResult<(f64, f64)> {
    let start = input_start(segment, input)?;
    let end = input.end_idx.unwrap_or_else(|| segment.end_idx());
    Ok((start, check_index(segment.bounds(), "end_idx", end, start)?))
}

fn input_q_start<V: DeclineVariant>(segment: &V, input: &CalcInput) -> SegmentResult<f64> {
    check_rate(segment.bounds(), "q_start", input.q_start.unwrap_or_else(|| segment.q_start()))
}

fn input_q_end<V: DeclineVariant>(segment: &V, input: &CalcInput) -> SegmentResult<f64> {
    check_rate(segment.bounds(), "q_end", input.q_end.unwrap_or_else(|| segment.q_end()))
}

fn input_d<V: DeclineVariant>(segment: &V, input: &CalcInput) -> SegmentResult<f64> {
    match input.d_eff {
        Some(d_eff) => Ok(segment.kernel().d_eff_to_d(check_d_eff("D_eff", d_eff)?)),
        None => Ok(segment.window().d),
    }
}

pub(crate) fn calc_q_start<V: DeclineVariant>(segment: &V, input: &CalcInput) -> SegmentResult<V> {
    let (start, end) = input_window(segment, input)?;
    let q_end = input_q_end(segment, input)?;
    let d = input_d(segment, input)?;
    let q_start = q_end / segment.kernel().ratio(d, end - start);
    let q_start = check_rate(segment.bounds(), "q_start", q_start)?;
    validated(segment, Window { start, end, q_start, d })
}

pub(crate) fn calc_end_idx<V: DeclineVariant>(segment: &V, input: &CalcInput) -> SegmentResult<V> {
    let start = input_start(segment, input)?;
    let q_start = input_q_start(segment, input)?;
    let q_end = input_q_end(segment, input)?;
    let d = input_d(segment, input)?;
    let offset = segment
        .kernel()
        .offset_to_ratio(d, q_end / q_start)
        .ok_or_else(|| SegmentError::unsolvable(format!("the curve never reaches q_end {q_end}")))?;
    let end = round_index(segment.config(), start + offset, Rounding::Nearest);
    let end = check_index(segment.bounds(), "end_idx", end, start)?;
    validated(segment, Window { start, end, q_start, d })
}

pub(crate) fn calc_q_end<V: DeclineVariant>(segment: &V, input: &CalcInput) -> SegmentResult<V> {
    let (start, end) = input_window(segment, input)?;
    let q_start = input_q_start(segment, input)?;
    let d = input_d(segment, input)?;
    validated(segment, Window { start, end, q_start, d })
}

pub(crate) fn calc_d_eff<V: DeclineVariant>(segment: &V, input: &CalcInput) -> SegmentResult<V> {
    let kernel = segment.kernel();
    let (start, end) = input_window(segment, input)?;
    let q_start = input_q_start(segment, input)?;
    let q_end = input_q_end(segment, input)?;
    let d = kernel.fit_d(q_start, q_end, start, end).ok_or_else(|| {
        SegmentError::unsolvable(format!(
            "no {} decline passes through q_start {q_start} and q_end {q_end}",
            segment.name()
        ))
    })?;
    check_d_eff("D_eff", kernel.d_to_d_eff(d))?;
    validated(segment, Window { start, end, q_start, d })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use dca_curves::constants::DAYS_PER_YEAR;

    fn assert_offset_inverts_ratio<K: Kernel>(kernel: &K, d: f64) {
        let ratio = kernel.ratio(d, 300.0);
        assert_relative_eq!(kernel.offset_to_ratio(d, ratio).unwrap(), 300.0, max_relative = 1e-9);
    }

    #[test]
    fn test_kernel_ratio_and_offset_agree() {
        assert_offset_inverts_ratio(&ExpKernel, 0.002);
        assert_offset_inverts_ratio(&ArpsKernel { b: 1.3 }, 0.004);
        assert_offset_inverts_ratio(
            &ModifiedKernel {
                b: 1.3,
                target_d_eff_sw: 0.3,
                solver: SolverConfig::default(),
            },
            0.004,
        );
    }

    #[test]
    fn test_raw_d_eff_priority() {
        let config = EngineConfig::default();
        let raw = RawSegment::new().with("D_eff", 0.4).with("D", 0.01).with("q_end", 10.0);
        assert_eq!(raw_d_eff(&ExpKernel, &raw, &config, 0.0, 365.0, 100.0), 0.4);

        let raw = RawSegment::new().with("D", 0.002).with("q_end", 10.0);
        assert_relative_eq!(
            raw_d_eff(&ExpKernel, &raw, &config, 0.0, 365.0, 100.0),
            exponential::d_to_d_eff(0.002)
        );

        // A quarter of the rate left after one year
        let raw = RawSegment::new().with("q_end", 25.0);
        let d_eff = raw_d_eff(&ExpKernel, &raw, &config, 0.0, DAYS_PER_YEAR, 100.0);
        assert_relative_eq!(d_eff, 0.75, max_relative = 1e-12);
    }

    #[test]
    fn test_generate_window_shortens_below_smallest_rate() {
        let config = EngineConfig::default();
        let raw = RawSegment::new()
            .with("start_idx", 0.0)
            .with("end_idx", 90_000.0)
            .with("q_start", 100.0)
            .with("D_eff", 0.9);
        let w = generate_window(&ExpKernel, &raw, &config);
        assert!(w.end < 90_000.0);
        let q_end = 100.0 * ExpKernel.ratio(w.d, w.end - w.start);
        assert!(q_end >= config.bounds.numeric_small);
        assert!(q_end < config.bounds.numeric_small * 1.01);
    }
}
