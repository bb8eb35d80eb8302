//! Hyperbolic (Arps) decline segment.

use dca_config::EngineConfig;
use dca_curves::{arps, DeclineCurve, Hyperbolic};

use crate::contract::{connect_after, CalcField, CalcInput, CalcRange, Generate, QEndTarget, QFinalConfig, SegmentModel};
use crate::error::SegmentResult;
use crate::raw::RawSegment;
use crate::record::{slope_of, ArpsParams, SegmentKind, SegmentRecord};
use crate::variants::decline::{self, check_b, generate_window, raw_b, ArpsKernel, DeclineVariant, Window};
use crate::variants::Segment;
use crate::well_life::ProductionInfo;

/// A segment following `q(t) = q_start · (1 + b·D·(t − start_idx))^(−1/b)`.
///
/// `D_eff` is the secant effective decline of the first year.
#[derive(Debug, Clone, PartialEq)]
pub struct Arps {
    params: ArpsParams,
    config: EngineConfig,
}

impl Arps {
    fn build(config: &EngineConfig, b: f64, w: Window) -> Self {
        let q_end = arps::q_end_from_start(w.q_start, w.d, b, w.start, w.end);
        Self {
            params: ArpsParams {
                start_idx: w.start,
                end_idx: w.end,
                q_start: w.q_start,
                q_end,
                b,
                d: w.d,
                d_eff: arps::d_to_d_eff(w.d, b),
                slope: slope_of(w.q_start, q_end),
            },
            config: *config,
        }
    }

    fn curve(&self) -> Hyperbolic {
        Hyperbolic::new(self.params.q_start, self.params.d, self.params.b, self.params.start_idx)
    }

    /// The record parameters.
    #[must_use]
    pub fn params(&self) -> &ArpsParams {
        &self.params
    }
}

impl Generate for Arps {
    fn generate(raw: &RawSegment, config: &EngineConfig) -> Self {
        let b = raw_b(raw);
        Self::build(config, b, generate_window(&ArpsKernel { b }, raw, config))
    }
}

impl DeclineVariant for Arps {
    type Kernel = ArpsKernel;

    fn kernel(&self) -> ArpsKernel {
        ArpsKernel { b: self.params.b }
    }

    fn window(&self) -> Window {
        Window {
            start: self.params.start_idx,
            end: self.params.end_idx,
            q_start: self.params.q_start,
            d: self.params.d,
        }
    }

    fn with_window(&self, window: Window) -> Self {
        Self::build(&self.config, self.params.b, window)
    }
}

impl SegmentModel for Arps {
    fn name(&self) -> &'static str {
        SegmentKind::Arps.as_str()
    }

    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn record(&self) -> SegmentRecord {
        SegmentRecord::Arps(self.params)
    }

    fn rate(&self, t: f64) -> f64 {
        self.curve().rate(t)
    }

    fn derivative(&self, t: f64) -> f64 {
        self.curve().derivative(t)
    }

    fn integral(&self, left: f64, right: f64) -> f64 {
        self.curve().integral(left, right)
    }

    fn inverse_integral(&self, volume: f64, left: f64) -> Option<f64> {
        self.curve().inverse_integral(volume, left)
    }

    fn time_to_rate(&self, q: f64) -> Option<f64> {
        self.curve().time_to_rate(q)
    }

    fn form_calc_range(&self, target: CalcField) -> CalcRange {
        decline::calc_range(self, target)
    }

    fn change_q_start(&self, value: f64) -> SegmentResult<Self> {
        decline::change_q_start(self, value)
    }

    fn change_q_end(&self, value: f64, target: QEndTarget) -> SegmentResult<Self> {
        decline::change_q_end(self, value, target)
    }

    fn change_d_eff(&self, value: f64) -> SegmentResult<Self> {
        decline::change_d_eff(self, value)
    }

    /// Replaces `b`, keeping `D_eff` and re-deriving `D`.
    fn change_b(&self, value: f64) -> SegmentResult<Self> {
        let b = check_b(value)?;
        let reshaped = Self::build(&self.config, b, self.window());
        let d = arps::d_eff_to_d(self.params.d_eff, b);
        decline::validated(&reshaped, Window { d, ..self.window() })
    }

    fn button_q_final(
        &self,
        config: &QFinalConfig,
        info: &ProductionInfo,
        first_segment: &Segment,
    ) -> SegmentResult<Self> {
        decline::button_q_final(self, config, info, first_segment)
    }

    fn button_anchor_prev(&self, prev: &Segment) -> SegmentResult<Self> {
        decline::button_anchor_prev(self, prev)
    }

    fn button_anchor_next(&self, next: &Segment) -> SegmentResult<Self> {
        decline::button_anchor_next(self, next)
    }

    fn button_match_slope(&self, prev: &Segment) -> SegmentResult<Self> {
        decline::button_match_slope(self, prev)
    }

    fn button_connect_prev(&self, prev: &Segment) -> SegmentResult<Self> {
        connect_after(self, prev)
    }

    fn calc_q_start(&self, input: &CalcInput) -> SegmentResult<Self> {
        decline::calc_q_start(self, input)
    }

    fn calc_end_idx(&self, input: &CalcInput) -> SegmentResult<Self> {
        decline::calc_end_idx(self, input)
    }

    fn calc_q_end(&self, input: &CalcInput) -> SegmentResult<Self> {
        decline::calc_q_end(self, input)
    }

    fn calc_d_eff(&self, input: &CalcInput) -> SegmentResult<Self> {
        decline::calc_d_eff(self, input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::DEFAULT_B;
    use crate::error::{Direction, SegmentError};
    use approx::assert_relative_eq;

    fn arps(b: f64, d_eff: f64) -> Arps {
        let raw = RawSegment::new()
            .with("start_idx", 1000.0)
            .with("end_idx", 2000.0)
            .with("q_start", 800.0)
            .with("b", b)
            .with("D_eff", d_eff);
        Arps::generate(&raw, &EngineConfig::default())
    }

    #[test]
    fn test_secant_decline_after_one_year() {
        let seg = arps(1.2, 0.6);
        assert_relative_eq!(seg.rate(1000.0 + 365.25), 800.0 * 0.4, max_relative = 1e-12);
        assert_relative_eq!(seg.q_end(), seg.rate(2000.0), max_relative = 1e-12);
    }

    #[test]
    fn test_b_defaults_when_missing_or_invalid() {
        let seg = Arps::generate(&RawSegment::new().with("b", 50.0), &EngineConfig::default());
        assert_eq!(seg.params().b, DEFAULT_B);
        assert_eq!(seg.start_idx(), 0.0);
        assert!(seg.q_end() < seg.q_start());
    }

    #[test]
    fn test_change_b_keeps_effective_decline() {
        let seg = arps(1.2, 0.6);
        let changed = seg.change_b(0.5).unwrap();
        assert_eq!(changed.params().b, 0.5);
        assert_relative_eq!(changed.params().d_eff, 0.6, max_relative = 1e-12);
        assert_relative_eq!(changed.params().d, arps::d_eff_to_d(0.6, 0.5), max_relative = 1e-12);
        assert!(changed.q_end() < seg.q_end());

        assert!(matches!(
            seg.change_b(12.0),
            Err(SegmentError::OutOfRange {
                direction: Direction::TooLarge,
                ..
            })
        ));
        assert!(matches!(seg.change_b(0.0), Err(SegmentError::OutOfRange { .. })));
    }

    #[test]
    fn test_harmonic_inverse_integral() {
        let seg = arps(1.0, 0.5);
        let volume = seg.integral(1000.0, 1600.0);
        let t = seg.inverse_integral(volume, 1000.0).unwrap();
        assert_relative_eq!(t, 1600.0, max_relative = 1e-9);
    }

    #[test]
    fn test_calc_q_end_with_new_decline() {
        let seg = arps(1.2, 0.6);
        let solved = seg.calc_q_end(&CalcInput::new().with_d_eff(0.3)).unwrap();
        assert!(solved.q_end() > seg.q_end());
        assert_relative_eq!(solved.params().d_eff, 0.3, max_relative = 1e-12);
    }

    #[test]
    fn test_calc_d_eff_round_trip() {
        let seg = arps(0.8, 0.45);
        let solved = seg.calc_d_eff(&CalcInput::new()).unwrap();
        assert_relative_eq!(solved.params().d_eff, 0.45, max_relative = 1e-9);
    }

    #[test]
    fn test_connect_prev_keeps_shape() {
        let seg = arps(1.2, 0.6);
        let prev = Segment::Arps(arps(0.9, 0.4));
        let moved = seg.button_connect_prev(&prev).unwrap();
        assert_eq!(moved.start_idx(), 2001.0);
        assert_eq!(moved.end_idx(), 3001.0);
        assert_eq!(moved.params().b, 1.2);
        assert_relative_eq!(moved.params().d_eff, 0.6, max_relative = 1e-12);
    }
}
