//! Exponential decline segment.

use dca_config::EngineConfig;
use dca_curves::{exponential, DeclineCurve, Exponential};

use crate::contract::{connect_after, CalcField, CalcInput, CalcRange, Generate, QEndTarget, QFinalConfig, SegmentModel};
use crate::error::SegmentResult;
use crate::raw::RawSegment;
use crate::record::{slope_of, ExpDeclineParams, SegmentKind, SegmentRecord};
use crate::variants::decline::{self, generate_window, DeclineVariant, ExpKernel, Window};
use crate::variants::Segment;
use crate::well_life::ProductionInfo;

/// A segment following `q(t) = q_start · exp(−D · (t − start_idx))`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpDecline {
    params: ExpDeclineParams,
    config: EngineConfig,
}

impl ExpDecline {
    fn build(config: &EngineConfig, w: Window) -> Self {
        let q_end = exponential::q_end_from_start(w.q_start, w.d, w.start, w.end);
        Self {
            params: ExpDeclineParams {
                start_idx: w.start,
                end_idx: w.end,
                q_start: w.q_start,
                q_end,
                d: w.d,
                d_eff: exponential::d_to_d_eff(w.d),
                slope: slope_of(w.q_start, q_end),
            },
            config: *config,
        }
    }

    fn curve(&self) -> Exponential {
        Exponential::new(self.params.q_start, self.params.d, self.params.start_idx)
    }

    /// The record parameters.
    #[must_use]
    pub fn params(&self) -> &ExpDeclineParams {
        &self.params
    }
}

impl Generate for ExpDecline {
    fn generate(raw: &RawSegment, config: &EngineConfig) -> Self {
        Self::build(config, generate_window(&ExpKernel, raw, config))
    }
}

impl DeclineVariant for ExpDecline {
    type Kernel = ExpKernel;

    fn kernel(&self) -> ExpKernel {
        ExpKernel
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
        Self::build(&self.config, window)
    }
}

impl SegmentModel for ExpDecline {
    fn name(&self) -> &'static str {
        SegmentKind::ExpDecline.as_str()
    }

    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn record(&self) -> SegmentRecord {
        SegmentRecord::ExpDecline(self.params)
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
    use crate::error::{Direction, SegmentError};
    use approx::assert_relative_eq;
    use dca_core::Date;

    fn exp(start: f64, end: f64, q_start: f64, d_eff: f64) -> ExpDecline {
        let raw = RawSegment::new()
            .with("start_idx", start)
            .with("end_idx", end)
            .with("q_start", q_start)
            .with("D_eff", d_eff);
        ExpDecline::generate(&raw, &EngineConfig::default())
    }

    #[test]
    fn test_round_trip_decline() {
        let seg = exp(0.0, 365.0, 1000.0, 0.5);
        let solved = seg.calc_d_eff(&CalcInput::new()).unwrap();
        assert_relative_eq!(solved.params().d_eff, 0.5, epsilon = 1e-9);
        assert_relative_eq!(solved.q_end(), seg.q_end(), max_relative = 1e-12);
    }

    #[test]
    fn test_generate_derives_dependent_fields() {
        let seg = exp(0.0, 365.0, 1000.0, 0.5);
        let p = seg.params();
        assert_relative_eq!(p.d, -(0.5_f64).ln() / 365.25, max_relative = 1e-12);
        assert_relative_eq!(p.q_end, 1000.0 * (-p.d * 365.0).exp(), max_relative = 1e-12);
        assert_eq!(p.slope, -1.0);
        assert_eq!(seg.record().kind(), SegmentKind::ExpDecline);
    }

    #[test]
    fn test_integral_matches_riemann_sum() {
        let seg = exp(0.0, 365.0, 1000.0, 0.5);
        let n = 100_000;
        let h = 365.0 / f64::from(n);
        let sum: f64 = (0..n).map(|i| seg.rate((f64::from(i) + 0.5) * h) * h).sum();
        assert_relative_eq!(seg.integral(0.0, 365.0), sum, max_relative = 1e-8);
    }

    #[test]
    fn test_change_q_end_moves_end_idx() {
        let seg = exp(0.0, 100.0, 1000.0, 0.5);
        let moved = seg.change_q_end(500.0, QEndTarget::EndIdx).unwrap();
        assert_eq!(moved.end_idx(), 365.0);
        assert_relative_eq!(moved.params().d_eff, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_change_q_end_refits_decline() {
        let seg = exp(0.0, 365.25, 1000.0, 0.5);
        let refit = seg.change_q_end(250.0, QEndTarget::DEff).unwrap();
        assert_relative_eq!(refit.params().d_eff, 0.75, max_relative = 1e-9);
        assert_eq!(refit.end_idx(), 365.25);

        assert!(matches!(
            seg.change_q_end(1500.0, QEndTarget::DEff),
            Err(SegmentError::DeclineOutOfRange { .. })
        ));
    }

    #[test]
    fn test_change_d_eff_bounds() {
        let seg = exp(0.0, 365.0, 1000.0, 0.5);
        assert!(matches!(
            seg.change_d_eff(1.5),
            Err(SegmentError::DeclineOutOfRange { .. })
        ));
        let changed = seg.change_d_eff(0.2).unwrap();
        assert_relative_eq!(changed.params().d_eff, 0.2, max_relative = 1e-12);
        assert_eq!(changed.q_start(), 1000.0);
    }

    #[test]
    fn test_calc_end_idx_rejects_small_rate() {
        let seg = exp(0.0, 365.0, 1000.0, 0.5);
        let err = seg.calc_end_idx(&CalcInput::new().with_q_end(1e-6)).unwrap_err();
        assert!(matches!(
            err,
            SegmentError::OutOfRange {
                direction: Direction::TooSmall,
                ..
            }
        ));

        let err = seg.calc_end_idx(&CalcInput::new().with_q_end(1.0).with_d_eff(0.01)).unwrap_err();
        assert!(matches!(
            err,
            SegmentError::OutOfRange {
                direction: Direction::TooLarge,
                ..
            }
        ));
    }

    #[test]
    fn test_calc_q_start_hits_upper_bound() {
        let seg = exp(0.0, 365.0, 1000.0, 0.9);
        let input = CalcInput::new().with_q_end(1e9).with_end_idx(50_000.0);
        assert!(matches!(
            seg.calc_q_start(&input),
            Err(SegmentError::OutOfRange {
                direction: Direction::TooLarge,
                ..
            })
        ));
    }

    #[test]
    fn test_anchor_next_scales_start_rate() {
        let seg = exp(0.0, 365.0, 1000.0, 0.5);
        let next = Segment::ExpDecline(exp(366.0, 700.0, 200.0, 0.3));
        let anchored = seg.button_anchor_next(&next).unwrap();
        assert_relative_eq!(anchored.q_end(), 200.0, max_relative = 1e-12);
        assert_relative_eq!(anchored.params().d_eff, 0.5, max_relative = 1e-12);
    }

    #[test]
    fn test_match_slope_uses_relative_derivative() {
        let prev = exp(0.0, 100.0, 1000.0, 0.5);
        let d_prev = prev.params().d;
        let seg = exp(101.0, 400.0, 300.0, 0.2);
        let matched = seg.button_match_slope(&Segment::ExpDecline(prev)).unwrap();
        assert_relative_eq!(matched.params().d, d_prev * d_prev.exp(), max_relative = 1e-12);
    }

    #[test]
    fn test_q_final_truncates_at_rate() {
        let seg = exp(0.0, 5000.0, 1000.0, 0.5);
        let config = QFinalConfig {
            q_final: Some(100.0),
            ..QFinalConfig::default()
        };
        let info = ProductionInfo::without_data(Date::from_ymd(2024, 1, 1).unwrap());
        let first = Segment::ExpDecline(seg.clone());
        let cut = seg.button_q_final(&config, &info, &first).unwrap();
        // 365.25 · ln 10 / ln 2 = 1213.34
        assert_eq!(cut.end_idx(), 1213.0);
        assert!(cut.q_end() > 100.0);

        let none = QFinalConfig::default();
        assert!(matches!(
            seg.button_q_final(&none, &info, &first),
            Err(SegmentError::NotSatisfiable { .. })
        ));
    }

    #[test]
    fn test_calc_range_end_idx() {
        let seg = exp(0.0, 365.0, 1000.0, 0.5);
        let range = seg.form_calc_range(CalcField::EndIdx);
        assert!(!range.contains(CalcField::EndIdx, 365.0));
        let [min, max] = range.get(CalcField::QStart).unwrap();
        assert!(min <= seg.q_start() && seg.q_start() <= max);
        let [min, max] = range.get(CalcField::DEff).unwrap();
        assert!(min <= 0.5 && 0.5 <= max);
    }
}
