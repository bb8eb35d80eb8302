//! Constant-rate segment.

use dca_config::EngineConfig;
use dca_curves::{DeclineCurve, Flat as FlatCurve};

use crate::contract::{
    check_index, check_rate, check_valid_input, connect_after, default_calc_range, q_final_end_idx,
    resolve_window, CalcField, CalcInput, CalcRange, Generate, QEndTarget, QFinalConfig, SegmentModel,
    DEFAULT_Q_START,
};
use crate::error::SegmentResult;
use crate::raw::RawSegment;
use crate::record::{FlatParams, SegmentKind, SegmentRecord};
use crate::variants::Segment;
use crate::well_life::ProductionInfo;

/// A constant rate over a window.
#[derive(Debug, Clone, PartialEq)]
pub struct Flat {
    params: FlatParams,
    config: EngineConfig,
}

impl Flat {
    fn build(config: &EngineConfig, start_idx: f64, end_idx: f64, rate: f64) -> Self {
        Self {
            params: FlatParams {
                start_idx,
                end_idx,
                q_start: rate,
                q_end: rate,
                slope: 0.0,
            },
            config: *config,
        }
    }

    fn with_rate(&self, field: &str, rate: f64) -> SegmentResult<Self> {
        let rate = check_rate(&self.config.bounds, field, rate)?;
        Ok(Self::build(&self.config, self.params.start_idx, self.params.end_idx, rate))
    }

    fn curve(&self) -> FlatCurve {
        FlatCurve::new(self.params.q_start)
    }

    /// The record parameters.
    #[must_use]
    pub fn params(&self) -> &FlatParams {
        &self.params
    }
}

impl Generate for Flat {
    fn generate(raw: &RawSegment, config: &EngineConfig) -> Self {
        let bounds = &config.bounds;
        let (start, end) = resolve_window(raw, bounds);
        let valid = |key| check_valid_input(raw.get_f64(key), bounds.numeric_small, bounds.numeric_large);
        let rate = valid("q_start").or_else(|| valid("q_end")).unwrap_or_else(|| {
            log::debug!("flat segment has no valid rate, using default");
            bounds.clamp_rate(DEFAULT_Q_START)
        });
        Self::build(config, start, end, rate)
    }
}

impl SegmentModel for Flat {
    fn name(&self) -> &'static str {
        SegmentKind::Flat.as_str()
    }

    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn record(&self) -> SegmentRecord {
        SegmentRecord::Flat(self.params)
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

    fn form_calc_range(&self, target: CalcField) -> CalcRange {
        default_calc_range(self, &[CalcField::EndIdx, CalcField::QStart, CalcField::QEnd], target)
    }

    fn change_q_start(&self, value: f64) -> SegmentResult<Self> {
        self.with_rate("q_start", value)
    }

    fn change_q_end(&self, value: f64, _target: QEndTarget) -> SegmentResult<Self> {
        self.with_rate("q_end", value)
    }

    fn button_q_final(
        &self,
        config: &QFinalConfig,
        info: &ProductionInfo,
        first_segment: &Segment,
    ) -> SegmentResult<Self> {
        let end = q_final_end_idx(&self.config, config, info, first_segment, self.params.start_idx, None)?;
        Ok(Self::build(&self.config, self.params.start_idx, end, self.params.q_start))
    }

    fn button_anchor_prev(&self, prev: &Segment) -> SegmentResult<Self> {
        self.with_rate("q_start", prev.q_end())
    }

    fn button_anchor_next(&self, next: &Segment) -> SegmentResult<Self> {
        self.with_rate("q_end", next.q_start())
    }

    fn button_connect_prev(&self, prev: &Segment) -> SegmentResult<Self> {
        connect_after(self, prev)
    }

    fn calc_q_start(&self, input: &CalcInput) -> SegmentResult<Self> {
        self.calc_window(input, "q_start", input.q_end.unwrap_or(self.params.q_end))
    }

    fn calc_q_end(&self, input: &CalcInput) -> SegmentResult<Self> {
        self.calc_window(input, "q_end", input.q_start.unwrap_or(self.params.q_start))
    }
}

impl Flat {
    fn calc_window(&self, input: &CalcInput, field: &str, rate: f64) -> SegmentResult<Self> {
        let bounds = &self.config.bounds;
        let start = input.start_idx.unwrap_or(self.params.start_idx);
        let start = check_index(bounds, "start_idx", start, bounds.date_idx_small)?;
        let end = check_index(bounds, "end_idx", input.end_idx.unwrap_or(self.params.end_idx), start)?;
        let rate = check_rate(bounds, field, rate)?;
        Ok(Self::build(&self.config, start, end, rate))
    }
}
