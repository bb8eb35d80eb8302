//! Modified Arps segment: hyperbolic decline switching to exponential.

use dca_config::EngineConfig;
use dca_curves::constants::D_EFF_MAX;
use dca_curves::modified_arps::{switch_point, ModifiedArps as ModifiedArpsCurve};
use dca_curves::{arps, DeclineCurve};

use crate::contract::{
    check_valid_input, connect_after, CalcField, CalcInput, CalcRange, Generate, QEndTarget, QFinalConfig,
    SegmentModel, DEFAULT_TARGET_D_EFF_SW,
};
use crate::error::{SegmentError, SegmentResult};
use crate::raw::RawSegment;
use crate::record::{slope_of, ModifiedArpsParams, SegmentKind, SegmentRecord};
use crate::variants::decline::{self, check_b, generate_window, raw_b, DeclineVariant, ModifiedKernel, Window};
use crate::variants::Segment;
use crate::well_life::ProductionInfo;

/// A hyperbolic segment that switches to exponential decline once its
/// instantaneous decline reaches `target_D_eff_sw`.
///
/// The switch fields (`sw_idx`, `q_sw`, `D_exp`, `D_exp_eff`,
/// `realized_D_eff_sw`) are derived and kept in the record.
#[derive(Debug, Clone, PartialEq)]
pub struct ModifiedArps {
    params: ModifiedArpsParams,
    config: EngineConfig,
}

impl ModifiedArps {
    fn build(config: &EngineConfig, b: f64, target_d_eff_sw: f64, w: Window) -> Self {
        let sw = switch_point(w.start, w.q_start, w.d, b, target_d_eff_sw);
        let q_end = ModifiedArpsCurve::from_switch(w.q_start, w.d, b, w.start, &sw).rate(w.end);
        Self {
            params: ModifiedArpsParams {
                start_idx: w.start,
                end_idx: w.end,
                q_start: w.q_start,
                q_end,
                b,
                d: w.d,
                d_eff: arps::d_to_d_eff(w.d, b),
                target_d_eff_sw,
                realized_d_eff_sw: sw.realized_d_eff_sw,
                sw_idx: sw.sw_idx,
                q_sw: sw.q_sw,
                d_exp: sw.d_exp,
                d_exp_eff: sw.d_exp_eff,
                slope: slope_of(w.q_start, q_end),
            },
            config: *config,
        }
    }

    fn curve(&self) -> ModifiedArpsCurve {
        let p = &self.params;
        ModifiedArpsCurve::new(p.q_start, p.d, p.b, p.start_idx, p.target_d_eff_sw)
    }

    /// The record parameters.
    #[must_use]
    pub fn params(&self) -> &ModifiedArpsParams {
        &self.params
    }
}

impl Generate for ModifiedArps {
    fn generate(raw: &RawSegment, config: &EngineConfig) -> Self {
        let b = raw_b(raw);
        let target = check_valid_input(raw.get_f64("target_D_eff_sw"), 0.0, D_EFF_MAX).unwrap_or_else(|| {
            log::debug!("target_D_eff_sw missing or out of range, using {DEFAULT_TARGET_D_EFF_SW}");
            DEFAULT_TARGET_D_EFF_SW
        });
        let kernel = ModifiedKernel {
            b,
            target_d_eff_sw: target,
            solver: config.solver_config(),
        };
        Self::build(config, b, target, generate_window(&kernel, raw, config))
    }
}

impl DeclineVariant for ModifiedArps {
    type Kernel = ModifiedKernel;

    fn kernel(&self) -> ModifiedKernel {
        ModifiedKernel {
            b: self.params.b,
            target_d_eff_sw: self.params.target_d_eff_sw,
            solver: self.config.solver_config(),
        }
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
        Self::build(&self.config, self.params.b, self.params.target_d_eff_sw, window)
    }
}

impl SegmentModel for ModifiedArps {
    fn name(&self) -> &'static str {
        SegmentKind::ModifiedArps.as_str()
    }

    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn record(&self) -> SegmentRecord {
        SegmentRecord::ModifiedArps(self.params)
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

    /// Replaces `b`, keeping `D_eff` and the switch target.
    fn change_b(&self, value: f64) -> SegmentResult<Self> {
        let b = check_b(value)?;
        let reshaped = Self::build(&self.config, b, self.params.target_d_eff_sw, self.window());
        let d = arps::d_eff_to_d(self.params.d_eff, b);
        decline::validated(&reshaped, Window { d, ..self.window() })
    }

    /// Replaces the switch target; `0` disables the switch.
    fn change_target_d_eff_sw(&self, value: f64) -> SegmentResult<Self> {
        if !(value.is_finite() && (0.0..=D_EFF_MAX).contains(&value)) {
            return Err(SegmentError::DeclineOutOfRange {
                field: "target_D_eff_sw".to_string(),
                value,
                min: 0.0,
                max: D_EFF_MAX,
            });
        }
        let retargeted = Self::build(&self.config, self.params.b, value, self.window());
        decline::validated(&retargeted, self.window())
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
