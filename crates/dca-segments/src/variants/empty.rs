//! Zero-production segment.

use dca_config::EngineConfig;
use dca_curves::{DeclineCurve, Flat as FlatCurve};

use crate::contract::{
    default_calc_range, q_final_end_idx, resolve_window, CalcField, CalcRange, Generate, QFinalConfig,
    SegmentModel,
};
use crate::error::SegmentResult;
use crate::raw::RawSegment;
use crate::record::{EmptyParams, SegmentKind, SegmentRecord};
use crate::variants::Segment;
use crate::well_life::ProductionInfo;

/// A shut-in period: the all-zero curve over a window.
///
/// Rate edits are reported as unsupported; neighbour actions return the
/// segment unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Empty {
    params: EmptyParams,
    config: EngineConfig,
}

impl Empty {
    fn build(config: &EngineConfig, start_idx: f64, end_idx: f64) -> Self {
        Self {
            params: EmptyParams {
                start_idx,
                end_idx,
                q_start: 0.0,
                q_end: 0.0,
                slope: 0.0,
            },
            config: *config,
        }
    }

    /// The record parameters.
    #[must_use]
    pub fn params(&self) -> &EmptyParams {
        &self.params
    }
}

impl Generate for Empty {
    fn generate(raw: &RawSegment, config: &EngineConfig) -> Self {
        let (start, end) = resolve_window(raw, &config.bounds);
        Self::build(config, start, end)
    }
}

impl SegmentModel for Empty {
    fn name(&self) -> &'static str {
        SegmentKind::Empty.as_str()
    }

    fn config(&self) -> &EngineConfig {
        &self.config
    }

    fn record(&self) -> SegmentRecord {
        SegmentRecord::Empty(self.params)
    }

    fn rate(&self, t: f64) -> f64 {
        FlatCurve::zero().rate(t)
    }

    fn derivative(&self, t: f64) -> f64 {
        FlatCurve::zero().derivative(t)
    }

    fn integral(&self, left: f64, right: f64) -> f64 {
        FlatCurve::zero().integral(left, right)
    }

    fn inverse_integral(&self, volume: f64, left: f64) -> Option<f64> {
        FlatCurve::zero().inverse_integral(volume, left)
    }

    fn form_calc_range(&self, target: CalcField) -> CalcRange {
        default_calc_range(self, &[CalcField::EndIdx], target)
    }

    fn button_q_final(
        &self,
        config: &QFinalConfig,
        info: &ProductionInfo,
        first_segment: &Segment,
    ) -> SegmentResult<Self> {
        let end = q_final_end_idx(&self.config, config, info, first_segment, self.params.start_idx, None)?;
        Ok(Self::build(&self.config, self.params.start_idx, end))
    }

    fn button_anchor_prev(&self, _prev: &Segment) -> SegmentResult<Self> {
        Ok(self.clone())
    }

    fn button_anchor_next(&self, _next: &Segment) -> SegmentResult<Self> {
        Ok(self.clone())
    }

    fn button_match_slope(&self, _prev: &Segment) -> SegmentResult<Self> {
        Ok(self.clone())
    }

    fn button_connect_prev(&self, _prev: &Segment) -> SegmentResult<Self> {
        Ok(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contract::{CalcInput, QEndTarget};
    use crate::error::SegmentError;

    fn empty() -> Empty {
        let raw = RawSegment::new().with("start_idx", 100.0).with("end_idx", 400.0);
        Empty::generate(&raw, &EngineConfig::default())
    }

    #[test]
    fn test_all_zero_curve() {
        let seg = empty();
        assert_eq!(seg.predict(&[100.0, 250.0, 400.0]), vec![0.0; 3]);
        assert_eq!(seg.integral(100.0, 400.0), 0.0);
        assert_eq!(seg.inverse_integral(1.0, 100.0), None);
        assert_eq!(seg.first_derivative(&[120.0]), vec![0.0]);
        assert_eq!(seg.record().q_end(), 0.0);
    }

    #[test]
    fn test_rate_edits_are_unsupported() {
        let seg = empty();
        let results = [
            seg.change_q_start(10.0),
            seg.change_q_end(5.0, QEndTarget::DEff),
            seg.change_d_eff(0.5),
            seg.change_b(1.0),
            seg.change_target_d_eff_sw(0.1),
            seg.calc_q_start(&CalcInput::new()),
        ];
        for result in results {
            assert!(matches!(
                result,
                Err(SegmentError::Unsupported { segment: "empty", .. })
            ));
        }
    }

    #[test]
    fn test_neighbour_actions_return_self() {
        let seg = empty();
        let other = Segment::Empty(Empty::generate(&RawSegment::new(), &EngineConfig::default()));
        assert_eq!(seg.button_anchor_prev(&other).unwrap(), seg);
        assert_eq!(seg.button_anchor_next(&other).unwrap(), seg);
        assert_eq!(seg.button_match_slope(&other).unwrap(), seg);
        assert_eq!(seg.button_connect_prev(&other).unwrap(), seg);
    }

    #[test]
    fn test_generate_defaults_window() {
        let seg = Empty::generate(&RawSegment::from_json_str("garbage"), &EngineConfig::default());
        assert_eq!(seg.start_idx(), 0.0);
        assert_eq!(seg.end_idx(), 365.0);
    }

    #[test]
    fn test_calc_range_covers_end_idx_only() {
        let range = empty().form_calc_range(CalcField::QStart);
        assert_eq!(range.len(), 1);
        assert_eq!(range.get(CalcField::EndIdx), Some([100.0, 100_000.0]));
    }
}
