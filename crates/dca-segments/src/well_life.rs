//! Well-life resolution.
//!
//! A well-life policy turns production metadata into a terminal day index:
//! a number of years after the first or last production data point, after
//! the evaluation date, or a fixed calendar date. Years are applied as
//! whole months (`round(years · 12)`) with end-of-month clamping.

use serde::{Deserialize, Serialize};

use dca_core::{Date, DayIndex};

/// Anchor of a well-life policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WellLifeMethod {
    /// Years after the first production data point.
    DurationFromFirstData,
    /// Years after the last production data point.
    DurationFromLastData,
    /// Years after the evaluation date.
    #[default]
    DurationFromToday,
    /// A fixed date.
    FixedDate,
}

/// Well-life policy.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WellLifeConfig {
    /// Anchor of the policy.
    #[serde(default)]
    pub method: WellLifeMethod,
    /// Offset in years for the duration methods.
    #[serde(default)]
    pub num: Option<f64>,
    /// Terminal date for [`WellLifeMethod::FixedDate`].
    #[serde(default)]
    pub fixed_date: Option<Date>,
}

impl WellLifeConfig {
    /// A duration policy of `years` from the given anchor.
    #[must_use]
    pub fn duration(method: WellLifeMethod, years: f64) -> Self {
        Self {
            method,
            num: Some(years),
            fixed_date: None,
        }
    }

    /// A fixed-date policy.
    #[must_use]
    pub fn fixed(date: Date) -> Self {
        Self {
            method: WellLifeMethod::FixedDate,
            num: None,
            fixed_date: Some(date),
        }
    }
}

/// Production metadata of a well.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ProductionInfo {
    /// Index of the first production data point.
    #[serde(default)]
    pub first_data_idx: Option<DayIndex>,
    /// Index of the last production data point.
    #[serde(default)]
    pub last_data_idx: Option<DayIndex>,
    /// Evaluation date.
    pub as_of: Date,
}

impl ProductionInfo {
    /// Metadata of a well without production data.
    #[must_use]
    pub fn without_data(as_of: Date) -> Self {
        Self {
            first_data_idx: None,
            last_data_idx: None,
            as_of,
        }
    }
}

/// Resolves a well-life policy to a terminal day index.
///
/// Missing production data falls back to `first_segment_start`. Returns
/// `None`, meaning no well-life constraint, when the offset or date is
/// missing or invalid.
#[must_use]
pub fn resolve_well_life(
    config: &WellLifeConfig,
    info: &ProductionInfo,
    first_segment_start: DayIndex,
) -> Option<DayIndex> {
    let anchor = match config.method {
        WellLifeMethod::FixedDate => return config.fixed_date.map(DayIndex::from_date),
        WellLifeMethod::DurationFromFirstData => info.first_data_idx.unwrap_or(first_segment_start),
        WellLifeMethod::DurationFromLastData => info.last_data_idx.unwrap_or(first_segment_start),
        WellLifeMethod::DurationFromToday => DayIndex::from_date(info.as_of),
    };

    let years = config.num.filter(|n| n.is_finite() && *n >= 0.0)?;
    let months = (years * 12.0).round();
    if months > f64::from(i32::MAX) {
        return None;
    }
    anchor.add_months(months as i32).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd(y, m, d).unwrap()
    }

    fn info() -> ProductionInfo {
        ProductionInfo {
            first_data_idx: Some(DayIndex::from_date(date(2015, 1, 31))),
            last_data_idx: Some(DayIndex::from_date(date(2020, 6, 30))),
            as_of: date(2024, 2, 29),
        }
    }

    #[test]
    fn test_duration_from_first_data() {
        let config = WellLifeConfig::duration(WellLifeMethod::DurationFromFirstData, 30.0);
        let idx = resolve_well_life(&config, &info(), DayIndex::ZERO).unwrap();
        assert_eq!(idx.to_date(), date(2045, 1, 31));
    }

    #[test]
    fn test_fractional_years_are_whole_months() {
        // 1.5 years from 2020-06-30
        let config = WellLifeConfig::duration(WellLifeMethod::DurationFromLastData, 1.5);
        let idx = resolve_well_life(&config, &info(), DayIndex::ZERO).unwrap();
        assert_eq!(idx.to_date(), date(2021, 12, 30));

        // 0.04 years rounds to zero months
        let config = WellLifeConfig::duration(WellLifeMethod::DurationFromLastData, 0.04);
        let idx = resolve_well_life(&config, &info(), DayIndex::ZERO).unwrap();
        assert_eq!(idx.to_date(), date(2020, 6, 30));
    }

    #[test]
    fn test_duration_from_today_clamps_leap_day() {
        let config = WellLifeConfig::duration(WellLifeMethod::DurationFromToday, 1.0);
        let idx = resolve_well_life(&config, &info(), DayIndex::ZERO).unwrap();
        assert_eq!(idx.to_date(), date(2025, 2, 28));
    }

    #[test]
    fn test_offset_past_calendar_is_no_constraint() {
        // Fits in i32 months but overflows the month count of the anchor
        let config = WellLifeConfig::duration(WellLifeMethod::DurationFromToday, 178_956_000.0);
        assert_eq!(resolve_well_life(&config, &info(), DayIndex::ZERO), None);

        let config = WellLifeConfig::duration(WellLifeMethod::DurationFromLastData, 1e12);
        assert_eq!(resolve_well_life(&config, &info(), DayIndex::ZERO), None);
    }

    #[test]
    fn test_missing_data_falls_back_to_first_segment() {
        let start = DayIndex::from_date(date(2010, 3, 1));
        let config = WellLifeConfig::duration(WellLifeMethod::DurationFromFirstData, 2.0);
        let idx = resolve_well_life(&config, &ProductionInfo::without_data(date(2024, 1, 1)), start);
        assert_eq!(idx.unwrap().to_date(), date(2012, 3, 1));
    }

    #[test]
    fn test_fixed_date() {
        let config = WellLifeConfig::fixed(date(2050, 12, 31));
        let idx = resolve_well_life(&config, &info(), DayIndex::ZERO).unwrap();
        assert_eq!(idx, DayIndex::from_date(date(2050, 12, 31)));

        let missing = WellLifeConfig {
            method: WellLifeMethod::FixedDate,
            ..WellLifeConfig::default()
        };
        assert_eq!(resolve_well_life(&missing, &info(), DayIndex::ZERO), None);
    }

    #[test]
    fn test_invalid_offset_is_no_constraint() {
        for num in [None, Some(-1.0), Some(f64::NAN)] {
            let config = WellLifeConfig {
                method: WellLifeMethod::DurationFromToday,
                num,
                fixed_date: None,
            };
            assert_eq!(resolve_well_life(&config, &info(), DayIndex::ZERO), None);
        }
    }

    #[test]
    fn test_config_from_json() {
        let config: WellLifeConfig =
            serde_json::from_str(r#"{"method": "duration_from_last_data", "num": 15}"#).unwrap();
        assert_eq!(config.method, WellLifeMethod::DurationFromLastData);
        assert_eq!(config.num, Some(15.0));
    }
}
