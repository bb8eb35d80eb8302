//! Epoch-anchored day index.
//!
//! The forecast time axis is an integer count of days since [`epoch`]
//! (1900-01-01 is day 0). Decline curves evaluate on real-valued indices,
//! but any index that is turned back into a calendar date is rounded to
//! the nearest whole day rather than truncated.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, Sub};

use crate::error::{DcaError, DcaResult};
use crate::types::Date;

/// First day of the forecast time axis (index 0).
#[must_use]
pub fn epoch() -> Date {
    Date::from(epoch_naive())
}

fn epoch_naive() -> NaiveDate {
    NaiveDate::from_ymd_opt(1900, 1, 1).expect("1900-01-01 is a valid date")
}

/// Integer number of days since 1900-01-01.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct DayIndex(i64);

impl DayIndex {
    /// Day 0.
    pub const ZERO: DayIndex = DayIndex(0);

    /// Creates a day index from a raw day count.
    #[must_use]
    pub const fn new(days: i64) -> Self {
        DayIndex(days)
    }

    /// Rounds a real-valued index to the nearest whole day.
    ///
    /// Non-finite input maps to day 0.
    #[must_use]
    pub fn from_f64(index: f64) -> Self {
        if index.is_finite() {
            DayIndex(index.round() as i64)
        } else {
            DayIndex::ZERO
        }
    }

    /// Returns the index of a calendar date.
    #[must_use]
    pub fn from_date(date: Date) -> Self {
        DayIndex((date.as_naive_date() - epoch_naive()).num_days())
    }

    /// Returns the raw day count.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }

    /// Returns the index as `f64` for curve evaluation.
    #[must_use]
    pub fn as_f64(self) -> f64 {
        self.0 as f64
    }

    /// Converts the index back to a calendar date.
    ///
    /// # Errors
    ///
    /// Returns `DcaError::IndexOutOfRange` when the index leaves chrono's
    /// representable range.
    pub fn try_to_date(self) -> DcaResult<Date> {
        chrono::Duration::try_days(self.0)
            .and_then(|d| epoch_naive().checked_add_signed(d))
            .map(Date::from)
            .ok_or(DcaError::IndexOutOfRange { index: self.0 })
    }

    /// Converts the index back to a calendar date, saturating at the epoch
    /// for indices that cannot be represented.
    #[must_use]
    pub fn to_date(self) -> Date {
        self.try_to_date().unwrap_or_else(|_| epoch())
    }

    /// Shifts the index by whole calendar months, clamping to end of month.
    ///
    /// # Errors
    ///
    /// Returns an error if either end of the shift is not representable.
    pub fn add_months(self, months: i32) -> DcaResult<Self> {
        let date = self.try_to_date()?.add_months(months)?;
        Ok(Self::from_date(date))
    }

    /// Shifts the index by whole calendar years ("same day N years later").
    ///
    /// # Errors
    ///
    /// Returns an error if either end of the shift is not representable.
    pub fn add_years(self, years: i32) -> DcaResult<Self> {
        let date = self.try_to_date()?.add_years(years)?;
        Ok(Self::from_date(date))
    }
}

impl fmt::Display for DayIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Date> for DayIndex {
    fn from(date: Date) -> Self {
        Self::from_date(date)
    }
}

impl From<DayIndex> for f64 {
    fn from(index: DayIndex) -> Self {
        index.as_f64()
    }
}

impl Add<i64> for DayIndex {
    type Output = Self;

    fn add(self, days: i64) -> Self::Output {
        DayIndex(self.0 + days)
    }
}

impl Sub<DayIndex> for DayIndex {
    type Output = i64;

    fn sub(self, other: DayIndex) -> Self::Output {
        self.0 - other.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_epoch_is_zero() {
        let epoch = Date::from_ymd(1900, 1, 1).unwrap();
        assert_eq!(DayIndex::from_date(epoch), DayIndex::ZERO);
        assert_eq!(DayIndex::ZERO.to_date(), epoch);
    }

    #[test]
    fn test_known_dates() {
        // 1900 is not a leap year
        let d = Date::from_ymd(1901, 1, 1).unwrap();
        assert_eq!(DayIndex::from_date(d).value(), 365);

        let d = Date::from_ymd(2000, 1, 1).unwrap();
        assert_eq!(DayIndex::from_date(d).value(), 36524);
    }

    #[test]
    fn test_fractional_index_rounds() {
        assert_eq!(DayIndex::from_f64(10.49).value(), 10);
        assert_eq!(DayIndex::from_f64(10.5).value(), 11);
        assert_eq!(DayIndex::from_f64(-0.4).value(), 0);
        assert_eq!(DayIndex::from_f64(f64::NAN), DayIndex::ZERO);
    }

    #[test]
    fn test_add_years_clamps_to_month_end() {
        let leap = DayIndex::from_date(Date::from_ymd(2020, 2, 29).unwrap());
        let shifted = leap.add_years(1).unwrap();
        assert_eq!(shifted.to_date(), Date::from_ymd(2021, 2, 28).unwrap());
    }

    #[test]
    fn test_add_months() {
        let jan31 = DayIndex::from_date(Date::from_ymd(2023, 1, 31).unwrap());
        let shifted = jan31.add_months(1).unwrap();
        assert_eq!(shifted.to_date(), Date::from_ymd(2023, 2, 28).unwrap());
    }

    #[test]
    fn test_unrepresentable_index() {
        let far = DayIndex::new(i64::MAX / 2);
        assert!(far.try_to_date().is_err());
        assert_eq!(far.to_date(), epoch());
    }

    #[test]
    fn test_operators() {
        let a = DayIndex::new(100);
        assert_eq!((a + 5).value(), 105);
        assert_eq!(DayIndex::new(130) - a, 30);
    }

    proptest! {
        #[test]
        fn prop_date_index_roundtrip(days in 0i64..200_000) {
            let idx = DayIndex::new(days);
            prop_assert_eq!(DayIndex::from_date(idx.to_date()), idx);
        }
    }
}
