//! Properties of the epoch-anchored day index.

use dca_core::prelude::*;
use proptest::prelude::*;

#[test]
fn epoch_is_day_zero() {
    assert_eq!(DayIndex::from_date(epoch()), DayIndex::ZERO);
    assert_eq!(DayIndex::ZERO.to_date(), Date::from_ymd(1900, 1, 1).unwrap());
}

#[test]
fn month_shift_clamps_to_month_end() {
    let jan_31 = DayIndex::from_date(Date::from_ymd(2023, 1, 31).unwrap());
    let feb = jan_31.add_months(1).unwrap();
    assert_eq!(feb.to_date(), Date::from_ymd(2023, 2, 28).unwrap());

    let leap = DayIndex::from_date(Date::from_ymd(2024, 2, 29).unwrap());
    assert_eq!(leap.add_years(4).unwrap().to_date(), Date::from_ymd(2028, 2, 29).unwrap());
    assert_eq!(leap.add_years(1).unwrap().to_date(), Date::from_ymd(2025, 2, 28).unwrap());
}

proptest! {
    #[test]
    fn date_round_trip(days in 0i64..100_000) {
        let idx = DayIndex::new(days);
        prop_assert_eq!(DayIndex::from_date(idx.to_date()), idx);
    }

    #[test]
    fn fractional_index_rounds_to_nearest(days in 0i64..100_000, offset in -0.49..0.49_f64) {
        let idx = DayIndex::from_f64(days as f64 + offset);
        prop_assert_eq!(idx.value(), days);
    }

    #[test]
    fn month_shifts_are_monotonic(days in 0i64..90_000, months in 0i32..600) {
        let idx = DayIndex::new(days);
        let shifted = idx.add_months(months).unwrap();
        prop_assert!(shifted >= idx);
        prop_assert!(shifted.value() - days <= i64::from(months) * 31);
    }
}
