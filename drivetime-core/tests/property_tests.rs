//! Property-based tests for the departure grid and the rounding rule.

use chrono::{NaiveDate, NaiveTime, Timelike};
use chrono_tz::America::Los_Angeles;
use proptest::prelude::*;

use drivetime_core::assemble::round_to_tenth;
use drivetime_core::grid::minute_grid;

fn time_from_minutes(total: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(total / 60, total % 60, 0).unwrap()
}

proptest! {
    /// Grid length law: floor((end - start) / interval) + 1, first element
    /// is start, last is within one interval of end.
    #[test]
    fn grid_length_law(
        start_min in 0u32..1200,
        window_min in 1u32..600,
        interval in 1u32..120,
    ) {
        let end_min = start_min + window_min;
        prop_assume!(end_min < 1440);

        // A mid-June date: no DST transition can disturb the arithmetic.
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let start = time_from_minutes(start_min);
        let end = time_from_minutes(end_min);

        let grid = minute_grid(date, start, end, interval, Los_Angeles).unwrap();

        prop_assert_eq!(grid.len() as u32, window_min / interval + 1);

        let first = &grid[0];
        prop_assert_eq!(first.time().hour() * 60 + first.time().minute(), start_min);

        let last = &grid[grid.len() - 1];
        let last_min = last.time().hour() * 60 + last.time().minute();
        prop_assert!(last_min <= end_min);
        prop_assert!(end_min - last_min < interval);
    }

    /// Consecutive grid instants are exactly one interval apart in
    /// absolute time.
    #[test]
    fn grid_spacing_is_uniform(
        start_min in 0u32..1200,
        window_min in 1u32..600,
        interval in 1u32..120,
    ) {
        let end_min = start_min + window_min;
        prop_assume!(end_min < 1440);

        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let grid = minute_grid(
            date,
            time_from_minutes(start_min),
            time_from_minutes(end_min),
            interval,
            Los_Angeles,
        )
        .unwrap();

        for pair in grid.windows(2) {
            let gap = pair[1].signed_duration_since(pair[0]);
            prop_assert_eq!(gap.num_minutes(), i64::from(interval));
        }
    }

    /// Rounded values carry at most one decimal digit.
    #[test]
    fn round_to_tenth_lands_on_tenths(v in -1.0e6f64..1.0e6) {
        let r = round_to_tenth(v);
        let tenths = r * 10.0;
        prop_assert!((tenths - tenths.round()).abs() < 1e-6);
        prop_assert!((r - v).abs() <= 0.05 + 1e-9);
    }
}
