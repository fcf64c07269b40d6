//! Snapping an instant to the nearest multiple of N minutes.
//!
//! One rule covers every sub-hour grid: with `r = minute % grid`, round down
//! when `2r < grid`, otherwise round up to the next multiple (ties round up).
//! Seconds and nanoseconds are zeroed. The minute delta is added through the
//! calendar, so reaching minute 60 carries into the hour, day, month and year
//! exactly as the calendar's own addition does.
//!
//! The hour grid snaps to a wall-clock hour boundary with minute 0, which is
//! not always a whole number of elapsed hours away (Lord Howe Island shifts
//! its clocks by 30 minutes).

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::boundary::{beginning, next_beginning};
use crate::calendar::Calendar;
use crate::component::with_component;
use crate::error::{DateKitError, Result};
use crate::unit::CalendarUnit;
use crate::Instant;

/// Minute multiple that [`nearest`] snaps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RoundingGrid {
    FiveMinutes,
    TenMinutes,
    QuarterHour,
    HalfHour,
    Hour,
}

impl RoundingGrid {
    pub const ALL: [RoundingGrid; 5] = [
        RoundingGrid::FiveMinutes,
        RoundingGrid::TenMinutes,
        RoundingGrid::QuarterHour,
        RoundingGrid::HalfHour,
        RoundingGrid::Hour,
    ];

    pub fn minutes(self) -> i64 {
        match self {
            RoundingGrid::FiveMinutes => 5,
            RoundingGrid::TenMinutes => 10,
            RoundingGrid::QuarterHour => 15,
            RoundingGrid::HalfHour => 30,
            RoundingGrid::Hour => 60,
        }
    }

    /// # Errors
    ///
    /// Returns [`DateKitError::UnsupportedGrid`] unless `minutes` is 5, 10, 15, 30 or 60.
    pub fn from_minutes(minutes: u32) -> Result<Self> {
        match minutes {
            5 => Ok(RoundingGrid::FiveMinutes),
            10 => Ok(RoundingGrid::TenMinutes),
            15 => Ok(RoundingGrid::QuarterHour),
            30 => Ok(RoundingGrid::HalfHour),
            60 => Ok(RoundingGrid::Hour),
            other => Err(DateKitError::UnsupportedGrid(other)),
        }
    }
}

impl fmt::Display for RoundingGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} minutes", self.minutes())
    }
}

/// `instant` snapped to the nearest point on `grid`.
///
/// # Errors
///
/// Returns [`DateKitError::OutOfRange`] if the rounded instant is not
/// representable.
///
/// # Examples
///
/// ```
/// use datekit::calendar::GregorianCalendar;
/// use datekit::rounding::{nearest, RoundingGrid};
///
/// let cal = GregorianCalendar::utc();
/// let t = "2024-12-31T23:58:00Z".parse().unwrap();
/// let rounded = nearest(&cal, t, RoundingGrid::Hour).unwrap();
/// assert_eq!(rounded.to_rfc3339(), "2025-01-01T00:00:00+00:00");
/// ```
pub fn nearest<C: Calendar + ?Sized>(
    cal: &C,
    instant: Instant,
    grid: RoundingGrid,
) -> Result<Instant> {
    let minute = cal.component(CalendarUnit::Minute, instant);

    if grid == RoundingGrid::Hour {
        if minute < 30 {
            return beginning(cal, CalendarUnit::Hour, instant);
        }
        let next = next_beginning(cal, CalendarUnit::Hour, instant)?;
        // A skipped 02:00 resolves to 02:30 after a half-hour gap.
        return if cal.component(CalendarUnit::Minute, next) == 0 {
            Ok(next)
        } else {
            next_beginning(cal, CalendarUnit::Hour, next)
        };
    }

    let step = grid.minutes();
    let remainder = minute % step;
    let delta = if 2 * remainder < step {
        -remainder
    } else {
        step - remainder
    };

    let floored = [CalendarUnit::Second, CalendarUnit::Nanosecond]
        .into_iter()
        .try_fold(instant, |acc, unit| with_component(cal, acc, unit, 0))?;
    cal.date_by_adding(CalendarUnit::Minute, delta, floored)
        .ok_or_else(|| DateKitError::OutOfRange(format!("{instant} rounded to {grid}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::GregorianCalendar;
    use crate::timestamp::utc;
    use proptest::prelude::*;

    fn round(s: &str, grid: RoundingGrid) -> Instant {
        nearest(&GregorianCalendar::utc(), utc(s), grid).unwrap()
    }

    #[test]
    fn test_five_minutes() {
        for (input, expected) in [
            ("2024-06-15T12:42:00Z", "2024-06-15T12:40:00Z"),
            ("2024-06-15T12:43:00Z", "2024-06-15T12:45:00Z"),
            ("2024-06-15T12:44:00Z", "2024-06-15T12:45:00Z"),
            ("2024-06-15T12:42:59Z", "2024-06-15T12:40:00Z"),
        ] {
            assert_eq!(round(input, RoundingGrid::FiveMinutes), utc(expected), "{input}");
        }
    }

    #[test]
    fn test_ten_minutes_tie_rounds_up() {
        for (input, expected) in [
            ("2024-06-15T12:34:00Z", "2024-06-15T12:30:00Z"),
            ("2024-06-15T12:35:00Z", "2024-06-15T12:40:00Z"),
        ] {
            assert_eq!(round(input, RoundingGrid::TenMinutes), utc(expected), "{input}");
        }
    }

    #[test]
    fn test_quarter_hour() {
        for (input, expected) in [
            ("2024-06-15T12:07:00Z", "2024-06-15T12:00:00Z"),
            ("2024-06-15T12:08:00Z", "2024-06-15T12:15:00Z"),
            ("2024-06-15T12:53:00Z", "2024-06-15T13:00:00Z"),
        ] {
            assert_eq!(round(input, RoundingGrid::QuarterHour), utc(expected), "{input}");
        }
    }

    #[test]
    fn test_half_hour_tie_rounds_up() {
        for (input, expected) in [
            ("2024-06-15T12:14:59Z", "2024-06-15T12:00:00Z"),
            ("2024-06-15T12:15:00Z", "2024-06-15T12:30:00Z"),
            ("2024-06-15T12:45:00Z", "2024-06-15T13:00:00Z"),
        ] {
            assert_eq!(round(input, RoundingGrid::HalfHour), utc(expected), "{input}");
        }
    }

    #[test]
    fn test_hour() {
        for (input, expected) in [
            ("2024-06-15T12:29:59Z", "2024-06-15T12:00:00Z"),
            ("2024-06-15T12:30:00Z", "2024-06-15T13:00:00Z"),
        ] {
            assert_eq!(round(input, RoundingGrid::Hour), utc(expected), "{input}");
        }
    }

    #[test]
    fn test_carry_through_month_and_year() {
        for (input, grid, expected) in [
            ("2024-12-31T23:58:00Z", RoundingGrid::Hour, "2025-01-01T00:00:00Z"),
            ("2024-02-29T23:58:00Z", RoundingGrid::FiveMinutes, "2024-03-01T00:00:00Z"),
            ("2023-12-31T23:53:00Z", RoundingGrid::QuarterHour, "2024-01-01T00:00:00Z"),
        ] {
            assert_eq!(round(input, grid), utc(expected), "{input} to {grid}");
        }
    }

    #[test]
    fn test_sub_second_fields_are_zeroed() {
        assert_eq!(
            round("2024-06-15T12:40:12.345678Z", RoundingGrid::FiveMinutes),
            utc("2024-06-15T12:40:00Z")
        );
    }

    #[test]
    fn test_half_hour_offset_zone_rounds_local_minutes() {
        // India is UTC+05:30: 06:50 UTC is 12:20 local, which rounds to 12:30 local.
        let cal = GregorianCalendar::with_timezone_name("Asia/Kolkata").unwrap();
        let rounded = nearest(&cal, utc("2024-06-15T06:50:00Z"), RoundingGrid::HalfHour).unwrap();
        assert_eq!(rounded, utc("2024-06-15T07:00:00Z"));
    }

    #[test]
    fn test_grid_from_minutes() {
        for grid in RoundingGrid::ALL {
            let minutes = u32::try_from(grid.minutes()).unwrap();
            assert_eq!(RoundingGrid::from_minutes(minutes).unwrap(), grid);
        }
        assert_eq!(RoundingGrid::from_minutes(20), Err(DateKitError::UnsupportedGrid(20)));
    }

    #[test]
    fn test_hour_in_repeated_hour_keeps_offset() {
        let cal = GregorianCalendar::with_timezone_name("America/New_York").unwrap();
        // 01:10 EST on 2024-11-03, the second pass through 01:00-01:59.
        let t = utc("2024-11-03T06:10:00Z");
        assert_eq!(nearest(&cal, t, RoundingGrid::Hour).unwrap(), utc("2024-11-03T06:00:00Z"));
        // 01:40 EDT rounds up to 01:00 EST.
        let t = utc("2024-11-03T05:40:00Z");
        assert_eq!(nearest(&cal, t, RoundingGrid::Hour).unwrap(), utc("2024-11-03T06:00:00Z"));
    }

    #[test]
    fn test_hour_lands_on_hour_across_half_hour_shift() {
        // Lord Howe Island: 01:35 +11:00 rounds up to 02:00 +10:30.
        let cal = GregorianCalendar::with_timezone_name("Australia/Lord_Howe").unwrap();
        let rounded = nearest(&cal, utc("2024-04-06T14:35:00Z"), RoundingGrid::Hour).unwrap();
        assert_eq!(rounded, utc("2024-04-06T15:30:00Z"));
        assert_eq!(cal.component(CalendarUnit::Minute, rounded), 0);
    }

    #[test]
    fn test_hour_skips_boundary_inside_half_hour_gap() {
        // Lord Howe Island: 02:00 +10:30 becomes 02:30 +11:00 on 2024-10-06,
        // so 01:40 rounds up to 03:00.
        let cal = GregorianCalendar::with_timezone_name("Australia/Lord_Howe").unwrap();
        let rounded = nearest(&cal, utc("2024-10-05T15:10:00Z"), RoundingGrid::Hour).unwrap();
        assert_eq!(rounded, utc("2024-10-05T16:00:00Z"));
        assert_eq!(nearest(&cal, rounded, RoundingGrid::Hour).unwrap(), rounded);
    }

    #[test]
    fn test_five_minutes_into_repeated_hour() {
        let cal = GregorianCalendar::with_timezone_name("America/New_York").unwrap();
        // 00:58 EDT rounds to 01:00 EDT, the first 01:00 of 2024-11-03.
        let rounded = nearest(&cal, utc("2024-11-03T04:58:00Z"), RoundingGrid::FiveMinutes);
        assert_eq!(rounded.unwrap(), utc("2024-11-03T05:00:00Z"));
        // 01:58 EDT rounds to 01:00 EST, one elapsed hour later than 01:00 EDT.
        let rounded = nearest(&cal, utc("2024-11-03T05:58:00Z"), RoundingGrid::FiveMinutes);
        assert_eq!(rounded.unwrap(), utc("2024-11-03T06:00:00Z"));
    }

    const ZONES: [&str; 4] = ["UTC", "America/New_York", "Asia/Kolkata", "Australia/Lord_Howe"];

    proptest! {
        #[test]
        fn prop_nearest_is_idempotent(
            secs in -2_000_000_000i64..8_000_000_000i64,
            nanos in 0u32..1_000_000_000,
            idx in 0usize..5,
            zone in 0usize..4,
        ) {
            let cal = GregorianCalendar::with_timezone_name(ZONES[zone]).unwrap();
            let grid = RoundingGrid::ALL[idx];
            let t = chrono::DateTime::from_timestamp(secs, nanos).unwrap();
            let once = nearest(&cal, t, grid).unwrap();
            let twice = nearest(&cal, once, grid).unwrap();
            prop_assert_eq!(once, twice);
            prop_assert_eq!(cal.component(CalendarUnit::Minute, once) % grid.minutes(), 0);
            prop_assert!((once - t).num_seconds().abs() <= grid.minutes() * 60);
        }

        #[test]
        fn prop_nearest_is_idempotent_near_transitions(
            offset in -7_200i64..7_200,
            transition in 0usize..4,
            idx in 0usize..5,
        ) {
            let (zone, at) = [
                ("America/New_York", "2024-03-10T07:00:00Z"),
                ("America/New_York", "2024-11-03T06:00:00Z"),
                ("Australia/Lord_Howe", "2024-04-06T15:00:00Z"),
                ("Australia/Lord_Howe", "2024-10-05T15:30:00Z"),
            ][transition];
            let cal = GregorianCalendar::with_timezone_name(zone).unwrap();
            let grid = RoundingGrid::ALL[idx];
            let t = utc(at) + chrono::TimeDelta::seconds(offset);
            let once = nearest(&cal, t, grid).unwrap();
            prop_assert_eq!(nearest(&cal, once, grid).unwrap(), once);
            prop_assert_eq!(cal.component(CalendarUnit::Minute, once) % grid.minutes(), 0);
        }
    }
}
