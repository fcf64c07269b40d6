//! Signed distances between two instants.
//!
//! The `*_between` functions measure elapsed time on the UTC timeline and
//! return fractional values. The `number_of_*` functions ask the calendar
//! for whole units, so "days" means calendar days in the calendar's zone.

use chrono::TimeDelta;

use crate::calendar::Calendar;
use crate::error::{DateKitError, Result};
use crate::unit::{CalendarUnit, ComponentSet};
use crate::Instant;

const SECONDS_PER_MINUTE: f64 = 60.0;
const SECONDS_PER_HOUR: f64 = 3_600.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// `a - b` in seconds; positive when `a` is later.
pub fn seconds_between(a: Instant, b: Instant) -> f64 {
    delta_seconds(a - b)
}

pub fn minutes_between(a: Instant, b: Instant) -> f64 {
    seconds_between(a, b) / SECONDS_PER_MINUTE
}

pub fn hours_between(a: Instant, b: Instant) -> f64 {
    seconds_between(a, b) / SECONDS_PER_HOUR
}

/// `a - b` in 86 400-second days.
pub fn days_between(a: Instant, b: Instant) -> f64 {
    seconds_between(a, b) / SECONDS_PER_DAY
}

/// Whole-unit difference from `from` to `to` for the requested units.
pub fn components_between<C: Calendar + ?Sized>(
    cal: &C,
    units: &[CalendarUnit],
    from: Instant,
    to: Instant,
) -> Result<ComponentSet> {
    cal.components_between(units, from, to)
}

/// Whole calendar days from `from` to `to`.
pub fn number_of_days<C: Calendar + ?Sized>(cal: &C, from: Instant, to: Instant) -> Result<i64> {
    single_unit(cal, CalendarUnit::Day, from, to)
}

pub fn number_of_hours<C: Calendar + ?Sized>(cal: &C, from: Instant, to: Instant) -> Result<i64> {
    single_unit(cal, CalendarUnit::Hour, from, to)
}

pub fn number_of_minutes<C: Calendar + ?Sized>(cal: &C, from: Instant, to: Instant) -> Result<i64> {
    single_unit(cal, CalendarUnit::Minute, from, to)
}

pub fn number_of_seconds<C: Calendar + ?Sized>(cal: &C, from: Instant, to: Instant) -> Result<i64> {
    single_unit(cal, CalendarUnit::Second, from, to)
}

/// One field from a single-unit `components_between` query.
pub fn single_unit<C: Calendar + ?Sized>(
    cal: &C,
    unit: CalendarUnit,
    from: Instant,
    to: Instant,
) -> Result<i64> {
    cal.components_between(&[unit], from, to)?
        .get(unit)
        .ok_or(DateKitError::UnsupportedUnit(unit))
}

fn delta_seconds(delta: TimeDelta) -> f64 {
    delta.num_seconds() as f64 + f64::from(delta.subsec_nanos()) / 1e9
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::GregorianCalendar;
    use crate::timestamp::utc;

    #[test]
    fn test_continuous_differences() {
        let a = utc("2024-06-16T18:00:00Z");
        let b = utc("2024-06-15T12:00:00Z");
        assert_eq!(seconds_between(a, b), 108_000.0);
        assert_eq!(minutes_between(a, b), 1_800.0);
        assert_eq!(hours_between(a, b), 30.0);
        assert_eq!(days_between(a, b), 1.25);
        assert_eq!(days_between(b, a), -1.25);
    }

    #[test]
    fn test_fractional_seconds() {
        let a = utc("2024-06-15T12:00:01.5Z");
        let b = utc("2024-06-15T12:00:00Z");
        assert_eq!(seconds_between(a, b), 1.5);
        assert_eq!(seconds_between(b, a), -1.5);
    }

    #[test]
    fn test_number_of_units_are_whole() {
        let cal = GregorianCalendar::utc();
        let from = utc("2024-06-15T12:00:00Z");
        let to = utc("2024-06-17T11:59:59Z");
        assert_eq!(number_of_days(&cal, from, to).unwrap(), 1);
        assert_eq!(number_of_hours(&cal, from, to).unwrap(), 47);
        assert_eq!(number_of_minutes(&cal, from, to).unwrap(), 47 * 60 + 59);
        assert_eq!(number_of_seconds(&cal, from, to).unwrap(), 172_799);
        assert_eq!(number_of_days(&cal, to, from).unwrap(), -1);
    }

    #[test]
    fn test_calendar_days_across_dst() {
        let cal = GregorianCalendar::with_timezone_name("America/New_York").unwrap();
        // Noon to noon across the spring-forward night: one calendar day, 23 hours.
        let from = utc("2024-03-09T17:00:00Z");
        let to = utc("2024-03-10T16:00:00Z");
        assert_eq!(number_of_days(&cal, from, to).unwrap(), 1);
        assert_eq!(number_of_hours(&cal, from, to).unwrap(), 23);
        assert!(days_between(to, from) < 1.0);
    }

    #[test]
    fn test_components_between_delegates() {
        let cal = GregorianCalendar::utc();
        let diff = components_between(
            &cal,
            &[CalendarUnit::Month, CalendarUnit::Day],
            utc("2024-01-31T00:00:00Z"),
            utc("2024-03-01T00:00:00Z"),
        )
        .unwrap();
        assert_eq!(diff.month, Some(1));
        assert_eq!(diff.day, Some(1));
        assert_eq!(diff.year, None);
    }
}
