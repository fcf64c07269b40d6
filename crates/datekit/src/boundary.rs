//! First and last instant of the calendar unit containing an instant.
//!
//! `beginning` drops every field finer than the unit and asks the calendar to
//! rebuild the instant; `end` is the beginning of the *next* unit minus one
//! second, so it is always the last whole second inside the unit.
//!
//! When clocks fall back, the repeated wall-clock hour forms two hour buckets.
//! Hour, minute and second floors stay in the pass (UTC offset) of the input
//! instant.
//!
//! For whole-second instants `t` and supported units `u`:
//! `beginning(u, t) <= t <= end(u, t)`, and `beginning` is idempotent.

use chrono::TimeDelta;

use crate::calendar::Calendar;
use crate::error::{DateKitError, Result};
use crate::unit::{CalendarUnit, ComponentSet};
use crate::Instant;

const MAX_STEPS: usize = 4;

/// Fields kept when flooring to a unit, largest first.
const FIELD_ORDER: [CalendarUnit; 6] = [
    CalendarUnit::Year,
    CalendarUnit::Month,
    CalendarUnit::Day,
    CalendarUnit::Hour,
    CalendarUnit::Minute,
    CalendarUnit::Second,
];

/// Whether [`beginning`] and [`end`] are defined for `unit`.
pub fn has_boundary(unit: CalendarUnit) -> bool {
    !matches!(
        unit,
        CalendarUnit::Era | CalendarUnit::Nanosecond | CalendarUnit::Weekday
    )
}

/// The first instant of the `unit` containing `instant`.
///
/// # Errors
///
/// - [`DateKitError::UnsupportedUnit`] for `Era`, `Nanosecond` and `Weekday`.
/// - [`DateKitError::OutOfRange`] if the calendar cannot represent the result.
///
/// # Examples
///
/// ```
/// use datekit::boundary::beginning;
/// use datekit::calendar::GregorianCalendar;
/// use datekit::CalendarUnit;
///
/// let cal = GregorianCalendar::utc();
/// let t = "2024-06-15T12:34:56Z".parse().unwrap();
/// let start = beginning(&cal, CalendarUnit::Month, t).unwrap();
/// assert_eq!(start.to_rfc3339(), "2024-06-01T00:00:00+00:00");
/// ```
pub fn beginning<C: Calendar + ?Sized>(
    cal: &C,
    unit: CalendarUnit,
    instant: Instant,
) -> Result<Instant> {
    let out_of_range = || DateKitError::OutOfRange(format!("beginning of {unit} at {instant}"));

    match unit {
        CalendarUnit::Day => cal.start_of_day(instant).ok_or_else(out_of_range),
        CalendarUnit::Year | CalendarUnit::Month => cal
            .date_from_components(&truncated(cal, unit, instant))
            .ok_or_else(out_of_range),
        CalendarUnit::Hour | CalendarUnit::Minute | CalendarUnit::Second => cal
            .date_from_components_near(&truncated(cal, unit, instant), instant)
            .ok_or_else(out_of_range),
        CalendarUnit::WeekOfYear | CalendarUnit::WeekOfMonth => {
            let all = cal.components(instant);
            let year = all.year_for_week_of_year.ok_or_else(out_of_range)?;
            let week = all.week_of_year.ok_or_else(out_of_range)?;
            cal.date_from_week(year, week).ok_or_else(out_of_range)
        }
        CalendarUnit::Era | CalendarUnit::Nanosecond | CalendarUnit::Weekday => {
            tracing::debug!(%unit, "no beginning defined for unit");
            Err(DateKitError::UnsupportedUnit(unit))
        }
    }
}

/// The last whole second of the `unit` containing `instant`.
///
/// # Errors
///
/// Same as [`beginning`].
pub fn end<C: Calendar + ?Sized>(cal: &C, unit: CalendarUnit, instant: Instant) -> Result<Instant> {
    if !has_boundary(unit) {
        tracing::debug!(%unit, "no end defined for unit");
        return Err(DateKitError::UnsupportedUnit(unit));
    }
    next_beginning(cal, unit, instant)?
        .checked_sub_signed(TimeDelta::seconds(1))
        .ok_or_else(|| DateKitError::OutOfRange(format!("end of {unit} at {instant}")))
}

/// The first instant of the `unit` after the one containing `instant`.
///
/// Steps forward from the current beginning until the floor changes. One step
/// is enough except across a fall-back, where an hour bucket can be longer
/// than one elapsed hour.
pub(crate) fn next_beginning<C: Calendar + ?Sized>(
    cal: &C,
    unit: CalendarUnit,
    instant: Instant,
) -> Result<Instant> {
    let out_of_range = || DateKitError::OutOfRange(format!("{unit} after {instant}"));
    let start = beginning(cal, unit, instant)?;
    let mut cursor = start;
    for _ in 0..MAX_STEPS {
        cursor = cal.date_by_adding(unit, 1, cursor).ok_or_else(out_of_range)?;
        let candidate = beginning(cal, unit, cursor)?;
        if candidate > start {
            return Ok(candidate);
        }
    }
    Err(out_of_range())
}

/// `instant`'s components down to and including `unit`.
fn truncated<C: Calendar + ?Sized>(cal: &C, unit: CalendarUnit, instant: Instant) -> ComponentSet {
    let all = cal.components(instant);
    let mut kept = ComponentSet::new();
    for field in FIELD_ORDER {
        if let Some(value) = all.get(field) {
            kept.set(field, value);
        }
        if field == unit {
            break;
        }
    }
    kept
}
