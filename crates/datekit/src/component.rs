//! Reading and writing a single calendar field of an instant.
//!
//! Setters never rebuild the instant from a component set (that would drop
//! fields the caller did not touch). They compute the difference between the
//! requested and current value and ask the calendar to add it, after checking
//! the requested value against the calendar's valid range.

use crate::calendar::Calendar;
use crate::error::{DateKitError, Result};
use crate::unit::CalendarUnit;
use crate::Instant;

const NANOS_PER_MILLI: i64 = 1_000_000;

/// The value of `unit` in `instant`.
pub fn component<C: Calendar + ?Sized>(cal: &C, instant: Instant, unit: CalendarUnit) -> i64 {
    cal.component(unit, instant)
}

/// `instant` with `unit` set to `value`.
///
/// # Errors
///
/// - [`DateKitError::InvalidComponentValue`] if `value` is outside the
///   calendar's valid range for `unit` within its parent, or a year `<= 0`.
/// - [`DateKitError::UnsupportedUnit`] if `unit` has no parent to range-check
///   against (`Era`) or the calendar has no range for it.
/// - [`DateKitError::OutOfRange`] if the resulting instant is not representable.
///
/// # Examples
///
/// ```
/// use datekit::calendar::GregorianCalendar;
/// use datekit::component::with_component;
/// use datekit::CalendarUnit;
///
/// let cal = GregorianCalendar::utc();
/// let t = "2024-01-31T10:15:00Z".parse().unwrap();
/// let moved = with_component(&cal, t, CalendarUnit::Minute, 45).unwrap();
/// assert_eq!(moved.to_rfc3339(), "2024-01-31T10:45:00+00:00");
/// assert!(with_component(&cal, t, CalendarUnit::Second, 60).is_err());
/// ```
pub fn with_component<C: Calendar + ?Sized>(
    cal: &C,
    instant: Instant,
    unit: CalendarUnit,
    value: i64,
) -> Result<Instant> {
    let parent = unit.natural_parent().ok_or_else(|| {
        tracing::debug!(%unit, "unit has no parent range to validate against");
        DateKitError::UnsupportedUnit(unit)
    })?;

    if unit == CalendarUnit::Year && value <= 0 {
        tracing::debug!(value, "rejected non-positive year");
        return Err(DateKitError::InvalidComponentValue { unit, value });
    }

    let range = cal
        .valid_range(unit, parent, instant)
        .ok_or(DateKitError::UnsupportedUnit(unit))?;
    if !range.contains(&value) {
        tracing::debug!(%unit, value, ?range, "rejected out-of-range component value");
        return Err(DateKitError::InvalidComponentValue { unit, value });
    }

    let delta = value - cal.component(unit, instant);
    cal.date_by_adding(unit, delta, instant).ok_or_else(|| {
        DateKitError::OutOfRange(format!("{instant} with {unit} set to {value}"))
    })
}

/// Milliseconds within the second (0-999).
pub fn millisecond<C: Calendar + ?Sized>(cal: &C, instant: Instant) -> i64 {
    cal.component(CalendarUnit::Nanosecond, instant) / NANOS_PER_MILLI
}

/// `instant` with its millisecond field set to `value` (0-999). Nanoseconds
/// below the millisecond are kept.
pub fn with_millisecond<C: Calendar + ?Sized>(
    cal: &C,
    instant: Instant,
    value: i64,
) -> Result<Instant> {
    if !(0..1000).contains(&value) {
        tracing::debug!(value, "rejected out-of-range millisecond");
        return Err(DateKitError::InvalidComponentValue {
            unit: CalendarUnit::Nanosecond,
            value,
        });
    }
    let nanos = cal.component(CalendarUnit::Nanosecond, instant);
    with_component(
        cal,
        instant,
        CalendarUnit::Nanosecond,
        value * NANOS_PER_MILLI + nanos % NANOS_PER_MILLI,
    )
}
