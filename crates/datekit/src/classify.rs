//! Boolean predicates over instants.
//!
//! Predicates that depend on "now" take a [`Clock`]; day-based predicates go
//! through [`beginning`](crate::boundary::beginning) so they respect the
//! calendar's time zone.

use std::cmp::Ordering;

use crate::boundary::beginning;
use crate::calendar::Calendar;
use crate::clock::Clock;
use crate::difference::single_unit;
use crate::error::{DateKitError, Result};
use crate::unit::CalendarUnit;
use crate::Instant;

const SATURDAY: i64 = 6;
const SUNDAY: i64 = 7;

pub fn is_in_future<K: Clock + ?Sized>(clock: &K, instant: Instant) -> bool {
    instant > clock.now()
}

pub fn is_in_past<K: Clock + ?Sized>(clock: &K, instant: Instant) -> bool {
    instant < clock.now()
}

/// Whether `instant` falls on the calendar day of "now".
pub fn is_in_today<C, K>(cal: &C, clock: &K, instant: Instant) -> Result<bool>
where
    C: Calendar + ?Sized,
    K: Clock + ?Sized,
{
    is_in_day_offset(cal, clock, instant, 0)
}

pub fn is_in_yesterday<C, K>(cal: &C, clock: &K, instant: Instant) -> Result<bool>
where
    C: Calendar + ?Sized,
    K: Clock + ?Sized,
{
    is_in_day_offset(cal, clock, instant, -1)
}

pub fn is_in_tomorrow<C, K>(cal: &C, clock: &K, instant: Instant) -> Result<bool>
where
    C: Calendar + ?Sized,
    K: Clock + ?Sized,
{
    is_in_day_offset(cal, clock, instant, 1)
}

/// Saturday or Sunday in the calendar's zone.
pub fn is_in_weekend<C: Calendar + ?Sized>(cal: &C, instant: Instant) -> bool {
    matches!(cal.component(CalendarUnit::Weekday, instant), SATURDAY | SUNDAY)
}

pub fn is_workday<C: Calendar + ?Sized>(cal: &C, instant: Instant) -> bool {
    !is_in_weekend(cal, instant)
}

pub fn is_same_day<C: Calendar + ?Sized>(cal: &C, a: Instant, b: Instant) -> Result<bool> {
    is_same(cal, CalendarUnit::Day, a, b)
}

/// Year, month and day components are all equal.
pub fn is_same_ymd<C: Calendar + ?Sized>(cal: &C, a: Instant, b: Instant) -> bool {
    [CalendarUnit::Year, CalendarUnit::Month, CalendarUnit::Day]
        .into_iter()
        .all(|unit| cal.component(unit, a) == cal.component(unit, b))
}

/// `a` and `b` share the same `unit` bucket (same week, same month, ...).
pub fn is_same<C: Calendar + ?Sized>(
    cal: &C,
    unit: CalendarUnit,
    a: Instant,
    b: Instant,
) -> Result<bool> {
    Ok(beginning(cal, unit, a)? == beginning(cal, unit, b)?)
}

/// `instant` is in the current `unit` (this week, this month, this year, ...).
pub fn is_in_current<C, K>(cal: &C, clock: &K, unit: CalendarUnit, instant: Instant) -> Result<bool>
where
    C: Calendar + ?Sized,
    K: Clock + ?Sized,
{
    is_same(cal, unit, instant, clock.now())
}

/// `instant` lies between `lo` and `hi`, in either order.
///
/// Computed as the sign product of `lo.cmp(instant)` and `instant.cmp(hi)`:
/// positive when strictly inside, zero when on a bound.
///
/// # Examples
///
/// ```
/// use datekit::classify::is_between;
///
/// let lo = "2024-06-01T00:00:00Z".parse().unwrap();
/// let hi = "2024-06-30T00:00:00Z".parse().unwrap();
/// let t = "2024-06-10T00:00:00Z".parse().unwrap();
/// assert!(is_between(t, lo, hi, false));
/// assert!(is_between(t, hi, lo, false));
/// assert!(!is_between(lo, lo, hi, false));
/// assert!(is_between(lo, lo, hi, true));
/// ```
pub fn is_between(instant: Instant, lo: Instant, hi: Instant, inclusive: bool) -> bool {
    let product = sign(lo.cmp(&instant)) * sign(instant.cmp(&hi));
    if inclusive {
        product >= 0
    } else {
        product > 0
    }
}

/// `|components_between({unit}, instant, other)[unit]| <= n`.
pub fn is_within<C: Calendar + ?Sized>(
    cal: &C,
    n: u64,
    unit: CalendarUnit,
    instant: Instant,
    other: Instant,
) -> Result<bool> {
    let distance = single_unit(cal, unit, instant, other)?;
    Ok(distance.unsigned_abs() <= n)
}

fn is_in_day_offset<C, K>(cal: &C, clock: &K, instant: Instant, days: i64) -> Result<bool>
where
    C: Calendar + ?Sized,
    K: Clock + ?Sized,
{
    let now = clock.now();
    let reference = cal
        .date_by_adding(CalendarUnit::Day, days, now)
        .ok_or_else(|| DateKitError::OutOfRange(format!("{now} shifted by {days} days")))?;
    is_same(cal, CalendarUnit::Day, instant, reference)
}

fn sign(ordering: Ordering) -> i8 {
    match ordering {
        Ordering::Less => -1,
        Ordering::Equal => 0,
        Ordering::Greater => 1,
    }
}
