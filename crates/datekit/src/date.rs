//! An instant viewed through a calendar.
//!
//! [`CalendarDate`] pairs an [`Instant`] with a borrowed [`Calendar`] and
//! exposes the crate's operations as methods. Every "setter" returns a new
//! value; nothing is mutated in place.

use std::fmt;

use crate::boundary;
use crate::calendar::Calendar;
use crate::classify;
use crate::clock::Clock;
use crate::component;
use crate::difference;
use crate::error::Result;
use crate::month;
use crate::rounding::{self, RoundingGrid};
use crate::timestamp::{self, TimestampUnit};
use crate::unit::{CalendarUnit, ComponentSet};
use crate::Instant;

/// An instant together with the calendar used to interpret it.
///
/// # Examples
///
/// ```
/// use datekit::calendar::GregorianCalendar;
/// use datekit::date::CalendarDate;
///
/// let cal = GregorianCalendar::utc();
/// let date = CalendarDate::new(&cal, "2024-06-15T12:41:30Z".parse().unwrap());
/// assert_eq!(date.minute(), 41);
///
/// let rounded = date.nearest_quarter_hour().unwrap();
/// assert_eq!(rounded.to_iso8601(), "2024-06-15T12:45:00.000Z");
///
/// let later = date.with_month(9).unwrap();
/// assert_eq!(later.month(), 9);
/// assert_eq!(date.month(), 6);
/// ```
pub struct CalendarDate<'c, C: Calendar + ?Sized> {
    instant: Instant,
    calendar: &'c C,
}

impl<'c, C: Calendar + ?Sized> Clone for CalendarDate<'c, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'c, C: Calendar + ?Sized> Copy for CalendarDate<'c, C> {}

impl<'c, C: Calendar + ?Sized> fmt::Debug for CalendarDate<'c, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarDate")
            .field("instant", &self.instant)
            .finish_non_exhaustive()
    }
}

impl<'c, C: Calendar + ?Sized> PartialEq for CalendarDate<'c, C> {
    fn eq(&self, other: &Self) -> bool {
        self.instant == other.instant
    }
}

impl<'c, C: Calendar + ?Sized> CalendarDate<'c, C> {
    pub fn new(calendar: &'c C, instant: Instant) -> Self {
        Self { instant, calendar }
    }

    /// The current instant according to `clock`.
    pub fn now<K: Clock + ?Sized>(calendar: &'c C, clock: &K) -> Self {
        Self::new(calendar, clock.now())
    }

    pub fn instant(&self) -> Instant {
        self.instant
    }

    pub fn calendar(&self) -> &'c C {
        self.calendar
    }

    fn rewrap(&self, instant: Instant) -> Self {
        Self::new(self.calendar, instant)
    }

    // ── Components ──────────────────────────────────────────────────────

    pub fn component(&self, unit: CalendarUnit) -> i64 {
        component::component(self.calendar, self.instant, unit)
    }

    pub fn components(&self) -> ComponentSet {
        self.calendar.components(self.instant)
    }

    pub fn era(&self) -> i64 {
        self.component(CalendarUnit::Era)
    }

    pub fn year(&self) -> i64 {
        self.component(CalendarUnit::Year)
    }

    pub fn month(&self) -> i64 {
        self.component(CalendarUnit::Month)
    }

    pub fn day(&self) -> i64 {
        self.component(CalendarUnit::Day)
    }

    pub fn hour(&self) -> i64 {
        self.component(CalendarUnit::Hour)
    }

    pub fn minute(&self) -> i64 {
        self.component(CalendarUnit::Minute)
    }

    pub fn second(&self) -> i64 {
        self.component(CalendarUnit::Second)
    }

    pub fn nanosecond(&self) -> i64 {
        self.component(CalendarUnit::Nanosecond)
    }

    pub fn millisecond(&self) -> i64 {
        component::millisecond(self.calendar, self.instant)
    }

    /// ISO weekday number, 1 = Monday ... 7 = Sunday.
    pub fn weekday(&self) -> i64 {
        self.component(CalendarUnit::Weekday)
    }

    pub fn week_of_year(&self) -> i64 {
        self.component(CalendarUnit::WeekOfYear)
    }

    pub fn week_of_month(&self) -> i64 {
        self.component(CalendarUnit::WeekOfMonth)
    }

    /// A copy with `unit` set to `value`. See [`component::with_component`].
    pub fn with_component(&self, unit: CalendarUnit, value: i64) -> Result<Self> {
        component::with_component(self.calendar, self.instant, unit, value).map(|t| self.rewrap(t))
    }

    pub fn with_year(&self, value: i64) -> Result<Self> {
        self.with_component(CalendarUnit::Year, value)
    }

    pub fn with_month(&self, value: i64) -> Result<Self> {
        self.with_component(CalendarUnit::Month, value)
    }

    pub fn with_day(&self, value: i64) -> Result<Self> {
        self.with_component(CalendarUnit::Day, value)
    }

    pub fn with_hour(&self, value: i64) -> Result<Self> {
        self.with_component(CalendarUnit::Hour, value)
    }

    pub fn with_minute(&self, value: i64) -> Result<Self> {
        self.with_component(CalendarUnit::Minute, value)
    }

    pub fn with_second(&self, value: i64) -> Result<Self> {
        self.with_component(CalendarUnit::Second, value)
    }

    pub fn with_nanosecond(&self, value: i64) -> Result<Self> {
        self.with_component(CalendarUnit::Nanosecond, value)
    }

    pub fn with_millisecond(&self, value: i64) -> Result<Self> {
        component::with_millisecond(self.calendar, self.instant, value).map(|t| self.rewrap(t))
    }

    /// Move by `value` of `unit` using the calendar's addition.
    pub fn adding(&self, unit: CalendarUnit, value: i64) -> Result<Self> {
        self.calendar
            .date_by_adding(unit, value, self.instant)
            .map(|t| self.rewrap(t))
            .ok_or_else(|| {
                crate::DateKitError::OutOfRange(format!("{} plus {value} {unit}", self.instant))
            })
    }

    // ── Rounding ────────────────────────────────────────────────────────

    pub fn nearest(&self, grid: RoundingGrid) -> Result<Self> {
        rounding::nearest(self.calendar, self.instant, grid).map(|t| self.rewrap(t))
    }

    pub fn nearest_five_minutes(&self) -> Result<Self> {
        self.nearest(RoundingGrid::FiveMinutes)
    }

    pub fn nearest_ten_minutes(&self) -> Result<Self> {
        self.nearest(RoundingGrid::TenMinutes)
    }

    pub fn nearest_quarter_hour(&self) -> Result<Self> {
        self.nearest(RoundingGrid::QuarterHour)
    }

    pub fn nearest_half_hour(&self) -> Result<Self> {
        self.nearest(RoundingGrid::HalfHour)
    }

    pub fn nearest_hour(&self) -> Result<Self> {
        self.nearest(RoundingGrid::Hour)
    }

    // ── Boundaries ──────────────────────────────────────────────────────

    pub fn beginning_of(&self, unit: CalendarUnit) -> Result<Self> {
        boundary::beginning(self.calendar, unit, self.instant).map(|t| self.rewrap(t))
    }

    pub fn end_of(&self, unit: CalendarUnit) -> Result<Self> {
        boundary::end(self.calendar, unit, self.instant).map(|t| self.rewrap(t))
    }

    // ── Differences ─────────────────────────────────────────────────────

    /// Elapsed days since `other` (positive when `self` is later).
    pub fn days_since(&self, other: Instant) -> f64 {
        difference::days_between(self.instant, other)
    }

    pub fn hours_since(&self, other: Instant) -> f64 {
        difference::hours_between(self.instant, other)
    }

    pub fn minutes_since(&self, other: Instant) -> f64 {
        difference::minutes_between(self.instant, other)
    }

    pub fn seconds_since(&self, other: Instant) -> f64 {
        difference::seconds_between(self.instant, other)
    }

    /// Whole calendar days from `other` to `self`.
    pub fn number_of_days_from(&self, other: Instant) -> Result<i64> {
        difference::number_of_days(self.calendar, other, self.instant)
    }

    pub fn number_of_hours_from(&self, other: Instant) -> Result<i64> {
        difference::number_of_hours(self.calendar, other, self.instant)
    }

    pub fn number_of_minutes_from(&self, other: Instant) -> Result<i64> {
        difference::number_of_minutes(self.calendar, other, self.instant)
    }

    pub fn number_of_seconds_from(&self, other: Instant) -> Result<i64> {
        difference::number_of_seconds(self.calendar, other, self.instant)
    }

    // ── Predicates ──────────────────────────────────────────────────────

    pub fn is_in_future<K: Clock + ?Sized>(&self, clock: &K) -> bool {
        classify::is_in_future(clock, self.instant)
    }

    pub fn is_in_past<K: Clock + ?Sized>(&self, clock: &K) -> bool {
        classify::is_in_past(clock, self.instant)
    }

    pub fn is_in_today<K: Clock + ?Sized>(&self, clock: &K) -> Result<bool> {
        classify::is_in_today(self.calendar, clock, self.instant)
    }

    pub fn is_in_yesterday<K: Clock + ?Sized>(&self, clock: &K) -> Result<bool> {
        classify::is_in_yesterday(self.calendar, clock, self.instant)
    }

    pub fn is_in_tomorrow<K: Clock + ?Sized>(&self, clock: &K) -> Result<bool> {
        classify::is_in_tomorrow(self.calendar, clock, self.instant)
    }

    pub fn is_in_current<K: Clock + ?Sized>(&self, clock: &K, unit: CalendarUnit) -> Result<bool> {
        classify::is_in_current(self.calendar, clock, unit, self.instant)
    }

    pub fn is_in_weekend(&self) -> bool {
        classify::is_in_weekend(self.calendar, self.instant)
    }

    pub fn is_workday(&self) -> bool {
        classify::is_workday(self.calendar, self.instant)
    }

    pub fn is_same_day(&self, other: Instant) -> Result<bool> {
        classify::is_same_day(self.calendar, self.instant, other)
    }

    pub fn is_between(&self, lo: Instant, hi: Instant, inclusive: bool) -> bool {
        classify::is_between(self.instant, lo, hi, inclusive)
    }

    pub fn is_within(&self, n: u64, unit: CalendarUnit, other: Instant) -> Result<bool> {
        classify::is_within(self.calendar, n, unit, self.instant, other)
    }

    // ── Conversions ─────────────────────────────────────────────────────

    pub fn to_timestamp(&self, unit: TimestampUnit) -> i64 {
        timestamp::to_epoch(self.instant, unit)
    }

    pub fn to_iso8601(&self) -> String {
        timestamp::format_iso8601(self.instant)
    }

    /// Length of the month containing this date.
    pub fn days_in_month(&self) -> Result<u32> {
        let year = i32::try_from(self.year())
            .map_err(|e| crate::DateKitError::OutOfRange(format!("year {}: {e}", self.year())))?;
        let month = u32::try_from(self.month())
            .map_err(|e| crate::DateKitError::OutOfRange(format!("month {}: {e}", self.month())))?;
        month::days_in_month(year, month)
    }

    pub fn is_leap_year(&self) -> bool {
        i32::try_from(self.year()).is_ok_and(month::is_leap_year)
    }
}
