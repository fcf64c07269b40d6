//! The calendar capability consumed by the arithmetic layer.
//!
//! The derived operations in this crate (component setters, boundaries,
//! rounding, differences, predicates) never do calendrical math themselves.
//! They ask a [`Calendar`] for field values, valid ranges, date-by-adding and
//! date synthesis, so any calendar system that answers those questions can
//! sit underneath.
//!
//! [`GregorianCalendar`] is the provided implementation: proleptic Gregorian
//! arithmetic from `chrono`, time zone rules from `chrono-tz`, and a
//! configurable first day of the week.

use std::ops::RangeInclusive;

use chrono::{
    DateTime, Datelike, Days, FixedOffset, LocalResult, Months, NaiveDate, NaiveDateTime, Offset,
    TimeDelta, TimeZone, Timelike, Utc, Weekday,
};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{DateKitError, Result};
use crate::month::days_in_month;
use crate::unit::{CalendarUnit, ComponentSet};
use crate::Instant;

const NANOS_PER_SECOND: u32 = 1_000_000_000;

/// Source of calendar-field answers for an [`Instant`].
///
/// Implementations must be pure: the same inputs always produce the same
/// answer, and no call mutates shared state.
pub trait Calendar {
    /// The value of one field of `instant`.
    fn component(&self, unit: CalendarUnit, instant: Instant) -> i64;

    /// Every field of `instant`, including `year_for_week_of_year`.
    fn components(&self, instant: Instant) -> ComponentSet;

    /// The values `unit` may take within the enclosing `parent` around
    /// `instant` (e.g. day-of-month within the month). `None` when the pair
    /// has no meaning.
    fn valid_range(
        &self,
        unit: CalendarUnit,
        parent: CalendarUnit,
        instant: Instant,
    ) -> Option<RangeInclusive<i64>>;

    /// `instant` moved by `value` of `unit`, carrying into larger fields.
    /// `None` when the result is not representable.
    fn date_by_adding(&self, unit: CalendarUnit, value: i64, instant: Instant) -> Option<Instant>;

    /// Whole-unit difference from `from` to `to`, largest unit first.
    /// Fields are negative when `to` is earlier than `from`.
    fn components_between(
        &self,
        units: &[CalendarUnit],
        from: Instant,
        to: Instant,
    ) -> Result<ComponentSet>;

    /// Midnight at the start of the day containing `instant`.
    fn start_of_day(&self, instant: Instant) -> Option<Instant>;

    /// The instant named by `components`. `year` is required; missing finer
    /// fields default to their minimum.
    fn date_from_components(&self, components: &ComponentSet) -> Option<Instant>;

    /// Like [`date_from_components`](Self::date_from_components), but when the
    /// wall-clock time occurs twice (DST fall-back) prefer the occurrence with
    /// the same UTC offset as `near`.
    fn date_from_components_near(
        &self,
        components: &ComponentSet,
        near: Instant,
    ) -> Option<Instant> {
        let _ = near;
        self.date_from_components(components)
    }

    /// The first instant of week `week_of_year` in the week-numbering year
    /// `year_for_week_of_year`.
    fn date_from_week(&self, year_for_week_of_year: i64, week_of_year: i64) -> Option<Instant>;
}

// ── Configuration ───────────────────────────────────────────────────────────

/// Which day begins a week for week numbering and week boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStartDay {
    /// ISO 8601: weeks start on Monday and week 1 contains January 4th.
    #[default]
    Monday,
    /// US convention: weeks start on Sunday and week 1 contains January 1st.
    Sunday,
}

/// How a [`GregorianCalendar`] interprets instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarOptions {
    /// Zone used to turn instants into wall-clock fields.
    pub time_zone: Tz,
    pub week_start: WeekStartDay,
}

impl Default for CalendarOptions {
    fn default() -> Self {
        Self {
            time_zone: Tz::UTC,
            week_start: WeekStartDay::default(),
        }
    }
}

/// How many days `weekday` is from the week-start day.
fn days_from_week_start(weekday: Weekday, week_start: WeekStartDay) -> i64 {
    match week_start {
        WeekStartDay::Monday => i64::from(weekday.num_days_from_monday()),
        WeekStartDay::Sunday => i64::from(weekday.num_days_from_sunday()),
    }
}

// ── GregorianCalendar ───────────────────────────────────────────────────────

/// Proleptic Gregorian calendar in a fixed IANA time zone.
///
/// # Examples
///
/// ```
/// use datekit::calendar::{Calendar, GregorianCalendar};
/// use datekit::CalendarUnit;
///
/// let cal = GregorianCalendar::with_timezone_name("Asia/Tokyo").unwrap();
/// let t = "2024-06-15T20:00:00Z".parse().unwrap();
/// // 20:00 UTC is already the 16th in Tokyo.
/// assert_eq!(cal.component(CalendarUnit::Day, t), 16);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GregorianCalendar {
    options: CalendarOptions,
}

impl GregorianCalendar {
    pub fn new(options: CalendarOptions) -> Self {
        Self { options }
    }

    pub fn utc() -> Self {
        Self::default()
    }

    /// Calendar in the named IANA time zone, weeks starting Monday.
    ///
    /// # Errors
    ///
    /// Returns [`DateKitError::InvalidTimezone`] if the name is not a valid IANA zone.
    pub fn with_timezone_name(name: &str) -> Result<Self> {
        let time_zone = parse_timezone(name)?;
        Ok(Self::new(CalendarOptions {
            time_zone,
            ..CalendarOptions::default()
        }))
    }

    pub fn with_week_start(mut self, week_start: WeekStartDay) -> Self {
        self.options.week_start = week_start;
        self
    }

    pub fn options(&self) -> &CalendarOptions {
        &self.options
    }

    pub fn time_zone(&self) -> Tz {
        self.options.time_zone
    }

    /// The zone's UTC offset in effect at `instant`.
    pub fn utc_offset(&self, instant: Instant) -> FixedOffset {
        self.local(instant).offset().fix()
    }

    fn local(&self, instant: Instant) -> DateTime<Tz> {
        instant.with_timezone(&self.options.time_zone)
    }

    /// Map a wall-clock time back onto the timeline. Ambiguous times (DST
    /// fall-back) take the earlier instant; times inside a DST gap move
    /// forward by the length of the gap.
    fn resolve(&self, naive: NaiveDateTime) -> Option<Instant> {
        self.resolve_near(naive, None)
    }

    /// Like [`resolve`](Self::resolve), but an ambiguous time takes the
    /// occurrence whose UTC offset equals `hint` when there is one.
    fn resolve_near(&self, naive: NaiveDateTime, hint: Option<FixedOffset>) -> Option<Instant> {
        let tz = self.options.time_zone;
        let local = match tz.from_local_datetime(&naive) {
            LocalResult::Single(dt) => dt,
            LocalResult::Ambiguous(first, second) => {
                if hint == Some(second.offset().fix()) {
                    second
                } else {
                    first
                }
            }
            LocalResult::None => {
                tracing::trace!(%naive, zone = %tz, "wall-clock time falls in a DST gap");
                // Read the wall time with the offset in force before the gap.
                let before = naive.checked_sub_signed(TimeDelta::days(1))?;
                let offset = tz.offset_from_utc_datetime(&before).fix();
                let utc = naive
                    .checked_sub_signed(TimeDelta::seconds(i64::from(offset.local_minus_utc())))?;
                return Some(utc.and_utc());
            }
        };
        Some(local.with_timezone(&Utc))
    }

    fn week_start_date(&self, date: NaiveDate) -> Option<NaiveDate> {
        let back = days_from_week_start(date.weekday(), self.options.week_start);
        date.checked_sub_days(Days::new(back.unsigned_abs()))
    }

    /// Start of week 1 in the week-numbering year `year`.
    fn first_week_start(&self, year: i32) -> Option<NaiveDate> {
        let anchor_day = match self.options.week_start {
            WeekStartDay::Monday => 4,
            WeekStartDay::Sunday => 1,
        };
        self.week_start_date(NaiveDate::from_ymd_opt(year, 1, anchor_day)?)
    }

    /// `(year_for_week_of_year, week_of_year)` for `date`.
    fn year_week(&self, date: NaiveDate) -> (i64, i64) {
        if self.options.week_start == WeekStartDay::Monday {
            let iso = date.iso_week();
            return (i64::from(iso.year()), i64::from(iso.week()));
        }

        let fallback = (i64::from(date.year()), i64::from(date.ordinal0() / 7 + 1));
        let Some(start) = self.week_start_date(date) else {
            return fallback;
        };
        let Some(end) = start.checked_add_days(Days::new(6)) else {
            return fallback;
        };
        let year = end.year();
        match self.first_week_start(year) {
            Some(first) => (i64::from(year), (start - first).num_days() / 7 + 1),
            None => fallback,
        }
    }

    fn weeks_in_year(&self, year: i32) -> Option<i64> {
        let this = self.first_week_start(year)?;
        let next = self.first_week_start(year.checked_add(1)?)?;
        Some((next - this).num_days() / 7)
    }

    fn week_of_month(&self, date: NaiveDate) -> i64 {
        let first = date.with_day(1).unwrap_or(date);
        let offset = days_from_week_start(first.weekday(), self.options.week_start);
        (i64::from(date.day0()) + offset) / 7 + 1
    }

    fn add_months(&self, naive: NaiveDateTime, months: i64) -> Option<NaiveDateTime> {
        let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
        if months >= 0 {
            naive.checked_add_months(magnitude)
        } else {
            naive.checked_sub_months(magnitude)
        }
    }

    fn add_days(&self, naive: NaiveDateTime, days: i64) -> Option<NaiveDateTime> {
        let magnitude = Days::new(days.unsigned_abs());
        if days >= 0 {
            naive.checked_add_days(magnitude)
        } else {
            naive.checked_sub_days(magnitude)
        }
    }

    /// Whole months from `from` to `to` such that adding them to `from` does
    /// not overshoot `to`.
    fn whole_months_between(&self, from: NaiveDateTime, to: NaiveDateTime) -> Option<i64> {
        let index = |dt: NaiveDateTime| i64::from(dt.year()) * 12 + i64::from(dt.month0());
        let mut months = index(to) - index(from);
        loop {
            let candidate = self.add_months(from, months)?;
            if months > 0 && candidate > to {
                months -= 1;
            } else if months < 0 && candidate < to {
                months += 1;
            } else {
                return Some(months);
            }
        }
    }
}

/// Parse an IANA timezone string into `Tz`.
pub fn parse_timezone(s: &str) -> Result<Tz> {
    s.parse::<Tz>()
        .map_err(|_| DateKitError::InvalidTimezone(format!("'{}'", s)))
}

/// Wall-clock time named by `components`; `year` is required and missing
/// finer fields default to their minimum.
fn naive_from_components(components: &ComponentSet) -> Option<NaiveDateTime> {
    let field = |value: Option<i64>, default: i64| u32::try_from(value.unwrap_or(default)).ok();

    let year = i32::try_from(components.year?).ok()?;
    let date =
        NaiveDate::from_ymd_opt(year, field(components.month, 1)?, field(components.day, 1)?)?;
    date.and_hms_nano_opt(
        field(components.hour, 0)?,
        field(components.minute, 0)?,
        field(components.second, 0)?,
        field(components.nanosecond, 0)?,
    )
}

impl Calendar for GregorianCalendar {
    fn component(&self, unit: CalendarUnit, instant: Instant) -> i64 {
        let local = self.local(instant);
        match unit {
            CalendarUnit::Era => i64::from(local.year() > 0),
            CalendarUnit::Year => i64::from(local.year()),
            CalendarUnit::Month => i64::from(local.month()),
            CalendarUnit::Day => i64::from(local.day()),
            CalendarUnit::Hour => i64::from(local.hour()),
            CalendarUnit::Minute => i64::from(local.minute()),
            CalendarUnit::Second => i64::from(local.second()),
            // Leap seconds are reported as nanosecond >= 1e9 by chrono.
            CalendarUnit::Nanosecond => i64::from(local.nanosecond() % NANOS_PER_SECOND),
            CalendarUnit::WeekOfYear => self.year_week(local.date_naive()).1,
            CalendarUnit::WeekOfMonth => self.week_of_month(local.date_naive()),
            CalendarUnit::Weekday => i64::from(local.weekday().number_from_monday()),
        }
    }

    fn components(&self, instant: Instant) -> ComponentSet {
        let mut set = ComponentSet::new();
        for unit in CalendarUnit::ALL {
            set.set(unit, self.component(unit, instant));
        }
        let (year_for_week, _) = self.year_week(self.local(instant).date_naive());
        set.year_for_week_of_year = Some(year_for_week);
        set
    }

    fn valid_range(
        &self,
        unit: CalendarUnit,
        parent: CalendarUnit,
        instant: Instant,
    ) -> Option<RangeInclusive<i64>> {
        use CalendarUnit as U;

        let local = self.local(instant);
        match (unit, parent) {
            (U::Year, U::Era) => Some(1..=i64::from(NaiveDate::MAX.year())),
            (U::Month, U::Year) => Some(1..=12),
            (U::Day, U::Month) => {
                let days = days_in_month(local.year(), local.month()).ok()?;
                Some(1..=i64::from(days))
            }
            (U::Hour, U::Day) => Some(0..=23),
            (U::Minute, U::Hour) | (U::Second, U::Minute) => Some(0..=59),
            (U::Nanosecond, U::Second) => Some(0..=i64::from(NANOS_PER_SECOND) - 1),
            (U::WeekOfYear, U::Year) => {
                let (year, _) = self.year_week(local.date_naive());
                let weeks = self.weeks_in_year(i32::try_from(year).ok()?)?;
                Some(1..=weeks)
            }
            (U::WeekOfMonth, U::Month) => {
                let days = days_in_month(local.year(), local.month()).ok()?;
                let last = local.date_naive().with_day(days)?;
                Some(1..=self.week_of_month(last))
            }
            (U::Weekday, U::WeekOfYear) | (U::Weekday, U::WeekOfMonth) => Some(1..=7),
            _ => None,
        }
    }

    fn date_by_adding(&self, unit: CalendarUnit, value: i64, instant: Instant) -> Option<Instant> {
        if value == 0 {
            return Some(instant);
        }

        let local = self.local(instant);
        let naive = local.naive_local();
        let hint = Some(local.offset().fix());
        match unit {
            CalendarUnit::Era => None,
            CalendarUnit::Year => {
                self.resolve_near(self.add_months(naive, value.checked_mul(12)?)?, hint)
            }
            CalendarUnit::Month => self.resolve_near(self.add_months(naive, value)?, hint),
            CalendarUnit::Day | CalendarUnit::Weekday => {
                self.resolve_near(self.add_days(naive, value)?, hint)
            }
            CalendarUnit::WeekOfYear | CalendarUnit::WeekOfMonth => {
                self.resolve_near(self.add_days(naive, value.checked_mul(7)?)?, hint)
            }
            CalendarUnit::Hour => {
                instant.checked_add_signed(TimeDelta::try_seconds(value.checked_mul(3600)?)?)
            }
            CalendarUnit::Minute => {
                instant.checked_add_signed(TimeDelta::try_seconds(value.checked_mul(60)?)?)
            }
            CalendarUnit::Second => instant.checked_add_signed(TimeDelta::try_seconds(value)?),
            CalendarUnit::Nanosecond => instant.checked_add_signed(TimeDelta::nanoseconds(value)),
        }
    }

    fn components_between(
        &self,
        units: &[CalendarUnit],
        from: Instant,
        to: Instant,
    ) -> Result<ComponentSet> {
        let overflow = || DateKitError::OutOfRange(format!("difference from {from} to {to}"));
        let wants = |unit: CalendarUnit| units.contains(&unit);

        let mut result = ComponentSet::new();
        let target = self.local(to).naive_local();
        let mut cursor = self.local(from).naive_local();
        let mut moved = false;

        if wants(CalendarUnit::Era) {
            let era = |t| self.component(CalendarUnit::Era, t);
            result.era = Some(era(to) - era(from));
        }

        if wants(CalendarUnit::Year) || wants(CalendarUnit::Month) {
            let months = self.whole_months_between(cursor, target).ok_or_else(overflow)?;
            let (years, months) = if wants(CalendarUnit::Year) {
                (months / 12, months % 12)
            } else {
                (0, months)
            };
            if wants(CalendarUnit::Year) {
                result.year = Some(years);
            }
            if wants(CalendarUnit::Month) {
                result.month = Some(months);
            }
            let consumed = if wants(CalendarUnit::Month) {
                years * 12 + months
            } else {
                years * 12
            };
            cursor = self.add_months(cursor, consumed).ok_or_else(overflow)?;
            moved |= consumed != 0;
        }

        let week_unit = [CalendarUnit::WeekOfYear, CalendarUnit::WeekOfMonth]
            .into_iter()
            .find(|u| wants(*u));
        if let Some(unit) = week_unit {
            let weeks = (target - cursor).num_days() / 7;
            result.set(unit, weeks);
            cursor = self.add_days(cursor, weeks * 7).ok_or_else(overflow)?;
            moved |= weeks != 0;
        }

        let day_unit = [CalendarUnit::Day, CalendarUnit::Weekday]
            .into_iter()
            .find(|u| wants(*u));
        if let Some(unit) = day_unit {
            let days = (target - cursor).num_days();
            result.set(unit, days);
            cursor = self.add_days(cursor, days).ok_or_else(overflow)?;
            moved |= days != 0;
        }

        // Sub-day fields are measured on the absolute timeline so a DST
        // transition inside the span is counted as elapsed time. The cursor is
        // only re-read from the wall clock when calendar units were consumed.
        let anchor = if moved {
            self.resolve_near(cursor, Some(self.utc_offset(from)))
                .ok_or_else(overflow)?
        } else {
            from
        };
        let mut remaining = to - anchor;

        for (unit, seconds) in [
            (CalendarUnit::Hour, 3600),
            (CalendarUnit::Minute, 60),
            (CalendarUnit::Second, 1),
        ] {
            if wants(unit) {
                let n = remaining.num_seconds() / seconds;
                result.set(unit, n);
                remaining = remaining - TimeDelta::try_seconds(n * seconds).ok_or_else(overflow)?;
            }
        }

        if wants(CalendarUnit::Nanosecond) {
            result.nanosecond = Some(remaining.num_nanoseconds().ok_or_else(overflow)?);
        }

        Ok(result)
    }

    fn start_of_day(&self, instant: Instant) -> Option<Instant> {
        self.resolve(self.local(instant).date_naive().and_hms_opt(0, 0, 0)?)
    }

    fn date_from_components(&self, components: &ComponentSet) -> Option<Instant> {
        self.resolve(naive_from_components(components)?)
    }

    fn date_from_components_near(
        &self,
        components: &ComponentSet,
        near: Instant,
    ) -> Option<Instant> {
        self.resolve_near(naive_from_components(components)?, Some(self.utc_offset(near)))
    }

    fn date_from_week(&self, year_for_week_of_year: i64, week_of_year: i64) -> Option<Instant> {
        let first = self.first_week_start(i32::try_from(year_for_week_of_year).ok()?)?;
        let start = self
            .add_days(first.and_hms_opt(0, 0, 0)?, week_of_year.checked_sub(1)?.checked_mul(7)?)?;
        self.resolve(start)
    }
}
