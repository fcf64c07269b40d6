//! Calendar units and sparse component records.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DateKitError;

/// A named granularity of time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CalendarUnit {
    Era,
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
    Nanosecond,
    WeekOfYear,
    WeekOfMonth,
    Weekday,
}

impl CalendarUnit {
    /// Every unit, largest first.
    pub const ALL: [CalendarUnit; 11] = [
        CalendarUnit::Era,
        CalendarUnit::Year,
        CalendarUnit::Month,
        CalendarUnit::WeekOfYear,
        CalendarUnit::WeekOfMonth,
        CalendarUnit::Weekday,
        CalendarUnit::Day,
        CalendarUnit::Hour,
        CalendarUnit::Minute,
        CalendarUnit::Second,
        CalendarUnit::Nanosecond,
    ];

    /// The unit that bounds this one's valid range (day-of-month within month,
    /// minute within hour, ...). `None` for `Era`, which has no parent.
    pub fn natural_parent(self) -> Option<CalendarUnit> {
        match self {
            CalendarUnit::Era => None,
            CalendarUnit::Year => Some(CalendarUnit::Era),
            CalendarUnit::Month => Some(CalendarUnit::Year),
            CalendarUnit::Day => Some(CalendarUnit::Month),
            CalendarUnit::Hour => Some(CalendarUnit::Day),
            CalendarUnit::Minute => Some(CalendarUnit::Hour),
            CalendarUnit::Second => Some(CalendarUnit::Minute),
            CalendarUnit::Nanosecond => Some(CalendarUnit::Second),
            CalendarUnit::WeekOfYear => Some(CalendarUnit::Year),
            CalendarUnit::WeekOfMonth => Some(CalendarUnit::Month),
            CalendarUnit::Weekday => Some(CalendarUnit::WeekOfYear),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            CalendarUnit::Era => "era",
            CalendarUnit::Year => "year",
            CalendarUnit::Month => "month",
            CalendarUnit::Day => "day",
            CalendarUnit::Hour => "hour",
            CalendarUnit::Minute => "minute",
            CalendarUnit::Second => "second",
            CalendarUnit::Nanosecond => "nanosecond",
            CalendarUnit::WeekOfYear => "weekOfYear",
            CalendarUnit::WeekOfMonth => "weekOfMonth",
            CalendarUnit::Weekday => "weekday",
        }
    }
}

impl fmt::Display for CalendarUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CalendarUnit {
    type Err = DateKitError;

    /// Accepts the camelCase name as well as a few common spellings
    /// (`week`, `week-of-month`, `ns`, ...), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "era" => Ok(CalendarUnit::Era),
            "year" | "years" => Ok(CalendarUnit::Year),
            "month" | "months" => Ok(CalendarUnit::Month),
            "day" | "days" => Ok(CalendarUnit::Day),
            "hour" | "hours" => Ok(CalendarUnit::Hour),
            "minute" | "minutes" | "min" => Ok(CalendarUnit::Minute),
            "second" | "seconds" | "sec" => Ok(CalendarUnit::Second),
            "nanosecond" | "nanoseconds" | "ns" => Ok(CalendarUnit::Nanosecond),
            "week" | "weeks" | "weekofyear" => Ok(CalendarUnit::WeekOfYear),
            "weekofmonth" => Ok(CalendarUnit::WeekOfMonth),
            "weekday" => Ok(CalendarUnit::Weekday),
            _ => Err(DateKitError::InvalidUnit(format!("'{}'", s.trim()))),
        }
    }
}

/// A sparse set of calendar fields.
///
/// Used both as the answer to "what are the components of this instant" and
/// as the answer to "how far apart are these instants", in which case the
/// populated fields may be negative.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentSet {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub era: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub month: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub day: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hour: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minute: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub second: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nanosecond: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_of_year: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_of_month: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekday: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_for_week_of_year: Option<i64>,
}

impl ComponentSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, unit: CalendarUnit) -> Option<i64> {
        *self.slot(unit)
    }

    pub fn set(&mut self, unit: CalendarUnit, value: i64) {
        *self.slot_mut(unit) = Some(value);
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, unit: CalendarUnit, value: i64) -> Self {
        self.set(unit, value);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn slot(&self, unit: CalendarUnit) -> &Option<i64> {
        match unit {
            CalendarUnit::Era => &self.era,
            CalendarUnit::Year => &self.year,
            CalendarUnit::Month => &self.month,
            CalendarUnit::Day => &self.day,
            CalendarUnit::Hour => &self.hour,
            CalendarUnit::Minute => &self.minute,
            CalendarUnit::Second => &self.second,
            CalendarUnit::Nanosecond => &self.nanosecond,
            CalendarUnit::WeekOfYear => &self.week_of_year,
            CalendarUnit::WeekOfMonth => &self.week_of_month,
            CalendarUnit::Weekday => &self.weekday,
        }
    }

    fn slot_mut(&mut self, unit: CalendarUnit) -> &mut Option<i64> {
        match unit {
            CalendarUnit::Era => &mut self.era,
            CalendarUnit::Year => &mut self.year,
            CalendarUnit::Month => &mut self.month,
            CalendarUnit::Day => &mut self.day,
            CalendarUnit::Hour => &mut self.hour,
            CalendarUnit::Minute => &mut self.minute,
            CalendarUnit::Second => &mut self.second,
            CalendarUnit::Nanosecond => &mut self.nanosecond,
            CalendarUnit::WeekOfYear => &mut self.week_of_year,
            CalendarUnit::WeekOfMonth => &mut self.week_of_month,
            CalendarUnit::Weekday => &mut self.weekday,
        }
    }
}
