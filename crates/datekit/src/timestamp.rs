//! Conversions between instants and their external numeric/string forms.
//!
//! Everything here is pure arithmetic on the UTC timeline: no calendar or
//! time zone lookups are needed.
//!
//! # Functions
//!
//! - [`to_epoch`] / [`from_epoch`]: instant ⇄ Unix seconds or milliseconds
//! - [`parse_fixed_width_timestamp`]: strict 10/13 digit timestamp strings
//! - [`to_gmt`] / [`from_gmt`]: shift by a fixed UTC offset
//! - [`format_iso8601`] / [`parse_iso8601`]: `yyyy-MM-ddTHH:mm:ss.SSSZ`

use chrono::{DateTime, FixedOffset, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use crate::error::{DateKitError, Result};
use crate::Instant;

const NANOS_PER_SECOND: i128 = 1_000_000_000;
const NANOS_PER_MILLI: i128 = 1_000_000;

const SECONDS_WIDTH: usize = 10;
const MILLIS_WIDTH: usize = 13;

const ISO8601_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
const ISO8601_PARSE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Resolution of a Unix timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampUnit {
    #[default]
    Seconds,
    Milliseconds,
}

/// Convert an instant to a Unix timestamp.
///
/// Seconds are truncated toward zero; milliseconds are rounded to the nearest
/// millisecond (half away from zero).
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use datekit::timestamp::{to_epoch, TimestampUnit};
///
/// let t = Utc.timestamp_opt(1_700_000_000, 999_600_000).unwrap();
/// assert_eq!(to_epoch(t, TimestampUnit::Seconds), 1_700_000_000);
/// assert_eq!(to_epoch(t, TimestampUnit::Milliseconds), 1_700_000_001_000);
/// ```
pub fn to_epoch(instant: Instant, unit: TimestampUnit) -> i64 {
    let total_nanos = total_nanos(instant);
    let value = match unit {
        TimestampUnit::Seconds => total_nanos / NANOS_PER_SECOND,
        TimestampUnit::Milliseconds => round_half_away(total_nanos, NANOS_PER_MILLI),
    };
    // Every representable instant fits: chrono's range is ~±8.2e15 ms.
    value as i64
}

/// Convert a Unix timestamp to an instant.
///
/// # Errors
///
/// Returns [`DateKitError::OutOfRange`] if the value lies outside the
/// representable instant range.
pub fn from_epoch(value: i64, unit: TimestampUnit) -> Result<Instant> {
    let instant = match unit {
        TimestampUnit::Seconds => DateTime::from_timestamp(value, 0),
        TimestampUnit::Milliseconds => DateTime::from_timestamp_millis(value),
    };
    instant.ok_or_else(|| DateKitError::OutOfRange(format!("timestamp {value} ({unit:?})")))
}

/// Parse a timestamp string that must be exactly 10 digits (seconds) or
/// 13 digits (milliseconds).
///
/// The width check catches seconds/milliseconds confusion at the boundary
/// instead of producing a date in 1970 or in the year 55000.
///
/// # Errors
///
/// - [`DateKitError::InvalidTimestampWidth`] if the string is not 10 or 13 characters long.
/// - [`DateKitError::InvalidTimestamp`] if it has the right width but is not all ASCII digits.
///
/// # Examples
///
/// ```
/// use datekit::timestamp::parse_fixed_width_timestamp;
///
/// let secs = parse_fixed_width_timestamp("1700000000").unwrap();
/// let millis = parse_fixed_width_timestamp("1700000000000").unwrap();
/// assert_eq!(secs, millis);
/// assert!(parse_fixed_width_timestamp("17000000").is_err());
/// ```
pub fn parse_fixed_width_timestamp(s: &str) -> Result<Instant> {
    parse_fixed_width_timestamp_with_unit(s).map(|(instant, _)| instant)
}

/// Like [`parse_fixed_width_timestamp`], also reporting which unit the width
/// selected.
///
/// # Errors
///
/// The same as [`parse_fixed_width_timestamp`].
pub fn parse_fixed_width_timestamp_with_unit(s: &str) -> Result<(Instant, TimestampUnit)> {
    let unit = match s.len() {
        SECONDS_WIDTH => TimestampUnit::Seconds,
        MILLIS_WIDTH => TimestampUnit::Milliseconds,
        width => {
            tracing::debug!(width, "rejected timestamp string of unexpected width");
            return Err(DateKitError::InvalidTimestampWidth(width));
        }
    };

    if !s.bytes().all(|b| b.is_ascii_digit()) {
        tracing::debug!(input = s, "rejected non-numeric timestamp string");
        return Err(DateKitError::InvalidTimestamp(format!(
            "'{s}' contains non-digit characters"
        )));
    }

    let value: i64 = s
        .parse()
        .map_err(|e| DateKitError::InvalidTimestamp(format!("'{s}': {e}")))?;
    Ok((from_epoch(value, unit)?, unit))
}

/// Reinterpret a local wall-clock instant as GMT by subtracting `offset`.
pub fn to_gmt(instant: Instant, offset: FixedOffset) -> Result<Instant> {
    shift(instant, -i64::from(offset.local_minus_utc()))
}

/// Inverse of [`to_gmt`]: add `offset` to a GMT instant.
pub fn from_gmt(instant: Instant, offset: FixedOffset) -> Result<Instant> {
    shift(instant, i64::from(offset.local_minus_utc()))
}

/// Render as `yyyy-MM-ddTHH:mm:ss.SSSZ`, always in UTC.
pub fn format_iso8601(instant: Instant) -> String {
    instant.format(ISO8601_FORMAT).to_string()
}

/// Parse the [`format_iso8601`] shape. Any fractional precision (or none) is
/// accepted; the trailing `Z` is required.
pub fn parse_iso8601(s: &str) -> Result<Instant> {
    NaiveDateTime::parse_from_str(s.trim(), ISO8601_PARSE_FORMAT)
        .map(|naive| naive.and_utc())
        .map_err(|e| DateKitError::InvalidDatetime(format!("'{}': {}", s, e)))
}

fn shift(instant: Instant, seconds: i64) -> Result<Instant> {
    instant
        .checked_add_signed(TimeDelta::seconds(seconds))
        .ok_or_else(|| DateKitError::OutOfRange(format!("{instant} shifted by {seconds}s")))
}

fn total_nanos(instant: Instant) -> i128 {
    i128::from(instant.timestamp()) * NANOS_PER_SECOND
        + i128::from(instant.timestamp_subsec_nanos())
}

fn round_half_away(n: i128, d: i128) -> i128 {
    if n >= 0 {
        (n + d / 2) / d
    } else {
        -((-n + d / 2) / d)
    }
}

/// `Utc` instant from whole seconds; used by tests across the crate.
#[cfg(test)]
pub(crate) fn utc(s: &str) -> Instant {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .unwrap()
}
