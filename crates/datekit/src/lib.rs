//! # datekit
//!
//! Calendar-relative date arithmetic.
//!
//! Instants are absolute (`DateTime<Utc>`); calendar fields such as "day" or
//! "week of year" only exist once an instant is read through a [`Calendar`].
//! This crate provides the derived arithmetic on top of that capability:
//! component get/set with rollover, rounding to minute grids, unit
//! boundaries, differences and classification predicates.
//!
//! ## Modules
//!
//! - [`calendar`]: `Calendar` capability trait and the chrono-backed `GregorianCalendar`
//! - [`clock`]: injectable source of "now"
//! - [`unit`]: `CalendarUnit` and the sparse `ComponentSet`
//! - [`month`]: leap years and month lengths
//! - [`timestamp`]: epoch conversion, fixed-width parsing, ISO-8601 text
//! - [`component`]: read or replace one calendar field
//! - [`boundary`]: first and last instant of a unit
//! - [`rounding`]: snap to the nearest 5/10/15/30/60 minutes
//! - [`difference`]: signed deltas between instants
//! - [`classify`]: today/weekend/between/within predicates
//! - [`date`]: `CalendarDate`, an instant bound to a calendar
//! - [`error`]: Error types

pub mod boundary;
pub mod calendar;
pub mod classify;
pub mod clock;
pub mod component;
pub mod date;
pub mod difference;
pub mod error;
pub mod month;
pub mod rounding;
pub mod timestamp;
pub mod unit;

/// An absolute point in time.
pub type Instant = chrono::DateTime<chrono::Utc>;

pub use boundary::{beginning, end};
pub use calendar::{parse_timezone, Calendar, CalendarOptions, GregorianCalendar, WeekStartDay};
pub use clock::{Clock, FixedClock, SystemClock};
pub use date::CalendarDate;
pub use error::{DateKitError, Result};
pub use month::{days_in_month, is_leap_year};
pub use rounding::{nearest, RoundingGrid};
pub use timestamp::{
    parse_fixed_width_timestamp, parse_fixed_width_timestamp_with_unit, TimestampUnit,
};
pub use unit::{CalendarUnit, ComponentSet};
