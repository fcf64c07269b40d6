//! Error types for datekit operations.

use thiserror::Error;

use crate::unit::CalendarUnit;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DateKitError {
    #[error("Invalid value {value} for component {unit}")]
    InvalidComponentValue { unit: CalendarUnit, value: i64 },

    #[error("Invalid month: {0} (expected 1-12)")]
    InvalidMonth(u32),

    #[error("Invalid timestamp width: {0} digits (expected 10 or 13)")]
    InvalidTimestampWidth(usize),

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Unsupported unit: {0}")]
    UnsupportedUnit(CalendarUnit),

    #[error("Unsupported rounding grid: {0} minutes (expected 5, 10, 15, 30 or 60)")]
    UnsupportedGrid(u32),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid datetime: {0}")]
    InvalidDatetime(String),

    #[error("Invalid unit: {0}")]
    InvalidUnit(String),

    #[error("Out of range: {0}")]
    OutOfRange(String),
}

pub type Result<T> = std::result::Result<T, DateKitError>;
