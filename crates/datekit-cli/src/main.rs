use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use datekit::calendar::{CalendarOptions, GregorianCalendar, WeekStartDay};
use datekit::classify;
use datekit::clock::FixedClock;
use datekit::difference;
use datekit::timestamp::{self, TimestampUnit};
use datekit::{
    beginning, days_in_month, end, is_leap_year, nearest, parse_timezone, Calendar,
    CalendarUnit, ComponentSet, DateKitError, Instant, RoundingGrid,
};

const LOG_ENV: &str = "DATEKIT_LOG";

/// Units reported by `diff`, largest first.
const DIFF_UNITS: [CalendarUnit; 6] = [
    CalendarUnit::Year,
    CalendarUnit::Month,
    CalendarUnit::Day,
    CalendarUnit::Hour,
    CalendarUnit::Minute,
    CalendarUnit::Second,
];

#[derive(Parser)]
#[command(
    name = "datekit",
    version,
    about = "Calendar-relative date arithmetic on the command line"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Round an instant to the nearest 5, 10, 15, 30 or 60 minutes
    Round {
        /// RFC 3339 instant, e.g. 2024-06-15T12:41:00Z
        instant: String,
        /// Grid size in minutes
        #[arg(long, short)]
        grid: u32,
        #[command(flatten)]
        zone: ZoneArgs,
    },
    /// First and last instant of the unit containing an instant
    Boundary {
        /// year, month, week, week-of-month, day, hour, minute or second
        unit: String,
        instant: String,
        #[command(flatten)]
        zone: ZoneArgs,
        #[arg(long, value_enum, default_value_t = WeekStart::Monday)]
        week_start: WeekStart,
    },
    /// Elapsed time and whole calendar units between two instants
    Diff {
        from: String,
        to: String,
        #[command(flatten)]
        zone: ZoneArgs,
    },
    /// Parse a 10-digit (seconds) or 13-digit (milliseconds) Unix timestamp
    Timestamp { digits: String },
    /// Convert an instant to a Unix timestamp
    Epoch {
        instant: String,
        /// Emit milliseconds instead of seconds
        #[arg(long)]
        millis: bool,
    },
    /// Number of days in a month
    DaysInMonth { year: i32, month: u32 },
    /// Evaluate the classification predicates against a fixed "now"
    Classify {
        instant: String,
        /// Reference instant used as "now"
        #[arg(long)]
        now: String,
        #[command(flatten)]
        zone: ZoneArgs,
    },
    /// Every calendar component of an instant
    Components {
        instant: String,
        #[command(flatten)]
        zone: ZoneArgs,
    },
}

#[derive(Args)]
struct ZoneArgs {
    /// IANA time zone used to read calendar fields
    #[arg(long, default_value = "UTC")]
    tz: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum WeekStart {
    Monday,
    Sunday,
}

impl From<WeekStart> for WeekStartDay {
    fn from(value: WeekStart) -> Self {
        match value {
            WeekStart::Monday => WeekStartDay::Monday,
            WeekStart::Sunday => WeekStartDay::Sunday,
        }
    }
}

// ── Output records ──────────────────────────────────────────────────────────

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RoundOutput {
    input: String,
    grid_minutes: i64,
    rounded: String,
    rounded_local: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BoundaryOutput {
    unit: CalendarUnit,
    input: String,
    beginning: String,
    end: String,
    beginning_local: String,
    end_local: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DiffOutput {
    from: String,
    to: String,
    seconds: f64,
    minutes: f64,
    hours: f64,
    days: f64,
    calendar_days: i64,
    components: ComponentSet,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TimestampOutput {
    input: String,
    unit: TimestampUnit,
    instant: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EpochOutput {
    input: String,
    unit: TimestampUnit,
    value: i64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DaysInMonthOutput {
    year: i32,
    month: u32,
    days: u32,
    leap_year: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ClassifyOutput {
    instant: String,
    now: String,
    is_in_future: bool,
    is_in_past: bool,
    is_in_today: bool,
    is_in_yesterday: bool,
    is_in_tomorrow: bool,
    is_in_weekend: bool,
    is_workday: bool,
    is_in_current_week: bool,
    is_in_current_month: bool,
    is_in_current_year: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ComponentsOutput {
    input: String,
    time_zone: String,
    utc_offset_seconds: i32,
    components: ComponentSet,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let json = run(cli.command)?;
    println!("{json}");
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .init();
}

fn run(command: Command) -> Result<String> {
    match command {
        Command::Round {
            instant,
            grid,
            zone,
        } => {
            let cal = calendar(&zone, WeekStartDay::Monday)?;
            let t = parse_instant(&instant)?;
            let grid = RoundingGrid::from_minutes(grid)?;
            let rounded = nearest(&cal, t, grid)?;
            tracing::debug!(%t, %rounded, %grid, "rounded instant");
            to_json(&RoundOutput {
                input: instant,
                grid_minutes: grid.minutes(),
                rounded: timestamp::format_iso8601(rounded),
                rounded_local: local(&cal, rounded),
            })
        }
        Command::Boundary {
            unit,
            instant,
            zone,
            week_start,
        } => {
            let cal = calendar(&zone, week_start.into())?;
            let unit: CalendarUnit = unit.parse()?;
            let t = parse_instant(&instant)?;
            let first = beginning(&cal, unit, t)?;
            let last = end(&cal, unit, t)?;
            to_json(&BoundaryOutput {
                unit,
                input: instant,
                beginning: timestamp::format_iso8601(first),
                end: timestamp::format_iso8601(last),
                beginning_local: local(&cal, first),
                end_local: local(&cal, last),
            })
        }
        Command::Diff { from, to, zone } => {
            let cal = calendar(&zone, WeekStartDay::Monday)?;
            let a = parse_instant(&from)?;
            let b = parse_instant(&to)?;
            to_json(&DiffOutput {
                seconds: difference::seconds_between(b, a),
                minutes: difference::minutes_between(b, a),
                hours: difference::hours_between(b, a),
                days: difference::days_between(b, a),
                calendar_days: difference::number_of_days(&cal, a, b)?,
                components: difference::components_between(&cal, &DIFF_UNITS, a, b)?,
                from,
                to,
            })
        }
        Command::Timestamp { digits } => {
            let (t, unit) = timestamp::parse_fixed_width_timestamp_with_unit(&digits)?;
            to_json(&TimestampOutput {
                input: digits,
                unit,
                instant: timestamp::format_iso8601(t),
            })
        }
        Command::Epoch { instant, millis } => {
            let t = parse_instant(&instant)?;
            let unit = if millis {
                TimestampUnit::Milliseconds
            } else {
                TimestampUnit::Seconds
            };
            to_json(&EpochOutput {
                input: instant,
                unit,
                value: timestamp::to_epoch(t, unit),
            })
        }
        Command::DaysInMonth { year, month } => to_json(&DaysInMonthOutput {
            days: days_in_month(year, month)?,
            leap_year: is_leap_year(year),
            year,
            month,
        }),
        Command::Classify { instant, now, zone } => {
            let cal = calendar(&zone, WeekStartDay::Monday)?;
            let t = parse_instant(&instant)?;
            let clock = FixedClock(parse_instant(&now)?);
            to_json(&ClassifyOutput {
                is_in_future: classify::is_in_future(&clock, t),
                is_in_past: classify::is_in_past(&clock, t),
                is_in_today: classify::is_in_today(&cal, &clock, t)?,
                is_in_yesterday: classify::is_in_yesterday(&cal, &clock, t)?,
                is_in_tomorrow: classify::is_in_tomorrow(&cal, &clock, t)?,
                is_in_weekend: classify::is_in_weekend(&cal, t),
                is_workday: classify::is_workday(&cal, t),
                is_in_current_week: classify::is_in_current(
                    &cal,
                    &clock,
                    CalendarUnit::WeekOfYear,
                    t,
                )?,
                is_in_current_month: classify::is_in_current(
                    &cal,
                    &clock,
                    CalendarUnit::Month,
                    t,
                )?,
                is_in_current_year: classify::is_in_current(&cal, &clock, CalendarUnit::Year, t)?,
                instant,
                now,
            })
        }
        Command::Components { instant, zone } => {
            let cal = calendar(&zone, WeekStartDay::Monday)?;
            let t = parse_instant(&instant)?;
            to_json(&ComponentsOutput {
                input: instant,
                time_zone: cal.time_zone().name().to_string(),
                utc_offset_seconds: cal.utc_offset(t).local_minus_utc(),
                components: cal.components(t),
            })
        }
    }
}

fn calendar(zone: &ZoneArgs, week_start: WeekStartDay) -> Result<GregorianCalendar> {
    let time_zone = parse_timezone(&zone.tz)?;
    Ok(GregorianCalendar::new(CalendarOptions {
        time_zone,
        week_start,
    }))
}

/// Any RFC 3339 instant; numeric offsets are normalized to UTC.
fn parse_instant(s: &str) -> Result<Instant> {
    let parsed = DateTime::parse_from_rfc3339(s.trim())
        .map_err(|e| DateKitError::InvalidDatetime(format!("'{s}': {e}")))?;
    Ok(parsed.with_timezone(&Utc))
}

fn local(cal: &GregorianCalendar, instant: Instant) -> String {
    instant.with_timezone(&cal.time_zone()).to_rfc3339()
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("failed to serialize output")
}
