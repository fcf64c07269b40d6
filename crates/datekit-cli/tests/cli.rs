use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;

fn datekit() -> Command {
    Command::cargo_bin("datekit").unwrap()
}

fn run_json(args: &[&str]) -> Value {
    let output = datekit().args(args).output().unwrap();
    assert!(
        output.status.success(),
        "datekit {args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).unwrap()
}

// ── round ───────────────────────────────────────────────────────────────────

#[test]
fn test_round_to_hour_carries_into_next_year() {
    let json = run_json(&["round", "2024-12-31T23:58:00Z", "--grid", "60"]);
    assert_eq!(json["rounded"], "2025-01-01T00:00:00.000Z");
    assert_eq!(json["gridMinutes"], 60);
}

#[test]
fn test_round_quarter_hour_in_time_zone() {
    let json = run_json(&[
        "round",
        "2024-06-15T06:50:00Z",
        "--grid",
        "30",
        "--tz",
        "Asia/Kolkata",
    ]);
    assert_eq!(json["rounded"], "2024-06-15T07:00:00.000Z");
    assert_eq!(json["roundedLocal"], "2024-06-15T12:30:00+05:30");
}

#[test]
fn test_round_rejects_unknown_grid() {
    datekit()
        .args(["round", "2024-06-15T12:00:00Z", "--grid", "20"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported rounding grid"));
}

// ── boundary ────────────────────────────────────────────────────────────────

#[test]
fn test_boundary_month() {
    let json = run_json(&["boundary", "month", "2024-06-15T12:34:56Z"]);
    assert_eq!(json["unit"], "month");
    assert_eq!(json["beginning"], "2024-06-01T00:00:00.000Z");
    assert_eq!(json["end"], "2024-06-30T23:59:59.000Z");
}

#[test]
fn test_boundary_day_across_dst() {
    let json = run_json(&[
        "boundary",
        "day",
        "2024-03-10T15:00:00Z",
        "--tz",
        "America/New_York",
    ]);
    assert_eq!(json["beginning"], "2024-03-10T05:00:00.000Z");
    assert_eq!(json["beginningLocal"], "2024-03-10T00:00:00-05:00");
    assert_eq!(json["end"], "2024-03-11T03:59:59.000Z");
    assert_eq!(json["endLocal"], "2024-03-10T23:59:59-04:00");
}

#[test]
fn test_boundary_week_with_sunday_start() {
    let json = run_json(&[
        "boundary",
        "week",
        "2024-06-15T12:00:00Z",
        "--week-start",
        "sunday",
    ]);
    assert_eq!(json["unit"], "weekOfYear");
    assert_eq!(json["beginning"], "2024-06-09T00:00:00.000Z");
    assert_eq!(json["end"], "2024-06-15T23:59:59.000Z");
}

#[test]
fn test_boundary_rejects_weekday() {
    datekit()
        .args(["boundary", "weekday", "2024-06-15T12:00:00Z"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported unit"));
}

#[test]
fn test_boundary_rejects_unknown_unit() {
    datekit()
        .args(["boundary", "fortnight", "2024-06-15T12:00:00Z"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid unit"));
}

// ── diff ────────────────────────────────────────────────────────────────────

#[test]
fn test_diff_reports_elapsed_and_components() {
    let json = run_json(&["diff", "2024-06-15T12:00:00Z", "2024-06-17T18:30:00Z"]);
    assert_eq!(json["hours"], 54.5);
    assert_eq!(json["minutes"], 3270.0);
    assert_eq!(json["calendarDays"], 2);
    let components = &json["components"];
    assert_eq!(components["year"], 0);
    assert_eq!(components["month"], 0);
    assert_eq!(components["day"], 2);
    assert_eq!(components["hour"], 6);
    assert_eq!(components["minute"], 30);
    assert_eq!(components["second"], 0);
}

#[test]
fn test_diff_within_repeated_hour() {
    // 01:30 to 01:45 EST, both on the second pass through 01:00 on 2024-11-03.
    let json = run_json(&[
        "diff",
        "2024-11-03T06:30:00Z",
        "2024-11-03T06:45:00Z",
        "--tz",
        "America/New_York",
    ]);
    let components = &json["components"];
    assert_eq!(components["day"], 0);
    assert_eq!(components["hour"], 0);
    assert_eq!(components["minute"], 15);
}

#[test]
fn test_boundary_minute_in_repeated_hour() {
    let json = run_json(&[
        "boundary",
        "minute",
        "2024-11-03T06:30:30Z",
        "--tz",
        "America/New_York",
    ]);
    assert_eq!(json["beginning"], "2024-11-03T06:30:00.000Z");
    assert_eq!(json["end"], "2024-11-03T06:30:59.000Z");
    assert_eq!(json["endLocal"], "2024-11-03T01:30:59-05:00");
}

#[test]
fn test_diff_is_negative_when_reversed() {
    let json = run_json(&["diff", "2024-06-17T00:00:00Z", "2024-06-15T12:00:00Z"]);
    assert_eq!(json["days"], -1.5);
    assert_eq!(json["calendarDays"], -1);
}

// ── timestamp / epoch ───────────────────────────────────────────────────────

#[test]
fn test_timestamp_seconds_and_millis() {
    let secs = run_json(&["timestamp", "1700000000"]);
    assert_eq!(secs["unit"], "seconds");
    assert_eq!(secs["instant"], "2023-11-14T22:13:20.000Z");

    let millis = run_json(&["timestamp", "1700000000123"]);
    assert_eq!(millis["unit"], "milliseconds");
    assert_eq!(millis["instant"], "2023-11-14T22:13:20.123Z");
}

#[test]
fn test_timestamp_rejects_wrong_width() {
    datekit()
        .args(["timestamp", "17000000"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timestamp width"));
}

#[test]
fn test_epoch() {
    let secs = run_json(&["epoch", "2023-11-14T22:13:20.5Z"]);
    assert_eq!(secs["value"], 1_700_000_000i64);
    let millis = run_json(&["epoch", "2023-11-14T22:13:20.5Z", "--millis"]);
    assert_eq!(millis["value"], 1_700_000_000_500i64);
    assert_eq!(millis["unit"], "milliseconds");
}

#[test]
fn test_epoch_accepts_numeric_offset() {
    let json = run_json(&["epoch", "2023-11-15T07:13:20+09:00"]);
    assert_eq!(json["value"], 1_700_000_000i64);
}

// ── days-in-month ───────────────────────────────────────────────────────────

#[test]
fn test_days_in_month() {
    let leap = run_json(&["days-in-month", "2024", "2"]);
    assert_eq!(leap["days"], 29);
    assert_eq!(leap["leapYear"], true);

    let century = run_json(&["days-in-month", "1900", "2"]);
    assert_eq!(century["days"], 28);
    assert_eq!(century["leapYear"], false);
}

#[test]
fn test_days_in_month_rejects_month_13() {
    datekit()
        .args(["days-in-month", "2024", "13"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid month"));
}

// ── classify ────────────────────────────────────────────────────────────────

#[test]
fn test_classify_scenario() {
    let json = run_json(&[
        "classify",
        "2024-06-15T23:59:59Z",
        "--now",
        "2024-06-15T12:00:00Z",
    ]);
    assert_eq!(json["isInToday"], true);
    assert_eq!(json["isInTomorrow"], false);
    assert_eq!(json["isInFuture"], true);
    assert_eq!(json["isInPast"], false);
    assert_eq!(json["isInWeekend"], true);
    assert_eq!(json["isWorkday"], false);
    assert_eq!(json["isInCurrentWeek"], true);
    assert_eq!(json["isInCurrentMonth"], true);
}

#[test]
fn test_classify_tomorrow_in_tokyo() {
    let json = run_json(&[
        "classify",
        "2024-06-15T15:00:00Z",
        "--now",
        "2024-06-15T12:00:00Z",
        "--tz",
        "Asia/Tokyo",
    ]);
    assert_eq!(json["isInToday"], false);
    assert_eq!(json["isInTomorrow"], true);
}

// ── components ──────────────────────────────────────────────────────────────

#[test]
fn test_components_in_time_zone() {
    let json = run_json(&["components", "2024-06-15T20:00:00Z", "--tz", "Asia/Tokyo"]);
    assert_eq!(json["timeZone"], "Asia/Tokyo");
    assert_eq!(json["utcOffsetSeconds"], 32_400);
    let components = &json["components"];
    assert_eq!(components["year"], 2024);
    assert_eq!(components["month"], 6);
    assert_eq!(components["day"], 16);
    assert_eq!(components["hour"], 5);
    assert_eq!(components["weekday"], 7);
}

// ── errors ──────────────────────────────────────────────────────────────────

#[test]
fn test_invalid_timezone() {
    datekit()
        .args(["components", "2024-06-15T20:00:00Z", "--tz", "Mars/Olympus"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid timezone"));
}

#[test]
fn test_invalid_datetime() {
    datekit()
        .args(["epoch", "yesterday"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid datetime"));
}

#[test]
fn test_help_lists_subcommands() {
    datekit()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("round"))
        .stdout(predicate::str::contains("boundary"))
        .stdout(predicate::str::contains("days-in-month"));
}
