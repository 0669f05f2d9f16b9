//! Time-of-day serial arithmetic.
//!
//! Times are fractions of a day in `[0, 1)`: `0.5` is noon, `1/86_400` is one second past
//! midnight.

use chrono::NaiveTime;
use formula_format::SECONDS_PER_DAY;

use crate::coercion::ValueLocaleConfig;
use crate::error::{ExcelError, ExcelResult};

/// Normalize hour/minute/second counts into a fraction of a day.
///
/// The inputs are unbounded: seconds carry into minutes, minutes into hours, and whole days
/// are discarded, so `time(6, 60, 0) == time(7, 0, 0)` and `time(24, 0, 0) == 0.0`. Negative
/// totals wrap backwards from midnight.
///
/// The sum is exact integer arithmetic and the single division happens last, so the result is
/// bit-identical to `seconds_of_day as f64 / 86_400.0`.
pub fn time(hour: i64, minute: i64, second: i64) -> f64 {
    let total = i128::from(hour) * 3600 + i128::from(minute) * 60 + i128::from(second);
    let seconds_of_day = total.rem_euclid(i128::from(SECONDS_PER_DAY));
    seconds_of_day as f64 / SECONDS_PER_DAY as f64
}

/// The time of day of a serial value, rounded to the nearest second.
///
/// Whole days are ignored. Negative and non-finite serials are `#NUM!`.
pub fn time_of_day(serial: f64) -> ExcelResult<NaiveTime> {
    if !serial.is_finite() || serial < 0.0 {
        return Err(ExcelError::Num);
    }
    let seconds = (serial.fract() * SECONDS_PER_DAY as f64).round() as i64;
    let seconds = seconds.rem_euclid(SECONDS_PER_DAY);
    u32::try_from(seconds)
        .ok()
        .and_then(|secs| NaiveTime::from_num_seconds_from_midnight_opt(secs, 0))
        .ok_or(ExcelError::Num)
}

/// Parse time-of-day text into a fraction of a day (`TIMEVALUE`).
///
/// Accepted shapes, with the locale time separator:
/// - `h:mm`, `h:mm:ss`, `h:mm:ss.fff`
/// - `mm:ss.f` (two fields where the second has a fraction)
/// - any of the above, or a bare `h`, followed by `AM`/`PM` (`A`/`P`)
///
/// Twelve-hour text needs an hour in `0..=12`. Twenty-four-hour text may overflow the day
/// (`"25:00"`) and wraps like [`time`].
pub fn timevalue(text: &str, cfg: ValueLocaleConfig) -> ExcelResult<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ExcelError::Value);
    }

    let (clock, meridiem) = split_meridiem(trimmed);
    let fields: Vec<&str> = clock.split(cfg.time_separator).map(str::trim).collect();

    let (hours, minutes, seconds, fraction) = match fields.as_slice() {
        [h] if meridiem.is_some() => (parse_field(h)?, 0, 0, 0.0),
        [m, s] if s.contains(cfg.decimal_separator) => {
            let (s, fraction) = parse_seconds(s, cfg)?;
            (0, parse_field(m)?, s, fraction)
        }
        [h, m] => (parse_field(h)?, parse_minute_or_second(m)?, 0, 0.0),
        [h, m, s] => {
            let (s, fraction) = parse_seconds(s, cfg)?;
            (parse_field(h)?, parse_minute_or_second(m)?, s, fraction)
        }
        _ => return Err(ExcelError::Value),
    };

    let hours = match meridiem {
        Some(pm) => {
            if hours > 12 {
                return Err(ExcelError::Value);
            }
            hours % 12 + if pm { 12 } else { 0 }
        }
        None => hours,
    };

    let whole = i128::from(hours) * 3600 + i128::from(minutes) * 60 + i128::from(seconds);
    let seconds_of_day = whole.rem_euclid(i128::from(SECONDS_PER_DAY)) as f64 + fraction;
    Ok((seconds_of_day / SECONDS_PER_DAY as f64).rem_euclid(1.0))
}

/// Split off a trailing `AM`/`PM`/`A`/`P` marker. Returns `Some(true)` for PM.
fn split_meridiem(text: &str) -> (&str, Option<bool>) {
    let upper = text.to_ascii_uppercase();
    for (suffix, pm) in [("AM", false), ("PM", true), ("A", false), ("P", true)] {
        if upper.ends_with(suffix) {
            let clock = &text[..text.len() - suffix.len()];
            // Require a separator so `"12:30PM"` and `"12:30 PM"` work but a bare letter in
            // the middle of a word does not.
            if clock.ends_with(|c: char| c.is_ascii_digit() || c.is_whitespace()) {
                return (clock.trim_end(), Some(pm));
            }
        }
    }
    (text, None)
}

fn parse_field(field: &str) -> ExcelResult<i64> {
    if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ExcelError::Value);
    }
    field.parse().map_err(|_| ExcelError::Value)
}

fn parse_minute_or_second(field: &str) -> ExcelResult<i64> {
    let value = parse_field(field)?;
    if value >= 60 {
        return Err(ExcelError::Value);
    }
    Ok(value)
}

fn parse_seconds(field: &str, cfg: ValueLocaleConfig) -> ExcelResult<(i64, f64)> {
    let (whole, fraction) = match field.split_once(cfg.decimal_separator) {
        Some((whole, digits)) => {
            if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                return Err(ExcelError::Value);
            }
            let fraction: f64 = format!("0.{digits}").parse().map_err(|_| ExcelError::Value)?;
            (whole, fraction)
        }
        None => (field, 0.0),
    };
    Ok((parse_minute_or_second(whole)?, fraction))
}
