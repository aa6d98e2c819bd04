//! Time expressions
//!
//! Parses the time arguments the chart API and CLI accept:
//!
//! ```text
//! now            the current instant
//! now-24h        a duration before now
//! 7d             a bare duration (the `last=` window parameter)
//! 2024-01-15T10:00:00Z   an RFC 3339 instant
//! 2024-01-15     a calendar date (midnight UTC)
//! ```
//!
//! Duration units: `s`, `m`, `h`, `d`, `w`.

use chrono::{DateTime, NaiveDate, Utc};
use nom::{
    branch::alt,
    bytes::complete::tag_no_case,
    character::complete::{char, digit1, multispace0, one_of},
    combinator::{map, map_res, opt},
    sequence::{pair, preceded},
    IResult,
};
use thiserror::Error;

/// Errors from time expression parsing
#[derive(Debug, Error, PartialEq)]
pub enum TimeExprError {
    #[error("Invalid time expression: '{0}'")]
    Invalid(String),
}

/// Parse an instant expression relative to `now` (ms since epoch).
///
/// Accepts `now`, `now-<duration>`, RFC 3339 timestamps, and bare dates.
pub fn parse_instant(input: &str, now: i64) -> Result<i64, TimeExprError> {
    let trimmed = input.trim();

    if let Ok((rest, offset)) = parse_now_expr(trimmed) {
        if rest.trim().is_empty() {
            return Ok(now - offset);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc).timestamp_millis());
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(dt) = date.and_hms_opt(0, 0, 0) {
            return Ok(dt.and_utc().timestamp_millis());
        }
    }

    Err(TimeExprError::Invalid(input.to_string()))
}

/// Parse a bare duration like `90m` or `7d` into milliseconds.
pub fn parse_duration_ms(input: &str) -> Result<i64, TimeExprError> {
    match parse_duration(input.trim()) {
        Ok((rest, ms)) if rest.trim().is_empty() => Ok(ms),
        _ => Err(TimeExprError::Invalid(input.to_string())),
    }
}

/// `now` with an optional `-<duration>` suffix; yields the offset in ms
fn parse_now_expr(input: &str) -> IResult<&str, i64> {
    let (input, _) = tag_no_case("now")(input)?;
    let (input, offset) = opt(preceded(
        pair(multispace0, char('-')),
        preceded(multispace0, parse_duration),
    ))(input)?;
    Ok((input, offset.unwrap_or(0)))
}

/// `<digits><unit>` in milliseconds
fn parse_duration(input: &str) -> IResult<&str, i64> {
    map(
        pair(map_res(digit1, str::parse::<i64>), parse_unit),
        |(n, unit_ms)| n.saturating_mul(unit_ms),
    )(input)
}

/// Duration unit to milliseconds
fn parse_unit(input: &str) -> IResult<&str, i64> {
    alt((
        map(one_of("sS"), |_| 1000),
        map(one_of("mM"), |_| 60 * 1000),
        map(one_of("hH"), |_| 3600 * 1000),
        map(one_of("dD"), |_| 24 * 3600 * 1000),
        map(one_of("wW"), |_| 7 * 24 * 3600 * 1000),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: i64 = 1_705_312_800_000; // 2024-01-15 10:00:00 UTC

    #[test]
    fn test_now() {
        assert_eq!(parse_instant("now", NOW), Ok(NOW));
        assert_eq!(parse_instant("  NOW ", NOW), Ok(NOW));
    }

    #[test]
    fn test_now_minus_duration() {
        assert_eq!(parse_instant("now-24h", NOW), Ok(NOW - 24 * 3600 * 1000));
        assert_eq!(parse_instant("now - 30m", NOW), Ok(NOW - 30 * 60 * 1000));
        assert_eq!(parse_instant("now-7d", NOW), Ok(NOW - 7 * 24 * 3600 * 1000));
    }

    #[test]
    fn test_rfc3339() {
        assert_eq!(
            parse_instant("2024-01-15T10:00:00Z", NOW),
            Ok(1_705_312_800_000)
        );
        assert_eq!(
            parse_instant("2024-01-15T12:00:00+02:00", NOW),
            Ok(1_705_312_800_000)
        );
    }

    #[test]
    fn test_bare_date() {
        assert_eq!(parse_instant("2024-01-15", NOW), Ok(1_705_276_800_000));
    }

    #[test]
    fn test_durations() {
        assert_eq!(parse_duration_ms("90s"), Ok(90 * 1000));
        assert_eq!(parse_duration_ms("90m"), Ok(90 * 60 * 1000));
        assert_eq!(parse_duration_ms("2h"), Ok(2 * 3600 * 1000));
        assert_eq!(parse_duration_ms("1w"), Ok(7 * 24 * 3600 * 1000));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(parse_instant("yesterday", NOW).is_err());
        assert!(parse_instant("now+1h", NOW).is_err());
        assert!(parse_instant("now-", NOW).is_err());
        assert!(parse_duration_ms("h2").is_err());
        assert!(parse_duration_ms("2x").is_err());
        assert!(parse_duration_ms("2h tail").is_err());
    }
}
